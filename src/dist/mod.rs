//! 概率分布
//!
//! `Distribution` 是不可变的配置（可序列化）；`Sampler` 是每次仿真各自持有的
//! 采样器，Box-Muller 的缓存样本就放在这里，不在多次仿真之间共享。

mod distribution;
mod sampler;

pub use distribution::Distribution;
pub use sampler::{MAX_RESAMPLES, Sampler};
