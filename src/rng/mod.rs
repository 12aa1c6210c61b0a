//! 随机数模块
//!
//! Lehmer 乘同余生成器与多流管理：一个顶层种子派生出多个互不重叠、
//! 可复现的子流，每次仿真独占一个子流。

mod lehmer;
mod streams;

pub use lehmer::{DEFAULT_SEED, MODULUS, MULTIPLIER, Rng};
pub use streams::{A256, MAX_STREAMS, stream, stream_range, streams};
pub(crate) use streams::warn_if_overlapping;
