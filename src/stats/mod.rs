//! 统计与置信区间
//!
//! 把多次独立仿真的结果汇总为均值、方差和 Student t 置信区间。
//! 提供批量聚合（`AggregateResult`）和逐次累加（`ResultSummary`）两种方式，
//! 以及基于相对误差的提前停止判断（`ConfidenceIndices`）。

mod aggregate;
mod confidence;
mod stat;
mod student;
mod summary;

pub use aggregate::{AggregateResult, ResultSummary};
pub use confidence::{ConfidenceIndices, ConfidenceTarget};
pub use stat::{STAT_COUNT, STATS_FORMAT_VERSION, Stat};
pub use student::{inv_norm_cdf, t_cdf, t_critical, t_quantile};
pub use summary::Summary;

/// 默认置信水平
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
