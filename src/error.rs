//! 错误类型
//!
//! 配置错误在构造阶段报告；输入错误总是带上出错的 token；
//! 执行错误会中止整批仿真，不返回部分结果。

use thiserror::Error;

/// 顶层错误
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed input: {0}")]
    Input(#[from] InputError),

    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    /// 某个节点的分布连续 `attempts` 次给出非正样本
    #[error("node '{node}' could not draw a positive delay after {attempts} attempts")]
    NonPositiveSample { node: String, attempts: u32 },

    #[error("run {run} (seed {seed}) failed: {source}")]
    RunFailed {
        run: usize,
        seed: u64,
        #[source]
        source: Box<SimError>,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// 网络/终止条件的构造错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("duplicate node name '{0}'")]
    DuplicateNode(String),

    #[error("connection {from} -> {to} has non-positive weight {weight}")]
    NonPositiveWeight { from: String, to: String, weight: f64 },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("node '{0}' spawns arrivals without limit and no end criteria were given")]
    NoTermination(String),

    #[error("unsupported network schema version {0}")]
    UnsupportedSchema(u32),

    #[error("invalid network description: {0}")]
    Json(String),
}

/// 文本输入（终止条件、导出记录）的解析错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("end criteria segment '{segment}': {reason}")]
    EndCriteria { segment: String, reason: String },

    #[error("record line {line}: {reason} (token '{token}')")]
    Record {
        line: usize,
        token: String,
        reason: String,
    },
}

/// 统计聚合错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("confidence bounds need at least 2 runs, got {0}")]
    NotEnoughRuns(usize),

    #[error("unknown statistic '{0}'")]
    UnknownStat(String),

    #[error("no statistics for node '{0}'")]
    UnknownNode(String),

    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidence(f64),

    #[error("relative error threshold must be a non-negative number, got {0}")]
    InvalidRelativeError(f64),
}

pub type Result<T> = std::result::Result<T, SimError>;
