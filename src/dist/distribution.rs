//! 分布配置

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 分布的封闭变体集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// `-ln(U) / rate`
    Exponential { rate: f64 },
    /// `min + (max - min) * U`
    Uniform { min: f64, max: f64 },
    /// k 个 Exponential(rate) 之和
    Erlang { k: u32, rate: f64 },
    /// 单次均匀抽样的正态近似：`mean + std * sqrt(-2 ln U) * cos(2πU)`。
    ///
    /// 幅度和角度用的是同一个 U，统计上有偏；保留此公式以维持既有的数值结果。
    Normal { mean: f64, std_dev: f64 },
    /// 标准 Box-Muller，每两次调用消耗两个均匀样本。
    NormalBoxMuller { mean: f64, std_dev: f64 },
    /// 以概率 `probability` 从 `inner` 取一个正的停机时长，否则为 0。
    UnavailableTime {
        probability: f64,
        inner: Box<Distribution>,
    },
}

fn finite(name: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidDistribution(format!(
            "{name} must be finite, got {v}"
        )))
    }
}

impl Distribution {
    pub fn exponential(rate: f64) -> Self {
        Self::Exponential { rate }
    }

    pub fn uniform(min: f64, max: f64) -> Self {
        Self::Uniform { min, max }
    }

    pub fn erlang(k: u32, rate: f64) -> Self {
        Self::Erlang { k, rate }
    }

    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self::Normal { mean, std_dev }
    }

    pub fn normal_box_muller(mean: f64, std_dev: f64) -> Self {
        Self::NormalBoxMuller { mean, std_dev }
    }

    pub fn unavailable_time(probability: f64, inner: Distribution) -> Self {
        Self::UnavailableTime {
            probability,
            inner: Box::new(inner),
        }
    }

    /// 检查参数合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |msg: String| Err(ConfigError::InvalidDistribution(msg));
        match self {
            Self::Exponential { rate } => {
                finite("rate", *rate)?;
                if *rate <= 0.0 {
                    return bad(format!("exponential rate must be > 0, got {rate}"));
                }
            }
            Self::Uniform { min, max } => {
                finite("min", *min)?;
                finite("max", *max)?;
                if min > max {
                    return bad(format!("uniform min {min} exceeds max {max}"));
                }
            }
            Self::Erlang { k, rate } => {
                finite("rate", *rate)?;
                if *k == 0 {
                    return bad("erlang k must be >= 1".to_string());
                }
                if *rate <= 0.0 {
                    return bad(format!("erlang rate must be > 0, got {rate}"));
                }
            }
            Self::Normal { mean, std_dev } | Self::NormalBoxMuller { mean, std_dev } => {
                finite("mean", *mean)?;
                finite("std_dev", *std_dev)?;
                if *std_dev < 0.0 {
                    return bad(format!("std_dev must be >= 0, got {std_dev}"));
                }
            }
            Self::UnavailableTime { probability, inner } => {
                finite("probability", *probability)?;
                if !(0.0..=1.0).contains(probability) {
                    return bad(format!("probability must be in [0, 1], got {probability}"));
                }
                inner.validate()?;
            }
        }
        Ok(())
    }

    /// 解析均值（`Normal` 取名义均值）。
    pub fn mean(&self) -> f64 {
        match self {
            Self::Exponential { rate } => 1.0 / rate,
            Self::Uniform { min, max } => (min + max) / 2.0,
            Self::Erlang { k, rate } => *k as f64 / rate,
            Self::Normal { mean, .. } | Self::NormalBoxMuller { mean, .. } => *mean,
            Self::UnavailableTime { probability, inner } => probability * inner.mean(),
        }
    }
}
