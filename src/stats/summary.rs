//! 单个统计量的在线汇总（Welford 算法）

use super::student::t_critical;
use crate::error::StatsError;
use serde::{Deserialize, Serialize};

pub(crate) fn check_confidence(confidence: f64) -> Result<(), StatsError> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidConfidence(confidence))
    }
}

/// 均值/方差/极值的增量汇总，内存不随样本数增长。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 样本方差（n - 1），少于 2 个样本时为 0
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// 置信水平 `confidence` 下的误差半宽 `t * s / sqrt(n)`
    pub fn error(&self, confidence: f64) -> Result<f64, StatsError> {
        check_confidence(confidence)?;
        if self.count < 2 {
            return Err(StatsError::NotEnoughRuns(self.count));
        }
        let n = self.count as f64;
        Ok(t_critical(confidence, n - 1.0) * self.std_dev() / n.sqrt())
    }

    /// `(mean - error, mean + error)`
    pub fn bounds(&self, confidence: f64) -> Result<(f64, f64), StatsError> {
        let e = self.error(confidence)?;
        Ok((self.mean - e, self.mean + e))
    }

    /// 误差与均值之比；均值为 0 时误差也为 0 则记 0，否则为无穷。
    pub fn relative_error(&self, confidence: f64) -> Result<f64, StatsError> {
        let e = self.error(confidence)?;
        if self.mean == 0.0 {
            Ok(if e == 0.0 { 0.0 } else { f64::INFINITY })
        } else {
            Ok(e / self.mean.abs())
        }
    }
}
