//! 基于置信区间的提前停止
//!
//! 登记若干 (节点, 统计量, 置信水平, 相对误差阈值) 目标，
//! 所有目标的相对误差都不超过阈值时即可停止继续发起仿真。

use super::aggregate::ResultSummary;
use super::stat::Stat;
use super::summary::check_confidence;
use crate::error::StatsError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTarget {
    pub node: String,
    pub stat: Stat,
    pub confidence: f64,
    pub relative_error: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIndices {
    targets: Vec<ConfidenceTarget>,
}

impl ConfidenceIndices {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个目标；置信水平须在 (0, 1) 内，相对误差阈值不能为负或 NaN。
    pub fn add(
        &mut self,
        node: impl Into<String>,
        stat: Stat,
        confidence: f64,
        relative_error: f64,
    ) -> Result<&mut Self, StatsError> {
        check_confidence(confidence)?;
        if relative_error.is_nan() || relative_error < 0.0 {
            return Err(StatsError::InvalidRelativeError(relative_error));
        }
        self.targets.push(ConfidenceTarget {
            node: node.into(),
            stat,
            confidence,
            relative_error,
        });
        Ok(self)
    }

    pub fn targets(&self) -> &[ConfidenceTarget] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// 每个目标当前的相对误差；不足 2 次仿真时为 `None`。
    pub fn relative_errors(&self, summary: &ResultSummary) -> Result<Vec<Option<f64>>, StatsError> {
        self.targets
            .iter()
            .map(|t| -> Result<Option<f64>, StatsError> {
                let s = summary.get(&t.node, t.stat)?;
                if s.count() < 2 {
                    Ok(None)
                } else {
                    s.relative_error(t.confidence).map(Some)
                }
            })
            .collect()
    }

    /// 所有目标都满足阈值。没有目标时视为满足。
    pub fn is_satisfied(&self, summary: &ResultSummary) -> Result<bool, StatsError> {
        if summary.runs() < 2 {
            // 已有结果时仍检查节点名，未知节点立即报错
            if summary.runs() == 1 {
                for t in &self.targets {
                    summary.get(&t.node, t.stat)?;
                }
            }
            return Ok(false);
        }
        let errors = self.relative_errors(summary)?;
        Ok(self
            .targets
            .iter()
            .zip(errors)
            .all(|(t, e)| e.is_some_and(|e| e <= t.relative_error)))
    }
}
