//! 仿真时间类型
//!
//! 连续时间，单位由分布参数决定（通常视为秒）。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 仿真时间。按 `f64::total_cmp` 全序比较，可以放进堆里。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// 向后推移 `delay`
    pub fn after(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
