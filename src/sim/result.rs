//! 单次仿真结果

use std::time::Duration;

use super::stats::NodeStats;
use serde::{Deserialize, Serialize};

/// 一个节点的统计快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub name: String,
    pub stats: NodeStats,
}

/// 一次仿真的结果，产生后不再修改。节点按拓扑顺序排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// 本次仿真所用子流的初始种子
    pub seed: u64,
    /// 最后一个事件的仿真时间
    pub time: f64,
    /// 墙钟耗时
    pub elapsed: Duration,
    pub nodes: Vec<NodeResult>,
}

impl RunResult {
    pub fn node(&self, name: &str) -> Option<&NodeStats> {
        self.nodes.iter().find(|n| n.name == name).map(|n| &n.stats)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }
}
