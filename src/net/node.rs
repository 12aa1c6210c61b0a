//! 节点配置
//!
//! 定义服务节点的不可变配置：服务台数、队列容量、到达生成上限和分布。

use crate::dist::Distribution;
use serde::{Deserialize, Serialize};
use tracing::warn;

fn one_server() -> Option<u32> {
    Some(1)
}

fn never_spawn() -> Option<u64> {
    Some(0)
}

/// 节点配置。`None` 表示不设上限。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// 网络内唯一的名字
    pub name: String,
    /// 并发服务台数（`None` 为无限）
    #[serde(default = "one_server")]
    pub max_servers: Option<u32>,
    /// 队列容量，含正在服务的作业（`None` 为无限）
    #[serde(default)]
    pub max_queue: Option<u32>,
    /// 本节点自行生成的到达数上限：0 表示从不生成，`None` 表示一直生成
    #[serde(default = "never_spawn")]
    pub spawn_arrivals: Option<u64>,
    /// 服务时间分布；对生成到达的节点同时也是到达间隔分布
    pub service: Distribution,
    /// 每次离开后可能出现的停机时长分布
    #[serde(default)]
    pub unavailable: Option<Distribution>,
}

impl NodeConfig {
    /// 持续生成到达的源节点
    pub fn source(name: impl Into<String>, service: Distribution) -> Self {
        Self {
            name: name.into(),
            max_servers: Some(1),
            max_queue: None,
            spawn_arrivals: None,
            service,
            unavailable: None,
        }
    }

    /// 生成 `limit` 个到达后停止的源节点
    pub fn limited_source(name: impl Into<String>, service: Distribution, limit: u64) -> Self {
        Self {
            spawn_arrivals: Some(limit),
            ..Self::source(name, service)
        }
    }

    /// 多服务台排队节点，自身不生成到达
    pub fn queue(name: impl Into<String>, servers: u32, service: Distribution) -> Self {
        Self {
            name: name.into(),
            max_servers: Some(servers),
            max_queue: None,
            spawn_arrivals: Some(0),
            service,
            unavailable: None,
        }
    }

    pub fn with_unavailable(mut self, unavailable: Distribution) -> Self {
        self.unavailable = Some(unavailable);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: u32) -> Self {
        self.max_queue = Some(capacity);
        self
    }

    /// 把 0 个服务台 / 0 容量钳到 1。
    pub(crate) fn clamped(mut self) -> Self {
        if self.max_servers == Some(0) {
            warn!(node = %self.name, "max_servers 为 0，钳为 1");
            self.max_servers = Some(1);
        }
        if self.max_queue == Some(0) {
            warn!(node = %self.name, "max_queue 为 0，钳为 1");
            self.max_queue = Some(1);
        }
        self
    }

    pub fn servers_limit(&self) -> u64 {
        self.max_servers.map_or(u64::MAX, u64::from)
    }

    pub fn queue_limit(&self) -> u64 {
        self.max_queue.map_or(u64::MAX, u64::from)
    }

    /// 是否会无限生成到达
    pub fn spawns_unbounded(&self) -> bool {
        self.spawn_arrivals.is_none()
    }

    /// 是否从不生成到达
    pub fn spawns_nothing(&self) -> bool {
        self.spawn_arrivals == Some(0)
    }

    /// 已有 `arrivals` 个到达时是否还应生成下一个
    pub fn should_spawn(&self, arrivals: u64) -> bool {
        self.spawn_arrivals.is_none_or(|limit| arrivals < limit)
    }
}
