//! 示例网络
//!
//! 两个参考网络的构建函数，供二进制和测试共用。

use crate::dist::Distribution;
use crate::error::ConfigError;
use crate::net::{Net, NodeConfig};

/// 默认的源节点到达上限
pub const DEFAULT_SPAWN_LIMIT: u64 = 10_000;

/// 源 → 单服务台队列
///
/// 源节点按 λ = 1/4.5 的指数间隔生成 `limit` 个作业；
/// 队列服务时间为 Normal(3.2, 0.6)。
pub fn build_two_node(limit: u64) -> Result<Net, ConfigError> {
    let mut net = Net::new();
    net.add_node(NodeConfig::limited_source(
        "Source",
        Distribution::exponential(1.0 / 4.5),
        limit,
    ))?;
    net.add_node(NodeConfig::queue(
        "Queue",
        1,
        Distribution::normal(3.2, 0.6),
    ))?;
    net.connect("Source", "Queue", 1.0)?;
    Ok(net)
}

/// 源 → 服务 1 → 服务 2（可能停机）
///
/// λ = 1.5 的源，两个指数服务节点（速率 2.0 和 3.5）；
/// 最后一个节点每次离开后有 10% 概率停机 Exp(10.0) 时长。
pub fn build_three_node(limit: u64) -> Result<Net, ConfigError> {
    let mut net = Net::new();
    net.add_node(NodeConfig::limited_source(
        "Source",
        Distribution::exponential(1.5),
        limit,
    ))?;
    net.add_node(NodeConfig::queue("Service1", 1, Distribution::exponential(2.0)))?;
    net.add_node(
        NodeConfig::queue("Service2", 1, Distribution::exponential(3.5)).with_unavailable(
            Distribution::unavailable_time(0.1, Distribution::exponential(10.0)),
        ),
    )?;
    net.connect("Source", "Service1", 1.0)?;
    net.connect("Service1", "Service2", 1.0)?;
    Ok(net)
}
