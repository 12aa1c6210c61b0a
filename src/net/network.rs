//! 网络拓扑
//!
//! 命名节点加带权有向边。构造完成后作为只读配置交给仿真内核，
//! 可以在多个并行仿真之间共享。

use std::collections::HashMap;

use super::id::NodeId;
use super::node::NodeConfig;
use crate::error::ConfigError;
use tracing::{debug, info};

/// 有向边：去往 `target`，权重 `weight > 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub target: NodeId,
    pub weight: f64,
}

/// 网络拓扑
#[derive(Debug, Clone, Default)]
pub struct Net {
    nodes: Vec<NodeConfig>,
    children: Vec<Vec<Connection>>,
    index: HashMap<String, NodeId>,
}

impl Net {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加节点；名字重复或分布非法时报错。
    pub fn add_node(&mut self, node: NodeConfig) -> Result<NodeId, ConfigError> {
        if self.index.contains_key(&node.name) {
            return Err(ConfigError::DuplicateNode(node.name));
        }
        node.service.validate()?;
        if let Some(u) = &node.unavailable {
            u.validate()?;
        }
        let node = node.clamped();
        let id = NodeId(self.nodes.len());
        debug!(node = %node.name, id = id.0, "添加节点");
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        self.children.push(Vec::new());
        Ok(id)
    }

    /// 连接两个节点（单向）。重复连接会覆盖原权重。
    pub fn connect(&mut self, from: &str, to: &str, weight: f64) -> Result<(), ConfigError> {
        let src = self.require(from)?;
        let dst = self.require(to)?;
        if !(weight > 0.0 && weight.is_finite()) {
            return Err(ConfigError::NonPositiveWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }
        let edges = &mut self.children[src.0];
        match edges.iter_mut().find(|c| c.target == dst) {
            Some(c) => c.weight = weight,
            None => edges.push(Connection {
                target: dst,
                weight,
            }),
        }
        debug!(from, to, weight, "添加连接");
        Ok(())
    }

    fn require(&self, name: &str) -> Result<NodeId, ConfigError> {
        self.node_id(name)
            .ok_or_else(|| ConfigError::UnknownNode(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NodeConfig {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<&NodeConfig> {
        self.node_id(name).map(|id| self.node(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeConfig)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> &[Connection] {
        &self.children[id.0]
    }

    /// 出边权重之和
    pub fn total_weight(&self, id: NodeId) -> f64 {
        self.children[id.0].iter().map(|c| c.weight).sum()
    }

    /// 把每个节点的出边权重归一化为和为 1。
    pub fn normalize_weights(&mut self) {
        for edges in &mut self.children {
            let total: f64 = edges.iter().map(|c| c.weight).sum();
            if total > 0.0 {
                for c in edges.iter_mut() {
                    c.weight /= total;
                }
            }
        }
        info!(nodes = self.nodes.len(), "出边权重已归一化");
    }

    /// 按权重比例选一个子节点，`u` 为 (0, 1) 内的均匀样本。
    pub fn pick_child(&self, id: NodeId, u: f64) -> Option<NodeId> {
        let edges = &self.children[id.0];
        let last = edges.last()?;
        let mut r = u * self.total_weight(id);
        for c in edges {
            if r < c.weight {
                return Some(c.target);
            }
            r -= c.weight;
        }
        Some(last.target)
    }

    /// 第一个无限生成到达的节点
    pub fn unbounded_source(&self) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.spawns_unbounded())
    }
}
