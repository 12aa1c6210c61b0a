//! 标识符类型
//!
//! 节点在网络中的下标。

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
