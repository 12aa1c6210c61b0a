//! 网络拓扑模块
//!
//! 此模块包含服务节点配置、带权连接和网络拓扑，以及网络描述文件的读写。

// 子模块声明
mod id;
mod network;
mod node;
mod spec;

// 重新导出公共接口
pub use id::NodeId;
pub use network::{Connection, Net};
pub use node::NodeConfig;
pub use spec::{ConnectionSpec, NET_SCHEMA_VERSION, NetSpec};
