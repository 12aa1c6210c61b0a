//! 网络描述文件
//!
//! JSON 形式的网络描述，带 schema 版本号；与 `Net` 互相转换。

use super::network::Net;
use super::node::NodeConfig;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const NET_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSpec {
    pub schema_version: u32,
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

impl NetSpec {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

impl Net {
    /// 由描述构造网络，检查版本、节点名和边。
    pub fn from_spec(spec: &NetSpec) -> Result<Self, ConfigError> {
        if spec.schema_version != NET_SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchema(spec.schema_version));
        }
        let mut net = Net::new();
        for node in &spec.nodes {
            net.add_node(node.clone())?;
        }
        for c in &spec.connections {
            net.connect(&c.from, &c.to, c.weight)?;
        }
        Ok(net)
    }

    pub fn to_spec(&self) -> NetSpec {
        let mut connections = Vec::new();
        for (id, node) in self.nodes() {
            for c in self.children(id) {
                connections.push(ConnectionSpec {
                    from: node.name.clone(),
                    to: self.node(c.target).name.clone(),
                    weight: c.weight,
                });
            }
        }
        NetSpec {
            schema_version: NET_SCHEMA_VERSION,
            nodes: self.nodes().map(|(_, n)| n.clone()).collect(),
            connections,
        }
    }
}
