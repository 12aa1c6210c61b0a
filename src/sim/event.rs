//! 事件
//!
//! 三种事件作用在单个节点上：到达、离开、恢复可用。

use super::time::SimTime;
use crate::net::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
    /// 一段停机结束，一个服务台恢复
    BecomesAvailable,
}

/// 不可变事件：`time` 触发，`started` 为调度时刻（服务/停机开始）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: SimTime,
    pub started: SimTime,
    pub kind: EventKind,
    pub node: NodeId,
}

impl Event {
    pub fn arrival(node: NodeId, time: SimTime) -> Self {
        Self {
            time,
            started: time,
            kind: EventKind::Arrival,
            node,
        }
    }

    pub fn departure(node: NodeId, started: SimTime, time: SimTime) -> Self {
        Self {
            time,
            started,
            kind: EventKind::Departure,
            node,
        }
    }

    pub fn available(node: NodeId, started: SimTime, time: SimTime) -> Self {
        Self {
            time,
            started,
            kind: EventKind::BecomesAvailable,
            node,
        }
    }
}
