//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、事件、节点状态机、
//! 终止条件和仿真器。

// 子模块声明
mod end_criteria;
mod event;
mod result;
mod scheduled_event;
mod simulator;
mod state;
mod stats;
mod time;

// 重新导出公共接口
pub use end_criteria::EndCriteria;
pub use event::{Event, EventKind};
pub use result::{NodeResult, RunResult};
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use state::NodeState;
pub use stats::NodeStats;
pub use time::SimTime;
