//! 统计量标识表
//!
//! 固定顺序的统计量枚举，每项对应 `NodeStats` 的一对读写函数。
//! 导出格式依赖此顺序，调整顺序必须同时提升 `STATS_FORMAT_VERSION`。

use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;
use crate::sim::NodeStats;
use serde::{Deserialize, Serialize};

pub const STATS_FORMAT_VERSION: u32 = 1;
pub const STAT_COUNT: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    NumArrivals,
    NumDepartures,
    AvgQueueLength,
    MaxQueueLength,
    BusyTime,
    UnavailableTime,
    ResponseTime,
    WaitTime,
    LastEventTime,
    Throughput,
    Utilization,
    Unavailability,
    AvgWaitTime,
    AvgResponse,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::NumArrivals,
        Stat::NumDepartures,
        Stat::AvgQueueLength,
        Stat::MaxQueueLength,
        Stat::BusyTime,
        Stat::UnavailableTime,
        Stat::ResponseTime,
        Stat::WaitTime,
        Stat::LastEventTime,
        Stat::Throughput,
        Stat::Utilization,
        Stat::Unavailability,
        Stat::AvgWaitTime,
        Stat::AvgResponse,
    ];

    /// 在 `ALL` 中的位置
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stat::NumArrivals => "num_arrivals",
            Stat::NumDepartures => "num_departures",
            Stat::AvgQueueLength => "avg_queue_length",
            Stat::MaxQueueLength => "max_queue_length",
            Stat::BusyTime => "busy_time",
            Stat::UnavailableTime => "unavailable_time",
            Stat::ResponseTime => "response_time",
            Stat::WaitTime => "wait_time",
            Stat::LastEventTime => "last_event_time",
            Stat::Throughput => "throughput",
            Stat::Utilization => "utilization",
            Stat::Unavailability => "unavailability",
            Stat::AvgWaitTime => "avg_wait_time",
            Stat::AvgResponse => "avg_response",
        }
    }

    fn field(self, s: &mut NodeStats) -> &mut f64 {
        match self {
            Stat::NumArrivals => &mut s.num_arrivals,
            Stat::NumDepartures => &mut s.num_departures,
            Stat::AvgQueueLength => &mut s.avg_queue_length,
            Stat::MaxQueueLength => &mut s.max_queue_length,
            Stat::BusyTime => &mut s.busy_time,
            Stat::UnavailableTime => &mut s.unavailable_time,
            Stat::ResponseTime => &mut s.response_time,
            Stat::WaitTime => &mut s.wait_time,
            Stat::LastEventTime => &mut s.last_event_time,
            Stat::Throughput => &mut s.throughput,
            Stat::Utilization => &mut s.utilization,
            Stat::Unavailability => &mut s.unavailability,
            Stat::AvgWaitTime => &mut s.avg_wait_time,
            Stat::AvgResponse => &mut s.avg_response,
        }
    }

    pub fn get(self, s: &NodeStats) -> f64 {
        match self {
            Stat::NumArrivals => s.num_arrivals,
            Stat::NumDepartures => s.num_departures,
            Stat::AvgQueueLength => s.avg_queue_length,
            Stat::MaxQueueLength => s.max_queue_length,
            Stat::BusyTime => s.busy_time,
            Stat::UnavailableTime => s.unavailable_time,
            Stat::ResponseTime => s.response_time,
            Stat::WaitTime => s.wait_time,
            Stat::LastEventTime => s.last_event_time,
            Stat::Throughput => s.throughput,
            Stat::Utilization => s.utilization,
            Stat::Unavailability => s.unavailability,
            Stat::AvgWaitTime => s.avg_wait_time,
            Stat::AvgResponse => s.avg_response,
        }
    }

    pub fn set(self, s: &mut NodeStats, value: f64) {
        *self.field(s) = value;
    }

    /// 按固定顺序取出全部统计量
    pub fn values(s: &NodeStats) -> [f64; STAT_COUNT] {
        Stat::ALL.map(|stat| stat.get(s))
    }

    /// 由固定顺序的数组还原
    pub fn from_values(values: &[f64; STAT_COUNT]) -> NodeStats {
        let mut s = NodeStats::default();
        for (stat, v) in Stat::ALL.iter().zip(values) {
            stat.set(&mut s, *v);
        }
        s
    }
}

impl FromStr for Stat {
    type Err = StatsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| StatsError::UnknownStat(name.to_string()))
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
