//! 节点统计
//!
//! 每个节点一份累加器。派生指标（吞吐量、利用率、平均等待等）每次更新后
//! 都从累计量重新计算，不单独累加。

use serde::{Deserialize, Serialize};

/// 节点统计信息。计数也用 `f64` 保存，便于跨多次仿真求均值和方差。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub num_arrivals: f64,
    pub num_departures: f64,
    /// 到达时刻（含自身）看到的平均队长
    pub avg_queue_length: f64,
    pub max_queue_length: f64,
    /// 至少一个服务台忙的累计时长
    pub busy_time: f64,
    /// 全部服务台同时停机的累计时长
    pub unavailable_time: f64,
    /// 响应时间累计
    pub response_time: f64,
    /// 等待时间累计
    pub wait_time: f64,
    pub last_event_time: f64,
    pub throughput: f64,
    pub utilization: f64,
    pub unavailability: f64,
    pub avg_wait_time: f64,
    pub avg_response: f64,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

impl NodeStats {
    /// 记录一个到达，`queue_len` 为入队后的队长
    pub fn record_arrival(&mut self, queue_len: usize) {
        let total = self.avg_queue_length * self.num_arrivals;
        self.num_arrivals += 1.0;
        self.avg_queue_length = (total + queue_len as f64) / self.num_arrivals;
        self.max_queue_length = self.max_queue_length.max(queue_len as f64);
    }

    pub fn record_departure(&mut self, response: f64, wait: f64) {
        self.num_departures += 1.0;
        self.response_time += response;
        self.wait_time += wait;
    }

    /// 把 `[last_event_time, now]` 这一段计入忙/停机时长。
    ///
    /// `busy`/`unavailable` 是这段时间内的服务台状态，`servers` 为服务台上限。
    pub fn advance(&mut self, now: f64, busy: u64, unavailable: u64, servers: u64) {
        let dt = now - self.last_event_time;
        if busy > 0 {
            self.busy_time += dt;
        }
        if servers != u64::MAX && unavailable >= servers {
            self.unavailable_time += dt;
        }
        self.last_event_time = now;
        self.refresh();
    }

    /// 重新计算派生指标
    pub fn refresh(&mut self) {
        let t = self.last_event_time;
        self.throughput = ratio(self.num_departures, t);
        self.utilization = ratio(self.busy_time, t);
        self.unavailability = ratio(self.unavailable_time, t);
        self.avg_wait_time = ratio(self.wait_time, self.num_departures);
        self.avg_response = ratio(self.response_time, self.num_departures);
    }
}
