//! 节点运行时状态
//!
//! 每次仿真为每个节点创建一份，只由仿真内核修改，结束后取出统计即丢弃。

use std::collections::VecDeque;

use super::event::Event;
use super::stats::NodeStats;
use super::time::SimTime;
use crate::dist::Sampler;
use crate::error::SimError;
use crate::net::{NodeConfig, NodeId};
use crate::rng::Rng;

#[derive(Debug, Clone)]
pub struct NodeState {
    pub id: NodeId,
    servers: u64,
    capacity: u64,
    busy: u64,
    unavailable: u64,
    /// 在节点内作业的到达时刻，FIFO
    queue: VecDeque<f64>,
    stats: NodeStats,
    service: Sampler,
    outage: Option<Sampler>,
}

fn non_positive(cfg: &NodeConfig, attempts: u32) -> SimError {
    SimError::NonPositiveSample {
        node: cfg.name.clone(),
        attempts,
    }
}

impl NodeState {
    pub fn new(id: NodeId, cfg: &NodeConfig) -> Self {
        Self {
            id,
            servers: cfg.servers_limit(),
            capacity: cfg.queue_limit(),
            busy: 0,
            unavailable: 0,
            queue: VecDeque::new(),
            stats: NodeStats::default(),
            service: Sampler::from(&cfg.service),
            outage: cfg.unavailable.as_ref().map(Sampler::from),
        }
    }

    pub fn busy(&self) -> u64 {
        self.busy
    }

    pub fn unavailable(&self) -> u64 {
        self.unavailable
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub(crate) fn into_stats(self) -> NodeStats {
        self.stats
    }

    /// 有空闲且可用的服务台
    pub fn can_serve(&self) -> bool {
        self.busy.saturating_add(self.unavailable) < self.servers
    }

    /// 有尚未开始服务的作业
    pub fn has_requests(&self) -> bool {
        self.queue.len() as u64 > self.busy
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() as u64 >= self.capacity
    }

    /// 先按事件发生前的服务台状态累计时长。
    pub(crate) fn advance(&mut self, now: SimTime) {
        self.stats
            .advance(now.0, self.busy, self.unavailable, self.servers);
    }

    pub(crate) fn enqueue(&mut self, now: SimTime) {
        self.queue.push_back(now.0);
        self.stats.record_arrival(self.queue.len());
    }

    /// 最早的作业离开；`started` 为其服务开始时刻。
    pub(crate) fn dequeue(&mut self, now: SimTime, started: SimTime) {
        if let Some(arrived) = self.queue.pop_front() {
            let response = now.0 - arrived;
            let wait = (started.0 - arrived).max(0.0);
            self.stats.record_departure(response, wait);
        }
        self.busy = self.busy.saturating_sub(1);
        self.stats.refresh();
    }

    pub(crate) fn restore_server(&mut self) {
        self.unavailable = self.unavailable.saturating_sub(1);
    }

    /// 能服务且有作业时开始一次服务，返回对应的离开事件。
    pub(crate) fn start_service(
        &mut self,
        now: SimTime,
        rng: &mut Rng,
        cfg: &NodeConfig,
    ) -> Result<Option<Event>, SimError> {
        if !(self.can_serve() && self.has_requests()) {
            return Ok(None);
        }
        let delay = self
            .service
            .positive_sample(rng)
            .map_err(|e| non_positive(cfg, e.attempts))?;
        self.busy += 1;
        Ok(Some(Event::departure(self.id, now, now.after(delay))))
    }

    /// 按停机分布尝试让一个空闲服务台停机，返回恢复事件。
    pub(crate) fn start_outage(
        &mut self,
        now: SimTime,
        rng: &mut Rng,
        cfg: &NodeConfig,
    ) -> Result<Option<Event>, SimError> {
        let Some(outage) = self.outage.as_mut() else {
            return Ok(None);
        };
        if self.busy.saturating_add(self.unavailable) >= self.servers {
            return Ok(None);
        }
        let delay = outage
            .sample(rng)
            .map_err(|e| non_positive(cfg, e.attempts))?;
        if delay <= 0.0 {
            return Ok(None);
        }
        self.unavailable += 1;
        Ok(Some(Event::available(self.id, now, now.after(delay))))
    }

    /// 自行生成下一个到达时使用的独立间隔
    pub(crate) fn next_gap(&mut self, rng: &mut Rng, cfg: &NodeConfig) -> Result<f64, SimError> {
        self.service
            .positive_sample(rng)
            .map_err(|e| non_positive(cfg, e.attempts))
    }
}
