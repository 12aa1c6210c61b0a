//! 仿真内核
//!
//! 以未来事件表驱动一次仿真直到结束：`Running` → `Ended`。
//! 每个节点的状态机在这里按事件类型分派。

use super::end_criteria::EndCriteria;
use super::event::{Event, EventKind};
use super::result::{NodeResult, RunResult};
use super::scheduled_event::ScheduledEvent;
use super::state::NodeState;
use super::time::SimTime;
use crate::error::{ConfigError, Result};
use crate::net::{Net, NodeId};
use crate::rng::Rng;
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, info, trace};

/// 解析好节点下标的终止条件
#[derive(Debug, Clone, Copy)]
enum Stop {
    Arrivals(NodeId, u64),
    Departures(NodeId, u64),
    Time(f64),
}

fn resolve_stop(net: &Net, c: &EndCriteria) -> std::result::Result<Stop, ConfigError> {
    let resolve = |name: &str| {
        net.node_id(name)
            .ok_or_else(|| ConfigError::UnknownNode(name.to_string()))
    };
    Ok(match c {
        EndCriteria::MaxArrivals { node, count } => Stop::Arrivals(resolve(node.as_str())?, *count),
        EndCriteria::MaxDepartures { node, count } => Stop::Departures(resolve(node.as_str())?, *count),
        EndCriteria::MaxTime { time } => Stop::Time(*time),
    })
}

/// 事件驱动仿真器：维护当前时间、事件队列和各节点状态。
pub struct Simulator<'a> {
    net: &'a Net,
    rng: Rng,
    seed: u64,
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    states: Vec<NodeState>,
    stops: Vec<Stop>,
    pending: Vec<Event>,
    processed: u64,
    dropped: u64,
    started_at: Instant,
}

impl<'a> Simulator<'a> {
    /// 创建仿真并为每个会生成到达的节点放入时刻 0 的首个到达。
    ///
    /// 网络中有无限生成到达的节点而又没有终止条件时直接报错。
    pub fn new(net: &'a Net, rng: Rng, criteria: &[EndCriteria]) -> Result<Self> {
        if criteria.is_empty() {
            if let Some(node) = net.unbounded_source() {
                return Err(ConfigError::NoTermination(node.name.clone()).into());
            }
        }

        let stops = criteria
            .iter()
            .map(|c| resolve_stop(net, c))
            .collect::<std::result::Result<Vec<_>, ConfigError>>()?;

        let states = net.nodes().map(|(id, cfg)| NodeState::new(id, cfg)).collect();
        let seed = rng.seed();
        let mut sim = Self {
            net,
            rng,
            seed,
            now: SimTime::ZERO,
            next_seq: 0,
            q: BinaryHeap::new(),
            states,
            stops,
            pending: Vec::new(),
            processed: 0,
            dropped: 0,
            started_at: Instant::now(),
        };
        for (id, cfg) in net.nodes() {
            if !cfg.spawns_nothing() {
                sim.schedule(Event::arrival(id, SimTime::ZERO));
            }
        }
        debug!(seed, initial_events = sim.q.len(), "仿真已初始化");
        Ok(sim)
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 已处理的事件数
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// 因目标队列已满被丢弃的作业数
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn pending_events(&self) -> usize {
        self.q.len()
    }

    pub fn node_state(&self, name: &str) -> Option<&NodeState> {
        self.net.node_id(name).map(|id| &self.states[id.0])
    }

    pub fn states(&self) -> &[NodeState] {
        &self.states
    }

    fn schedule(&mut self, ev: Event) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at: ev.time,
            seq,
            ev,
        });
    }

    /// 事件表为空或任一终止条件满足
    pub fn is_ended(&self) -> bool {
        self.q.is_empty()
            || self.stops.iter().any(|s| match *s {
                Stop::Arrivals(id, n) => self.states[id.0].stats().num_arrivals >= n as f64,
                Stop::Departures(id, n) => self.states[id.0].stats().num_departures >= n as f64,
                Stop::Time(t) => self.now.0 >= t,
            })
    }

    /// 处理一个事件；已经结束时返回 `false`。
    pub fn step(&mut self) -> Result<bool> {
        if self.is_ended() {
            return Ok(false);
        }
        let Some(item) = self.q.pop() else {
            return Ok(false);
        };
        self.now = item.at;
        self.processed += 1;
        trace!(now = self.now.0, seq = item.seq, kind = ?item.ev.kind, node = item.ev.node.0, "执行事件");

        let mut out = std::mem::take(&mut self.pending);
        let res = match item.ev.kind {
            EventKind::Arrival => self.on_arrival(item.ev, &mut out),
            EventKind::Departure => self.on_departure(item.ev, &mut out),
            EventKind::BecomesAvailable => self.on_available(item.ev, &mut out),
        };
        for ev in out.drain(..) {
            self.schedule(ev);
        }
        self.pending = out;
        res.map(|_| true)
    }

    fn on_arrival(&mut self, ev: Event, out: &mut Vec<Event>) -> Result<()> {
        let cfg = self.net.node(ev.node);
        let state = &mut self.states[ev.node.0];
        state.advance(self.now);
        state.enqueue(self.now);

        let departure = state.start_service(self.now, &mut self.rng, cfg)?;
        if let Some(d) = departure {
            out.push(d);
        }
        // 生成到达的节点：刚开始的服务时长同时作为到达间隔。
        if cfg.should_spawn(state.stats().num_arrivals as u64) {
            let at = match departure {
                Some(d) => d.time,
                None => self.now.after(state.next_gap(&mut self.rng, cfg)?),
            };
            out.push(Event::arrival(ev.node, at));
        }
        Ok(())
    }

    fn on_departure(&mut self, ev: Event, out: &mut Vec<Event>) -> Result<()> {
        let cfg = self.net.node(ev.node);
        let state = &mut self.states[ev.node.0];
        state.advance(self.now);
        state.dequeue(self.now, ev.started);

        // 先抽停机：停机的服务台不接下一个作业
        if let Some(a) = state.start_outage(self.now, &mut self.rng, cfg)? {
            trace!(node = %cfg.name, until = a.time.0, "服务台停机");
            out.push(a);
        }
        if let Some(d) = state.start_service(self.now, &mut self.rng, cfg)? {
            out.push(d);
        }

        if self.net.children(ev.node).is_empty() {
            return Ok(());
        }
        let u = self.rng.random();
        if let Some(target) = self.net.pick_child(ev.node, u) {
            if self.states[target.0].is_full() {
                self.dropped += 1;
                debug!(from = %cfg.name, to = %self.net.node(target).name, "目标队列已满，丢弃作业");
            } else {
                out.push(Event::arrival(target, self.now));
            }
        }
        Ok(())
    }

    fn on_available(&mut self, ev: Event, out: &mut Vec<Event>) -> Result<()> {
        let cfg = self.net.node(ev.node);
        let state = &mut self.states[ev.node.0];
        state.advance(self.now);
        state.restore_server();
        if let Some(d) = state.start_service(self.now, &mut self.rng, cfg)? {
            out.push(d);
        }
        Ok(())
    }

    /// 运行直到结束，产出结果；节点状态随之消耗。
    #[tracing::instrument(skip(self), fields(seed = self.seed))]
    pub fn run(mut self) -> Result<RunResult> {
        debug!(queue_size = self.q.len(), "▶️  开始运行仿真");
        while self.step()? {}
        let elapsed = self.started_at.elapsed();

        info!(
            total_events = self.processed,
            dropped = self.dropped,
            final_time = self.now.0,
            elapsed_ms = elapsed.as_millis() as u64,
            "✅ 仿真完成"
        );

        let net = self.net;
        let nodes = self
            .states
            .into_iter()
            .map(|s| NodeResult {
                name: net.node(s.id).name.clone(),
                stats: s.into_stats(),
            })
            .collect();
        Ok(RunResult {
            seed: self.seed,
            time: self.now.0,
            elapsed,
            nodes,
        })
    }
}
