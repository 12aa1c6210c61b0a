//! 多次仿真的调度
//!
//! 从一个顶层种子派生子流，第 i 次仿真使用第 i 个子流，各自构造独立的节点状态；
//! 网络拓扑只读共享。并行模式下用有界 rayon 线程池执行，结果按仿真序号收集，
//! 因此与顺序模式逐位一致。任一仿真出错即中止整批，不返回部分结果。

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::{Result, SimError, StatsError};
use crate::net::Net;
use crate::rng::{self, MAX_STREAMS, Rng};
use crate::sim::{EndCriteria, RunResult, Simulator};
use crate::stats::{AggregateResult, ConfidenceIndices, DEFAULT_CONFIDENCE, ResultSummary};
use rayon::prelude::*;
use tracing::{debug, info};

/// 带置信目标的运行结果
#[derive(Debug, Clone)]
pub struct ConfidentRun {
    pub summary: ResultSummary,
    /// 是否在达到上限前满足了全部目标
    pub satisfied: bool,
}

/// 仿真调度器
#[derive(Debug, Clone)]
pub struct Runner {
    net: Net,
    confidence: f64,
}

impl Runner {
    pub fn new(net: Net) -> Self {
        Self {
            net,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// 聚合结果使用的置信水平
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn net(&self) -> &Net {
        &self.net
    }

    /// 在发起任何仿真前检查网络与终止条件。
    fn validate(&self, criteria: &[EndCriteria]) -> Result<()> {
        Simulator::new(&self.net, Rng::default(), criteria).map(|_| ())
    }

    fn run_one(&self, run: usize, rng: Rng, criteria: &[EndCriteria]) -> Result<RunResult> {
        let seed = rng.seed();
        Simulator::new(&self.net, rng, criteria)
            .and_then(Simulator::run)
            .map_err(|e| SimError::RunFailed {
                run,
                seed,
                source: Box::new(e),
            })
    }

    fn run_range(
        &self,
        seed: u64,
        range: Range<usize>,
        criteria: &[EndCriteria],
        parallel: bool,
    ) -> Result<Vec<RunResult>> {
        let start = range.start;
        let rngs = rng::stream_range(seed, range);
        if !parallel || rngs.len() < 2 {
            return rngs
                .into_iter()
                .enumerate()
                .map(|(i, rng)| self.run_one(start + i, rng, criteria))
                .collect();
        }

        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let threads = rngs.len().min(available);
        debug!(threads, runs = rngs.len(), "构建线程池");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("net-sim-{i}"))
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;
        pool.install(|| {
            rngs.into_par_iter()
                .enumerate()
                .map(|(i, rng)| self.run_one(start + i, rng, criteria))
                .collect()
        })
    }

    /// 执行 `runs` 次仿真并返回全部原始结果（按序号排列）。
    #[tracing::instrument(skip(self, criteria))]
    pub fn run_results(
        &self,
        seed: u64,
        runs: usize,
        criteria: &[EndCriteria],
        parallel: bool,
    ) -> Result<Vec<RunResult>> {
        self.validate(criteria)?;
        rng::warn_if_overlapping(runs);
        info!("▶️  开始批量仿真");
        let results = self.run_range(seed, 0..runs, criteria, parallel)?;
        info!(completed = results.len(), "✅ 批量仿真完成");
        Ok(results)
    }

    fn aggregate(
        &self,
        seed: u64,
        runs: usize,
        criteria: &[EndCriteria],
        parallel: bool,
    ) -> Result<AggregateResult> {
        if runs < 2 {
            return Err(StatsError::NotEnoughRuns(runs).into());
        }
        let results = self.run_results(seed, runs, criteria, parallel)?;
        Ok(AggregateResult::from_runs(&results, self.confidence)?)
    }

    /// 顺序执行并聚合
    pub fn run(&self, seed: u64, runs: usize, criteria: &[EndCriteria]) -> Result<AggregateResult> {
        self.aggregate(seed, runs, criteria, false)
    }

    /// 并行执行并聚合，结果与 `run` 相同
    pub fn run_parallel(
        &self,
        seed: u64,
        runs: usize,
        criteria: &[EndCriteria],
    ) -> Result<AggregateResult> {
        self.aggregate(seed, runs, criteria, true)
    }

    /// 每批 `batch` 次仿真，逐个加入增量汇总，直到全部置信目标满足或达到 `max_runs`。
    #[tracing::instrument(skip(self, criteria, targets))]
    pub fn run_until_confident(
        &self,
        seed: u64,
        criteria: &[EndCriteria],
        targets: &ConfidenceIndices,
        batch: usize,
        max_runs: usize,
        parallel: bool,
    ) -> Result<ConfidentRun> {
        self.validate(criteria)?;
        let batch = batch.max(1);
        let mut summary = ResultSummary::new();
        let mut satisfied = false;
        let mut done = 0;
        while done < max_runs {
            let n = batch.min(max_runs - done);
            if done <= MAX_STREAMS && done + n > MAX_STREAMS {
                rng::warn_if_overlapping(done + n);
            }
            for r in self.run_range(seed, done..done + n, criteria, parallel)? {
                summary.add(&r);
            }
            done += n;
            satisfied = targets.is_satisfied(&summary)?;
            debug!(runs = done, satisfied, "批次完成");
            if satisfied {
                break;
            }
        }
        info!(runs = done, satisfied, "✅ 置信目标检查结束");
        Ok(ConfidentRun { summary, satisfied })
    }
}
