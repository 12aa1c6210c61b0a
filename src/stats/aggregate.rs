//! 多次仿真的聚合
//!
//! `AggregateResult::from_runs` 两遍扫描全部结果；`ResultSummary` 一次加入一个结果，
//! 只保存每个统计量的 Welford 汇总。两者对同一组数据给出一致的数值。

use std::time::Duration;

use super::stat::{STAT_COUNT, Stat};
use super::student::t_critical;
use super::summary::{Summary, check_confidence};
use crate::error::StatsError;
use crate::sim::{NodeResult, NodeStats, RunResult};
use serde::{Deserialize, Serialize};

/// 聚合结果：均值、方差和误差半宽各用一个 `RunResult` 表示。
///
/// 其中 `time` 为最终仿真时间的对应量，`elapsed` 恒为零。只由仿真输出决定，
/// 同一组结果无论顺序还是并行得到都相等；墙钟耗时见 `ResultSummary::wall_clock`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub runs: usize,
    pub confidence: f64,
    pub average: RunResult,
    pub variance: RunResult,
    pub error: RunResult,
}

fn template(seed: u64, names: &[String]) -> RunResult {
    RunResult {
        seed,
        time: 0.0,
        elapsed: Duration::ZERO,
        nodes: names
            .iter()
            .map(|name| NodeResult {
                name: name.clone(),
                stats: NodeStats::default(),
            })
            .collect(),
    }
}

fn stats_of<'r>(run: &'r RunResult, idx: usize, name: &str) -> Result<&'r NodeStats, StatsError> {
    // 同一网络的结果节点顺序一致，先按下标找
    match run.nodes.get(idx) {
        Some(n) if n.name == name => Ok(&n.stats),
        _ => run
            .node(name)
            .ok_or_else(|| StatsError::UnknownNode(name.to_string())),
    }
}

impl AggregateResult {
    /// 批量聚合，至少需要 2 次仿真。
    pub fn from_runs(runs: &[RunResult], confidence: f64) -> Result<Self, StatsError> {
        check_confidence(confidence)?;
        if runs.len() < 2 {
            return Err(StatsError::NotEnoughRuns(runs.len()));
        }
        let n = runs.len() as f64;
        let t = t_critical(confidence, n - 1.0);
        let names: Vec<String> = runs[0].node_names().map(str::to_string).collect();
        let seed = runs[0].seed;
        let mut average = template(seed, &names);
        let mut variance = template(seed, &names);
        let mut error = template(seed, &names);

        let times: Vec<f64> = runs.iter().map(|r| r.time).collect();
        let (m, v) = mean_var(&times);
        average.time = m;
        variance.time = v;
        error.time = t * v.sqrt() / n.sqrt();

        for (idx, name) in names.iter().enumerate() {
            let per_run = runs
                .iter()
                .map(|r| stats_of(r, idx, name))
                .collect::<Result<Vec<_>, _>>()?;
            for stat in Stat::ALL {
                let xs: Vec<f64> = per_run.iter().map(|s| stat.get(s)).collect();
                let (m, v) = mean_var(&xs);
                stat.set(&mut average.nodes[idx].stats, m);
                stat.set(&mut variance.nodes[idx].stats, v);
                stat.set(&mut error.nodes[idx].stats, t * v.sqrt() / n.sqrt());
            }
        }

        Ok(Self {
            runs: runs.len(),
            confidence,
            average,
            variance,
            error,
        })
    }

    fn lookup(&self, which: &RunResult, node: &str, stat: Stat) -> Result<f64, StatsError> {
        which
            .node(node)
            .map(|s| stat.get(s))
            .ok_or_else(|| StatsError::UnknownNode(node.to_string()))
    }

    pub fn mean(&self, node: &str, stat: Stat) -> Result<f64, StatsError> {
        self.lookup(&self.average, node, stat)
    }

    pub fn std_dev(&self, node: &str, stat: Stat) -> Result<f64, StatsError> {
        Ok(self.lookup(&self.variance, node, stat)?.sqrt())
    }

    /// 置信区间 `(lower, upper)`
    pub fn bounds(&self, node: &str, stat: Stat) -> Result<(f64, f64), StatsError> {
        let m = self.mean(node, stat)?;
        let e = self.lookup(&self.error, node, stat)?;
        Ok((m - e, m + e))
    }

    pub fn relative_error(&self, node: &str, stat: Stat) -> Result<f64, StatsError> {
        let m = self.mean(node, stat)?;
        let e = self.lookup(&self.error, node, stat)?;
        Ok(if m == 0.0 {
            if e == 0.0 { 0.0 } else { f64::INFINITY }
        } else {
            e / m.abs()
        })
    }
}

/// 两遍法均值与样本方差
fn mean_var(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    if xs.len() < 2 {
        return (mean, 0.0);
    }
    let ss: f64 = xs.iter().map(|x| (x - mean) * (x - mean)).sum();
    (mean, ss / (n - 1.0))
}

/// 增量汇总：每个节点每个统计量一个 `Summary`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSummary {
    runs: usize,
    seed: Option<u64>,
    time: Summary,
    wall_clock: Duration,
    nodes: Vec<(String, [Summary; STAT_COUNT])>,
}

impl ResultSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, run: &RunResult) {
        self.runs += 1;
        self.seed.get_or_insert(run.seed);
        self.time.add(run.time);
        self.wall_clock += run.elapsed;
        for (idx, node) in run.nodes.iter().enumerate() {
            let slot = match self.nodes.get(idx) {
                Some((name, _)) if *name == node.name => idx,
                _ => match self.nodes.iter().position(|(name, _)| *name == node.name) {
                    Some(i) => i,
                    None => {
                        self.nodes
                            .push((node.name.clone(), [Summary::default(); STAT_COUNT]));
                        self.nodes.len() - 1
                    }
                },
            };
            let summaries = &mut self.nodes[slot].1;
            for (summary, v) in summaries.iter_mut().zip(Stat::values(&node.stats)) {
                summary.add(v);
            }
        }
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// 已加入结果的墙钟耗时之和
    pub fn wall_clock(&self) -> Duration {
        self.wall_clock
    }

    pub fn time(&self) -> &Summary {
        &self.time
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, node: &str, stat: Stat) -> Result<&Summary, StatsError> {
        self.nodes
            .iter()
            .find(|(name, _)| name == node)
            .map(|(_, s)| &s[stat.index()])
            .ok_or_else(|| StatsError::UnknownNode(node.to_string()))
    }

    /// 转为与批量聚合同形的结果，至少需要 2 次仿真。
    pub fn aggregate(&self, confidence: f64) -> Result<AggregateResult, StatsError> {
        check_confidence(confidence)?;
        if self.runs < 2 {
            return Err(StatsError::NotEnoughRuns(self.runs));
        }
        let names: Vec<String> = self.nodes.iter().map(|(n, _)| n.clone()).collect();
        let seed = self.seed.unwrap_or_default();
        let mut average = template(seed, &names);
        let mut variance = template(seed, &names);
        let mut error = template(seed, &names);

        average.time = self.time.mean();
        variance.time = self.time.variance();
        error.time = self.time.error(confidence)?;

        for (idx, (_, summaries)) in self.nodes.iter().enumerate() {
            for stat in Stat::ALL {
                let s = &summaries[stat.index()];
                stat.set(&mut average.nodes[idx].stats, s.mean());
                stat.set(&mut variance.nodes[idx].stats, s.variance());
                stat.set(&mut error.nodes[idx].stats, s.error(confidence)?);
            }
        }

        Ok(AggregateResult {
            runs: self.runs,
            confidence,
            average,
            variance,
            error,
        })
    }
}
