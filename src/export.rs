//! 结果导出
//!
//! 每个 (种子, 节点) 一条记录：`seed,time,elapsed_ns,node,<统计量...>`，
//! 统计量顺序即 `Stat::ALL`。浮点数按最短可还原形式输出，导入后逐字段相等。

use std::time::Duration;

use crate::error::InputError;
use crate::sim::{NodeResult, RunResult};
use crate::stats::{STAT_COUNT, Stat};

const PREFIX: [&str; 4] = ["seed", "time", "elapsed_ns", "node"];

/// 表头行
pub fn header() -> String {
    PREFIX
        .iter()
        .copied()
        .chain(Stat::ALL.iter().map(|s| s.name()))
        .collect::<Vec<_>>()
        .join(",")
}

/// 一条扁平记录
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub seed: u64,
    pub time: f64,
    pub elapsed: Duration,
    pub node: String,
    pub values: [f64; STAT_COUNT],
}

impl Record {
    pub fn to_line(&self) -> String {
        let mut fields = vec![
            self.seed.to_string(),
            self.time.to_string(),
            self.elapsed.as_nanos().to_string(),
            self.node.clone(),
        ];
        fields.extend(self.values.iter().map(f64::to_string));
        fields.join(",")
    }

    /// 解析一行；`line` 为行号（从 1 开始），用于报错。
    pub fn parse(line: usize, text: &str) -> Result<Self, InputError> {
        let err = |token: &str, reason: &str| InputError::Record {
            line,
            token: token.to_string(),
            reason: reason.to_string(),
        };
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != PREFIX.len() + STAT_COUNT {
            return Err(err(
                text,
                &format!(
                    "expected {} fields, got {}",
                    PREFIX.len() + STAT_COUNT,
                    fields.len()
                ),
            ));
        }
        let seed = fields[0]
            .parse::<u64>()
            .map_err(|_| err(fields[0], "invalid seed"))?;
        let time = fields[1]
            .parse::<f64>()
            .map_err(|_| err(fields[1], "invalid time"))?;
        let elapsed = fields[2]
            .parse::<u64>()
            .map_err(|_| err(fields[2], "invalid elapsed_ns"))?;
        let node = fields[3];
        if node.is_empty() {
            return Err(err(node, "empty node name"));
        }
        let mut values = [0.0; STAT_COUNT];
        for (i, (v, token)) in values.iter_mut().zip(&fields[PREFIX.len()..]).enumerate() {
            *v = token
                .parse::<f64>()
                .map_err(|_| err(*token, &format!("invalid value for {}", Stat::ALL[i])))?;
        }
        Ok(Self {
            seed,
            time,
            elapsed: Duration::from_nanos(elapsed),
            node: node.to_string(),
            values,
        })
    }
}

/// 一次仿真展开为记录
pub fn records(run: &RunResult) -> Vec<Record> {
    run.nodes
        .iter()
        .map(|n| Record {
            seed: run.seed,
            time: run.time,
            // 超出 u64 纳秒（约 584 年）的耗时按饱和处理
            elapsed: Duration::from_nanos(u64::try_from(run.elapsed.as_nanos()).unwrap_or(u64::MAX)),
            node: n.name.clone(),
            values: Stat::values(&n.stats),
        })
        .collect()
}

/// 导出为 CSV 文本（含表头）。节点名不能含 `,`、`"` 或换行。
pub fn to_csv(runs: &[RunResult]) -> Result<String, InputError> {
    let mut out = header();
    out.push('\n');
    for run in runs {
        for rec in records(run) {
            if rec.node.contains([',', '"', '\n', '\r']) {
                return Err(InputError::Record {
                    line: 0,
                    token: rec.node,
                    reason: "node name cannot be stored in a record".to_string(),
                });
            }
            out.push_str(&rec.to_line());
            out.push('\n');
        }
    }
    Ok(out)
}

/// 从 CSV 文本还原结果。种子改变或节点名重复时开始新的一次仿真。
pub fn from_csv(text: &str) -> Result<Vec<RunResult>, InputError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let expected = header();
    match lines.next() {
        Some((_, h)) if h.trim() == expected => {}
        Some((i, h)) => {
            let token = h
                .split(',')
                .zip(expected.split(','))
                .find(|(got, want)| got.trim() != *want)
                .map_or(h, |(got, _)| got);
            return Err(InputError::Record {
                line: i + 1,
                token: token.to_string(),
                reason: "unexpected header".to_string(),
            });
        }
        None => return Ok(Vec::new()),
    }

    let mut runs: Vec<RunResult> = Vec::new();
    for (i, line) in lines {
        let rec = Record::parse(i + 1, line.trim_end_matches('\r'))?;
        let starts_new = match runs.last() {
            Some(run) => run.seed != rec.seed || run.node(&rec.node).is_some(),
            None => true,
        };
        if starts_new {
            runs.push(RunResult {
                seed: rec.seed,
                time: rec.time,
                elapsed: rec.elapsed,
                nodes: Vec::new(),
            });
        }
        if let Some(run) = runs.last_mut() {
            run.nodes.push(NodeResult {
                name: rec.node,
                stats: Stat::from_values(&rec.values),
            });
        }
    }
    Ok(runs)
}
