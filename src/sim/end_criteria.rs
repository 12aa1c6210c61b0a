//! 终止条件
//!
//! 文本语法：以 `;` 分隔的多段，每段为 `Kind:param1,param2,...`，
//! 支持 `MaxArrivals:<node>,<count>`、`MaxDepartures:<node>,<count>`、`MaxTime:<seconds>`。

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndCriteria {
    /// 节点到达数达到 `count`
    MaxArrivals { node: String, count: u64 },
    /// 节点离开数达到 `count`
    MaxDepartures { node: String, count: u64 },
    /// 仿真时间达到 `time`
    MaxTime { time: f64 },
}

fn invalid(segment: &str, reason: impl Into<String>) -> InputError {
    InputError::EndCriteria {
        segment: segment.to_string(),
        reason: reason.into(),
    }
}

fn node_and_count(segment: &str, params: &[&str]) -> Result<(String, u64), InputError> {
    let [node, count] = params else {
        return Err(invalid(
            segment,
            format!("expected <node>,<count>, got {} parameter(s)", params.len()),
        ));
    };
    if node.is_empty() {
        return Err(invalid(segment, "empty node name"));
    }
    let count = count
        .parse::<u64>()
        .map_err(|_| invalid(segment, format!("'{count}' is not a valid count")))?;
    Ok((node.to_string(), count))
}

impl EndCriteria {
    /// 解析完整的 `;` 分隔文本。空段被忽略。
    pub fn parse_all(text: &str) -> Result<Vec<EndCriteria>, InputError> {
        text.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }

    /// `parse_all` 的逆操作
    pub fn join(criteria: &[EndCriteria]) -> String {
        criteria
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl FromStr for EndCriteria {
    type Err = InputError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let segment = segment.trim();
        let (kind, rest) = segment
            .split_once(':')
            .ok_or_else(|| invalid(segment, "missing ':' after criteria kind"))?;
        let params: Vec<&str> = rest.split(',').map(str::trim).collect();
        match kind.trim() {
            "MaxArrivals" => {
                let (node, count) = node_and_count(segment, &params)?;
                Ok(Self::MaxArrivals { node, count })
            }
            "MaxDepartures" => {
                let (node, count) = node_and_count(segment, &params)?;
                Ok(Self::MaxDepartures { node, count })
            }
            "MaxTime" => {
                let [time] = params.as_slice() else {
                    return Err(invalid(
                        segment,
                        format!("expected <seconds>, got {} parameter(s)", params.len()),
                    ));
                };
                let value = time
                    .parse::<f64>()
                    .map_err(|_| invalid(segment, format!("'{time}' is not a number")))?;
                if !value.is_finite() || value < 0.0 {
                    return Err(invalid(segment, format!("'{time}' is not a valid time")));
                }
                Ok(Self::MaxTime { time: value })
            }
            other => Err(invalid(segment, format!("unknown criteria kind '{other}'"))),
        }
    }
}

impl fmt::Display for EndCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxArrivals { node, count } => write!(f, "MaxArrivals:{node},{count}"),
            Self::MaxDepartures { node, count } => write!(f, "MaxDepartures:{node},{count}"),
            Self::MaxTime { time } => write!(f, "MaxTime:{time}"),
        }
    }
}
