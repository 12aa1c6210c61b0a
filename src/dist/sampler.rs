//! 采样器
//!
//! 每个节点在每次仿真开始时从 `Distribution` 构造自己的 `Sampler`。

use super::distribution::Distribution;
use crate::rng::Rng;
use std::f64::consts::PI;

/// 求正样本时允许的最大连续重采样次数
pub const MAX_RESAMPLES: u32 = 10_000;

/// 正样本重采样失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonPositive {
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub enum Sampler {
    Exponential {
        rate: f64,
    },
    Uniform {
        min: f64,
        max: f64,
    },
    Erlang {
        k: u32,
        rate: f64,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
    NormalBoxMuller {
        mean: f64,
        std_dev: f64,
        /// 上一次变换剩下的标准正态样本
        cached: Option<f64>,
    },
    UnavailableTime {
        probability: f64,
        inner: Box<Sampler>,
    },
}

impl From<&Distribution> for Sampler {
    fn from(d: &Distribution) -> Self {
        match d {
            Distribution::Exponential { rate } => Self::Exponential { rate: *rate },
            Distribution::Uniform { min, max } => Self::Uniform {
                min: *min,
                max: *max,
            },
            Distribution::Erlang { k, rate } => Self::Erlang { k: *k, rate: *rate },
            Distribution::Normal { mean, std_dev } => Self::Normal {
                mean: *mean,
                std_dev: *std_dev,
            },
            Distribution::NormalBoxMuller { mean, std_dev } => Self::NormalBoxMuller {
                mean: *mean,
                std_dev: *std_dev,
                cached: None,
            },
            Distribution::UnavailableTime { probability, inner } => Self::UnavailableTime {
                probability: *probability,
                inner: Box::new(Sampler::from(inner.as_ref())),
            },
        }
    }
}

fn exponential(rate: f64, rng: &mut Rng) -> f64 {
    -rng.random().ln() / rate
}

impl Sampler {
    /// 抽取一个样本。只有 `UnavailableTime` 的内部分布重采样失败时才返回错误。
    pub fn sample(&mut self, rng: &mut Rng) -> Result<f64, NonPositive> {
        let v = match self {
            Self::Exponential { rate } => exponential(*rate, rng),
            Self::Uniform { min, max } => *min + (*max - *min) * rng.random(),
            Self::Erlang { k, rate } => (0..*k).map(|_| exponential(*rate, rng)).sum::<f64>(),
            Self::Normal { mean, std_dev } => {
                let u = rng.random();
                *mean + *std_dev * (-2.0 * u.ln()).sqrt() * (2.0 * PI * u).cos()
            }
            Self::NormalBoxMuller {
                mean,
                std_dev,
                cached,
            } => {
                let z = match cached.take() {
                    Some(z) => z,
                    None => {
                        let u1 = rng.random();
                        let u2 = rng.random();
                        let r = (-2.0 * u1.ln()).sqrt();
                        let theta = 2.0 * PI * u2;
                        *cached = Some(r * theta.sin());
                        r * theta.cos()
                    }
                };
                *mean + *std_dev * z
            }
            Self::UnavailableTime { probability, inner } => {
                if rng.random() < *probability {
                    inner.positive_sample(rng)?
                } else {
                    0.0
                }
            }
        };
        Ok(v)
    }

    /// 拒绝采样直到得到严格为正的值，用作事件延迟。
    pub fn positive_sample(&mut self, rng: &mut Rng) -> Result<f64, NonPositive> {
        for _ in 0..MAX_RESAMPLES {
            let v = self.sample(rng)?;
            if v > 0.0 {
                return Ok(v);
            }
        }
        Err(NonPositive {
            attempts: MAX_RESAMPLES,
        })
    }

    /// Box-Muller 是否缓存着一个样本
    pub fn has_cached(&self) -> bool {
        matches!(self, Self::NormalBoxMuller { cached: Some(_), .. })
    }
}
