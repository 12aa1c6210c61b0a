//! Lehmer 生成器
//!
//! `seed' = 48271 * seed mod (2^31 - 1)`，用 Schrage 分解避免 32 位溢出。

/// 模数 2^31 - 1
pub const MODULUS: i64 = 2_147_483_647;
/// 乘数
pub const MULTIPLIER: i64 = 48_271;
/// 引擎默认种子
pub const DEFAULT_SEED: u64 = 123_456_789;

/// 单个随机数流，状态为 `[1, MODULUS - 1]` 内的 31 位整数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rng {
    seed: i64,
}

/// Schrage 方法计算 `a * seed mod MODULUS`。
pub(crate) fn lehmer_step(seed: i64, a: i64) -> i64 {
    let q = MODULUS / a;
    let r = MODULUS % a;
    let t = a * (seed % q) - r * (seed / q);
    if t > 0 { t } else { t + MODULUS }
}

impl Rng {
    /// 以任意种子创建；种子先对模数取余，0 映射为 1。
    pub fn new(seed: u64) -> Self {
        let s = (seed % MODULUS as u64) as i64;
        Self {
            seed: if s == 0 { 1 } else { s },
        }
    }

    /// 当前状态
    pub fn seed(&self) -> u64 {
        self.seed as u64
    }

    /// 推进状态并返回 (0, 1) 内的均匀分布样本。
    pub fn random(&mut self) -> f64 {
        self.seed = lehmer_step(self.seed, MULTIPLIER);
        self.seed as f64 / MODULUS as f64
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
