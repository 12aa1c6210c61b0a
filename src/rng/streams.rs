//! 多流管理
//!
//! 子流种子由跳跃乘数 `A256` 串联生成：`s[0] = seed`，`s[j] = A256 * s[j-1] mod M`。
//! 第 k 个子流只取决于顶层种子和 k，与请求的子流总数无关。

use std::ops::Range;

use super::lehmer::{Rng, lehmer_step};
use tracing::warn;

/// 跳跃乘数，相邻子流间隔约 2^31 / 256 步
pub const A256: i64 = 22_925;
/// 保证互不重叠的子流数量
pub const MAX_STREAMS: usize = 256;

/// 顶层种子的第 `k` 个子流。
pub fn stream(seed: u64, k: usize) -> Rng {
    let mut s = Rng::new(seed).seed() as i64;
    for _ in 0..k {
        s = lehmer_step(s, A256);
    }
    Rng::new(s as u64)
}

/// 子流总数超过 `MAX_STREAMS` 时记一条警告。
pub(crate) fn warn_if_overlapping(count: usize) {
    if count > MAX_STREAMS {
        warn!(count, max = MAX_STREAMS, "子流数量超过不重叠保证范围");
    }
}

/// 顶层种子的前 `count` 个子流。
pub fn streams(seed: u64, count: usize) -> Vec<Rng> {
    warn_if_overlapping(count);
    stream_range(seed, 0..count)
}

/// 顶层种子的第 `range.start` 到 `range.end - 1` 个子流，不检查数量。
pub fn stream_range(seed: u64, range: Range<usize>) -> Vec<Rng> {
    let mut out = Vec::with_capacity(range.len());
    let mut s = stream(seed, range.start).seed() as i64;
    for _ in range {
        if !out.is_empty() {
            s = lehmer_step(s, A256);
        }
        out.push(Rng::new(s as u64));
    }
    out
}
