use crate::tile::{Counts, KindCounts, Tile, KIND_COUNT};

/// 裏ドラの枚数の上限（これ以上はまとめる）
pub const MAX_URADORA: usize = 12;

pub type UradoraDist = [f64; MAX_URADORA + 1];

/// 裏ドラが `k` 枚乗る確率の分布。
///
/// 表示牌1枚ごとに、見えていない牌から一様に選ばれるとして乗る枚数の分布を作り、
/// `n_indicators` 枚ぶん畳み込む。`all` は副露を含む和了形の枚数表。
pub fn uradora_distribution(all: &KindCounts, wall: &Counts, n_indicators: usize) -> UradoraDist {
    let mut dist = [0.0; MAX_URADORA + 1];
    dist[0] = 1.0;

    let total: u32 = wall[..KIND_COUNT].iter().map(|&c| c as u32).sum();
    if total == 0 || n_indicators == 0 {
        return dist;
    }

    // 表示牌1枚で乗る枚数（0..=4）
    let mut single = [0.0f64; 5];
    for (k, &left) in wall.iter().take(KIND_COUNT).enumerate() {
        if left == 0 {
            continue;
        }
        let hits = all[Tile::from_kind(k).dora_from_indicator().kind()].min(4) as usize;
        single[hits] += left as f64 / total as f64;
    }

    for _ in 0..n_indicators {
        let mut next = [0.0; MAX_URADORA + 1];
        for (have, &p) in dist.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            for (add, &q) in single.iter().enumerate() {
                next[(have + add).min(MAX_URADORA)] += p * q;
            }
        }
        dist = next;
    }
    dist
}
