use crate::error::{AnalysisError, Result};
use crate::meld::MeldBlock;
use crate::options::ShantenTypes;
use crate::tile::{check_counts, kind_counts, Counts, KindCounts, KIND_COUNT, ORPHANS};
use serde::Serialize;
use std::collections::HashMap;

/// 不完全面子（塔子・対子）を数える上限の余裕。
///
/// 面子数を `need` まで揃えるのに、塔子は残り面子数（`need - sets`）までしか数えない。
/// 0 以外にすると「面子オーバー」の塔子にも価値を与える流儀になる。
pub const PARTIAL_CAP_SLACK: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShantenResult {
    pub regular: Option<i32>,
    pub seven_pairs: Option<i32>,
    pub thirteen_orphans: Option<i32>,
    /// 計算した種類のうちの最小値。-1 は和了形
    pub overall: i32,
}

/// 向聴数を計算する。入力の形が崩れていれば探索前にエラーを返す。
pub fn shanten(counts: &Counts, melds: &[MeldBlock], types: ShantenTypes) -> Result<ShantenResult> {
    if types.is_empty() {
        return Err(AnalysisError::UnsupportedOption(
            "no shanten type selected".into(),
        ));
    }
    if !melds.is_empty() && (types.seven_pairs() || types.thirteen_orphans()) {
        return Err(AnalysisError::UnsupportedOption(
            "seven pairs and thirteen orphans need a hand without melds".into(),
        ));
    }
    if melds.len() > 4 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "at most 4 melds, got {}",
            melds.len()
        )));
    }
    check_counts(counts)?;

    let concealed: usize = counts[..KIND_COUNT].iter().map(|&c| c as usize).sum();
    let total = concealed + 3 * melds.len();
    if total != 13 && total != 14 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "hand has {} tiles including melds, expected 13 or 14",
            total
        )));
    }

    Ok(shanten_of_kinds(&kind_counts(counts), melds.len(), types))
}

/// 検査済みの34種枚数表に対する向聴数
pub(crate) fn shanten_of_kinds(kinds: &KindCounts, n_melds: usize, types: ShantenTypes) -> ShantenResult {
    let regular = types.regular().then(|| regular_shanten(kinds, n_melds));
    let seven_pairs = types.seven_pairs().then(|| seven_pairs_shanten(kinds));
    let thirteen_orphans = types
        .thirteen_orphans()
        .then(|| thirteen_orphans_shanten(kinds));

    let overall = [regular, seven_pairs, thirteen_orphans]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(i32::MAX);

    ShantenResult {
        regular,
        seven_pairs,
        thirteen_orphans,
        overall,
    }
}

// ===== 一般形 =====

pub fn regular_shanten(kinds: &KindCounts, n_melds: usize) -> i32 {
    let need = 4 - n_melds.min(4) as i32;
    let mut search = RegularSearch {
        need,
        memo: HashMap::new(),
    };
    let mut work = *kinds;
    search.run(&mut work, 0, 0, false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchKey {
    counts: u128,
    sets: i8,
    partials: i8,
    pair: bool,
}

/// 一般形の分解探索。常に残りの最小の牌から取り、同じ残り状態はメモ化する。
struct RegularSearch {
    need: i32,
    memo: HashMap<SearchKey, i32>,
}

impl RegularSearch {
    fn run(&mut self, kinds: &mut KindCounts, sets: i32, partials: i32, pair: bool) -> i32 {
        let Some(i) = kinds.iter().position(|&c| c > 0) else {
            return self.terminal(sets, partials, pair);
        };

        let key = SearchKey {
            counts: pack(kinds),
            sets: sets as i8,
            partials: partials as i8,
            pair,
        };
        if let Some(&v) = self.memo.get(&key) {
            return v;
        }

        let mut best = i32::MAX;
        let suited = i < 27;
        let pos = i % 9;
        let blocks_open = sets + partials < self.need;

        // 刻子
        if kinds[i] >= 3 && sets < self.need {
            kinds[i] -= 3;
            best = best.min(self.run(kinds, sets + 1, partials, pair));
            kinds[i] += 3;
        }

        // 順子
        if suited && pos <= 6 && kinds[i + 1] > 0 && kinds[i + 2] > 0 && sets < self.need {
            kinds[i] -= 1;
            kinds[i + 1] -= 1;
            kinds[i + 2] -= 1;
            best = best.min(self.run(kinds, sets + 1, partials, pair));
            kinds[i] += 1;
            kinds[i + 1] += 1;
            kinds[i + 2] += 1;
        }

        if kinds[i] >= 2 {
            // 雀頭
            if !pair {
                kinds[i] -= 2;
                best = best.min(self.run(kinds, sets, partials, true));
                kinds[i] += 2;
            }
            // 対子を塔子として使う
            if blocks_open {
                kinds[i] -= 2;
                best = best.min(self.run(kinds, sets, partials + 1, pair));
                kinds[i] += 2;
            }
        }

        // 両面・辺張
        if suited && pos <= 7 && kinds[i + 1] > 0 && blocks_open {
            kinds[i] -= 1;
            kinds[i + 1] -= 1;
            best = best.min(self.run(kinds, sets, partials + 1, pair));
            kinds[i] += 1;
            kinds[i + 1] += 1;
        }

        // 嵌張
        if suited && pos <= 6 && kinds[i + 2] > 0 && blocks_open {
            kinds[i] -= 1;
            kinds[i + 2] -= 1;
            best = best.min(self.run(kinds, sets, partials + 1, pair));
            kinds[i] += 1;
            kinds[i + 2] += 1;
        }

        // 孤立牌
        kinds[i] -= 1;
        best = best.min(self.run(kinds, sets, partials, pair));
        kinds[i] += 1;

        self.memo.insert(key, best);
        best
    }

    fn terminal(&self, sets: i32, partials: i32, pair: bool) -> i32 {
        let missing = self.need - sets;
        let credited = partials.min(missing + PARTIAL_CAP_SLACK);
        2 * missing - credited - pair as i32
    }
}

fn pack(kinds: &KindCounts) -> u128 {
    kinds
        .iter()
        .fold(0u128, |acc, &c| (acc << 3) | (c as u128 & 0x7))
}

// ===== 七対子 =====

pub fn seven_pairs_shanten(kinds: &KindCounts) -> i32 {
    let pairs = kinds.iter().filter(|&&c| c >= 2).count() as i32;
    let distinct = kinds.iter().filter(|&&c| c > 0).count() as i32;
    6 - pairs + (7 - distinct).max(0)
}

// ===== 国士無双 =====

pub fn thirteen_orphans_shanten(kinds: &KindCounts) -> i32 {
    let distinct = ORPHANS.iter().filter(|&&k| kinds[k] > 0).count() as i32;
    let has_pair = ORPHANS.iter().any(|&k| kinds[k] >= 2);
    13 - distinct - has_pair as i32
}
