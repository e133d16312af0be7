use crate::error::{AnalysisError, Result};
use crate::meld::MeldBlock;
use crate::options::ShantenTypes;
use crate::shanten::{shanten, shanten_of_kinds};
use crate::tile::{kind_counts, Counts, KindCounts, Tile, FIVE_KINDS, KIND_COUNT};
use rayon::prelude::*;
use serde::Serialize;

/// 有効牌と、その見えていない枚数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredTile {
    pub tile: Tile,
    pub count: u8,
}

/// 14枚の手から1枚切った場合の候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardCandidate {
    pub tile: Tile,
    /// 切った後の13枚の向聴数
    pub shanten: i32,
    /// 最善の打牌より向聴数が増える打牌
    pub shanten_down: bool,
    pub required_tiles: Vec<RequiredTile>,
}

/// 13枚の手の有効牌を求める
pub fn required_tiles(
    counts: &Counts,
    melds: &[MeldBlock],
    types: ShantenTypes,
    wall: &Counts,
) -> Result<Vec<RequiredTile>> {
    let base = shanten(counts, melds, types)?;
    if hand_len(counts, melds) != 13 {
        return Err(AnalysisError::InconsistentTileCounts(
            "required tiles are searched on a 13-tile hand".into(),
        ));
    }
    Ok(required_of_kinds(
        &kind_counts(counts),
        melds.len(),
        types,
        wall,
        base.overall,
    ))
}

/// 検査済みの手の有効牌。1枚足して向聴数が下がる種類を残り枚数つきで返す。
pub(crate) fn required_of_kinds(
    kinds: &KindCounts,
    n_melds: usize,
    types: ShantenTypes,
    wall: &Counts,
    base: i32,
) -> Vec<RequiredTile> {
    let mut work = *kinds;
    let mut out = vec![];
    for k in 0..KIND_COUNT {
        if wall[k] == 0 || work[k] >= 4 {
            continue;
        }
        work[k] += 1;
        let s = shanten_of_kinds(&work, n_melds, types).overall;
        work[k] -= 1;
        if s < base {
            out.push(RequiredTile {
                tile: Tile::from_kind(k),
                count: wall[k],
            });
        }
    }
    out
}

/// 14枚の手の打牌候補を求める。向聴戻しの候補は `include_shanten_down` のときだけ返す。
pub fn discard_candidates(
    counts: &Counts,
    melds: &[MeldBlock],
    types: ShantenTypes,
    wall: &Counts,
    include_shanten_down: bool,
) -> Result<Vec<DiscardCandidate>> {
    let base = shanten(counts, melds, types)?;
    if hand_len(counts, melds) != 14 {
        return Err(AnalysisError::InconsistentTileCounts(
            "discard candidates are searched on a 14-tile hand".into(),
        ));
    }
    if base.overall < 0 {
        return Err(AnalysisError::InvalidHand("hand is already complete".into()));
    }

    let kinds = kind_counts(counts);
    let n_melds = melds.len();

    // 種類ごとの仮定は独立なので並列に調べる
    let mut candidates: Vec<DiscardCandidate> = (0..KIND_COUNT)
        .into_par_iter()
        .filter(|&k| kinds[k] > 0)
        .map(|k| {
            let mut after = kinds;
            after[k] -= 1;
            let s = shanten_of_kinds(&after, n_melds, types).overall;
            DiscardCandidate {
                tile: discard_tile(counts, k),
                shanten: s,
                shanten_down: false,
                required_tiles: required_of_kinds(&after, n_melds, types, wall, s),
            }
        })
        .collect();

    let best = candidates.iter().map(|c| c.shanten).min().unwrap_or(base.overall);
    for c in &mut candidates {
        c.shanten_down = c.shanten > best;
    }
    if !include_shanten_down {
        candidates.retain(|c| !c.shanten_down);
    }
    Ok(candidates)
}

/// 種類 `kind` を1枚切るときの牌。赤5は普通の5が残っていないときだけ切る。
pub fn discard_tile(counts: &Counts, kind: usize) -> Tile {
    if let Some(r) = FIVE_KINDS.iter().position(|&f| f == kind) {
        if counts[KIND_COUNT + r] == 1 && counts[kind] == 1 {
            return Tile::from_kind(KIND_COUNT + r);
        }
    }
    Tile::from_kind(kind)
}

/// 副露を含めた枚数
pub(crate) fn hand_len(counts: &Counts, melds: &[MeldBlock]) -> usize {
    counts[..KIND_COUNT].iter().map(|&c| c as usize).sum::<usize>() + 3 * melds.len()
}
