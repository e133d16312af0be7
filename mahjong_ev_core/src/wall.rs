use crate::error::{AnalysisError, Result};
use crate::meld::MeldBlock;
use crate::tile::{Counts, Tile, FIVE_KINDS, KIND_COUNT, SLOT_COUNT, TILE_NAMES};

/// 見えていない牌の枚数表を求める（手牌・ドラ表示牌・副露を引く）
pub fn remaining(hand: &[Tile], dora_indicators: &[Tile], melds: &[MeldBlock]) -> Result<Counts> {
    let mut left = [0i32; SLOT_COUNT];
    left[..KIND_COUNT].fill(4);
    left[KIND_COUNT..].fill(1);

    let visible = hand
        .iter()
        .chain(dora_indicators)
        .chain(melds.iter().flat_map(|m| m.tiles()));
    for &t in visible {
        // 赤5は同じ5の4枚のうちの1枚
        left[t.kind()] -= 1;
        if let Some(r) = t.red_index() {
            left[KIND_COUNT + r] -= 1;
        }
    }

    let mut counts = [0u8; SLOT_COUNT];
    for (slot, &n) in left.iter().enumerate() {
        if n < 0 {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} is referenced {} times, more than exist",
                TILE_NAMES[slot],
                if slot < KIND_COUNT { 4 - n } else { 1 - n }
            )));
        }
        counts[slot] = n as u8;
    }
    Ok(counts)
}

/// 呼び出し側が渡した残り枚数表を検査する。見えている牌をさらに引くことはできるが、
/// 計算上の残り枚数を超えることはできない。
pub fn validate_wall(supplied: &[u8], computed: &Counts) -> Result<Counts> {
    if supplied.len() != SLOT_COUNT {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "remaining-tile vector must have {} slots, got {}",
            SLOT_COUNT,
            supplied.len()
        )));
    }
    let mut wall = [0u8; SLOT_COUNT];
    for (slot, (&s, &c)) in supplied.iter().zip(computed).enumerate() {
        if s > c {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} has {} remaining but at most {} are unseen",
                TILE_NAMES[slot], s, c
            )));
        }
        wall[slot] = s;
    }
    for (r, &five) in FIVE_KINDS.iter().enumerate() {
        if wall[KIND_COUNT + r] > wall[five] {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} is unseen but no {} remains",
                TILE_NAMES[KIND_COUNT + r],
                TILE_NAMES[five]
            )));
        }
    }
    Ok(wall)
}

/// 山に残っている物理枚数の合計（赤フラグは数えない）
pub fn sum_left(wall: &Counts) -> u32 {
    wall[..KIND_COUNT].iter().map(|&c| c as u32).sum()
}
