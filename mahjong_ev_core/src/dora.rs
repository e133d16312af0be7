use crate::meld::MeldBlock;
use crate::tile::{KindCounts, Tile};

/// 表示牌の並びからドラの枚数を数える（副露を含めた枚数表に対して）。
/// 同じ表示牌が重なればその分だけ数える。
pub fn count_dora(all: &KindCounts, indicators: &[Tile]) -> u32 {
    indicators
        .iter()
        .map(|ind| all[ind.dora_from_indicator().kind()] as u32)
        .sum()
}

/// 赤ドラの枚数（門前の牌と副露）
pub fn count_aka(concealed: &[Tile], melds: &[MeldBlock]) -> u32 {
    let in_hand = concealed.iter().filter(|t| t.is_red()).count();
    let in_melds: usize = melds.iter().map(MeldBlock::red_count).sum();
    (in_hand + in_melds) as u32
}
