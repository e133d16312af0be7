use crate::error::{AnalysisError, Result};
use crate::meld::MeldBlock;
use crate::tile::{counts_from_tiles, kind_counts, Counts, KindCounts, Tile, KIND_COUNT, TILE_NAMES};

/// 手牌（門前の牌と副露）。枚数の整合性は作成時に検査する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    tiles: Vec<Tile>,
    counts: Counts,
    melds: Vec<MeldBlock>,
}

impl Hand {
    pub fn new(tiles: Vec<Tile>, melds: Vec<MeldBlock>) -> Result<Hand> {
        if melds.len() > 4 {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "at most 4 melds, got {}",
                melds.len()
            )));
        }
        let total = tiles.len() + 3 * melds.len();
        if total != 13 && total != 14 {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "hand has {} tiles including melds, expected 13 or 14",
                total
            )));
        }
        let counts = counts_from_tiles(&tiles)?;

        // 副露を含めても同じ牌は4枚、赤は1枚まで
        let mut all = kind_counts(&counts);
        let mut reds = [0u8; 3];
        for t in melds.iter().flat_map(|m| m.tiles()) {
            all[t.kind()] += 1;
            if let Some(r) = t.red_index() {
                reds[r] += 1;
            }
        }
        if let Some(k) = (0..KIND_COUNT).find(|&k| all[k] > 4) {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} appears {} times including melds",
                Tile::from_kind(k),
                all[k]
            )));
        }
        for r in 0..3 {
            if reds[r] + counts[KIND_COUNT + r] > 1 {
                return Err(AnalysisError::InconsistentTileCounts(format!(
                    "{} appears more than once",
                    TILE_NAMES[KIND_COUNT + r]
                )));
            }
        }

        Ok(Hand {
            tiles,
            counts,
            melds,
        })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn kinds(&self) -> KindCounts {
        kind_counts(&self.counts)
    }

    pub fn melds(&self) -> &[MeldBlock] {
        &self.melds
    }

    /// 副露を3枚と数えた枚数（13 か 14）
    pub fn len(&self) -> usize {
        self.tiles.len() + 3 * self.melds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.melds.is_empty()
    }

    /// 打牌前の14枚か
    pub fn can_discard(&self) -> bool {
        self.len() == 14
    }

    /// 門前か（暗槓は門前のまま）
    pub fn is_closed(&self) -> bool {
        self.melds.iter().all(|m| !m.is_open())
    }

    /// 手牌にある赤5（萬/筒/索）
    pub fn reds(&self) -> [bool; 3] {
        [0, 1, 2].map(|r| self.counts[KIND_COUNT + r] > 0)
    }
}
