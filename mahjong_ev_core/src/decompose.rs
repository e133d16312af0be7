use crate::meld::{MeldBlock, MeldType};
use crate::tile::{KindCounts, KIND_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// 先頭牌の種類
    Shuntsu(usize),
    Koutsu(usize),
    Kantsu(usize),
}

impl Block {
    pub fn kind(self) -> usize {
        match self {
            Block::Shuntsu(k) | Block::Koutsu(k) | Block::Kantsu(k) => k,
        }
    }

    pub fn is_triplet_like(self) -> bool {
        matches!(self, Block::Koutsu(_) | Block::Kantsu(_))
    }

    pub fn contains(self, kind: usize) -> bool {
        match self {
            Block::Shuntsu(k) => (k..k + 3).contains(&kind),
            Block::Koutsu(k) | Block::Kantsu(k) => k == kind,
        }
    }
}

/// 面子1つ。`open` は鳴いた面子（暗槓は含まない）、`called` は副露由来かどうか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mentsu {
    pub block: Block,
    pub open: bool,
    pub called: bool,
}

/// 4面子1雀頭の分解
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandPattern {
    pub mentsu: Vec<Mentsu>, // 副露ブロックも含める
    pub pair: usize,         // 雀頭の種類
}

impl HandPattern {
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.mentsu.iter().map(|m| m.block)
    }
}

pub fn meld_to_mentsu(m: &MeldBlock) -> Mentsu {
    let k = m.kind();
    let block = match m.meld_type() {
        MeldType::CHI => Block::Shuntsu(k),
        MeldType::PON => Block::Koutsu(k),
        MeldType::ANKAN | MeldType::MINKAN | MeldType::KAKAN => Block::Kantsu(k),
    };
    Mentsu {
        block,
        open: m.is_open(),
        called: true,
    }
}

/// 門前部分（和了牌を含む）を面子と雀頭に分解し、副露ブロックを付け足す。
pub fn decompose(concealed: &KindCounts, melds: &[MeldBlock]) -> Vec<HandPattern> {
    let blocks_needed = 4usize.saturating_sub(melds.len());
    let total: usize = concealed.iter().map(|&c| c as usize).sum();
    if total != blocks_needed * 3 + 2 {
        return vec![];
    }

    let called: Vec<Mentsu> = melds.iter().map(meld_to_mentsu).collect();
    let mut counts = *concealed;
    let mut results = vec![];

    for pair in 0..KIND_COUNT {
        if counts[pair] < 2 {
            continue;
        }
        counts[pair] -= 2;
        let mut blocks = vec![];
        dfs_blocks(&mut counts, &mut blocks, &mut |found| {
            let mut mentsu: Vec<Mentsu> = found
                .iter()
                .map(|&block| Mentsu {
                    block,
                    open: false,
                    called: false,
                })
                .collect();
            mentsu.extend(called.iter().copied());
            let p = HandPattern { mentsu, pair };
            if !results.contains(&p) {
                results.push(p);
            }
        });
        counts[pair] += 2;
    }

    results
}

fn dfs_blocks(counts: &mut KindCounts, blocks: &mut Vec<Block>, found: &mut dyn FnMut(&[Block])) {
    // 常に残り牌のうち最小の牌から面子を作る
    let Some(k) = counts.iter().position(|&c| c > 0) else {
        found(blocks.as_slice());
        return;
    };

    // 刻子
    if counts[k] >= 3 {
        counts[k] -= 3;
        blocks.push(Block::Koutsu(k));
        dfs_blocks(counts, blocks, found);
        blocks.pop();
        counts[k] += 3;
    }

    // 順子（開始牌 = k のみ。k が最小なのでこれで十分）
    if k < 27 && k % 9 <= 6 && counts[k + 1] > 0 && counts[k + 2] > 0 {
        counts[k] -= 1;
        counts[k + 1] -= 1;
        counts[k + 2] -= 1;
        blocks.push(Block::Shuntsu(k));
        dfs_blocks(counts, blocks, found);
        blocks.pop();
        counts[k] += 1;
        counts[k + 1] += 1;
        counts[k + 2] += 1;
    }
}

/// 七対子の形か（4枚使いは不可）
pub fn is_seven_pairs(concealed: &KindCounts, has_melds: bool) -> bool {
    !has_melds && concealed.iter().filter(|&&c| c == 2).count() == 7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meld::build_meld;
    use crate::tile::{counts_from_tiles, kind_counts, Tile};

    fn kinds(tiles: &[Tile]) -> KindCounts {
        kind_counts(&counts_from_tiles(tiles).unwrap())
    }

    #[test]
    fn ambiguous_hand_has_both_splits() {
        // 111222333m 456p 99s → 刻子3つ / 順子3つ
        let hand = [
            Tile::M1,
            Tile::M1,
            Tile::M1,
            Tile::M2,
            Tile::M2,
            Tile::M2,
            Tile::M3,
            Tile::M3,
            Tile::M3,
            Tile::P4,
            Tile::P5,
            Tile::P6,
            Tile::S9,
            Tile::S9,
        ];
        let patterns = decompose(&kinds(&hand), &[]);
        assert_eq!(patterns.len(), 2);
        assert!(patterns
            .iter()
            .any(|p| p.blocks().filter(|b| matches!(b, Block::Koutsu(_))).count() == 3));
        assert!(patterns
            .iter()
            .any(|p| p.blocks().filter(|b| matches!(b, Block::Shuntsu(0))).count() == 3));
    }

    #[test]
    fn melds_are_attached() {
        let pon = build_meld(vec![Tile::RED; 3], None).unwrap();
        let hand = [
            Tile::M1,
            Tile::M2,
            Tile::M3,
            Tile::P7,
            Tile::P8,
            Tile::P9,
            Tile::S2,
            Tile::S3,
            Tile::S4,
            Tile::S5,
            Tile::S5,
        ];
        let patterns = decompose(&kinds(&hand), &[pon]);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.pair, Tile::S5.kind());
        assert_eq!(p.mentsu.len(), 4);
        assert!(p.mentsu.iter().any(|m| m.called && m.open));
    }

    #[test]
    fn broken_hand_has_no_split() {
        let hand = [
            Tile::M1,
            Tile::M2,
            Tile::M4,
            Tile::P7,
            Tile::P8,
            Tile::P9,
            Tile::S2,
            Tile::S3,
            Tile::S4,
            Tile::S5,
            Tile::S5,
            Tile::EAST,
            Tile::EAST,
            Tile::EAST,
        ];
        assert!(decompose(&kinds(&hand), &[]).is_empty());
    }
}
