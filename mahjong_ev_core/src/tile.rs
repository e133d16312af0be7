use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 牌の種類数（赤牌を除く）
pub const KIND_COUNT: usize = 34;
/// 赤5萬・赤5筒・赤5索を含めたスロット数
pub const SLOT_COUNT: usize = 37;

/// 37スロットの枚数表。0..34 は赤を含む物理枚数、34..37 は赤牌の有無（0/1）
pub type Counts = [u8; SLOT_COUNT];
/// 赤を区別しない34種の枚数表
pub type KindCounts = [u8; KIND_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Man,
    Pin,
    Sou,
    Honor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Honor {
    East,
    South,
    West,
    North,
    White,
    Green,
    Red,
}

/// 牌ID（0..=36）
/// - 0..=8: 1m..9m, 9..=17: 1p..9p, 18..=26: 1s..9s
/// - 27..=30: 東南西北, 31..=33: 白發中
/// - 34..=36: 赤5m, 赤5p, 赤5s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tile(u8);

impl Tile {
    pub const M1: Tile = Tile(0);
    pub const M2: Tile = Tile(1);
    pub const M3: Tile = Tile(2);
    pub const M4: Tile = Tile(3);
    pub const M5: Tile = Tile(4);
    pub const M6: Tile = Tile(5);
    pub const M7: Tile = Tile(6);
    pub const M8: Tile = Tile(7);
    pub const M9: Tile = Tile(8);
    pub const P1: Tile = Tile(9);
    pub const P2: Tile = Tile(10);
    pub const P3: Tile = Tile(11);
    pub const P4: Tile = Tile(12);
    pub const P5: Tile = Tile(13);
    pub const P6: Tile = Tile(14);
    pub const P7: Tile = Tile(15);
    pub const P8: Tile = Tile(16);
    pub const P9: Tile = Tile(17);
    pub const S1: Tile = Tile(18);
    pub const S2: Tile = Tile(19);
    pub const S3: Tile = Tile(20);
    pub const S4: Tile = Tile(21);
    pub const S5: Tile = Tile(22);
    pub const S6: Tile = Tile(23);
    pub const S7: Tile = Tile(24);
    pub const S8: Tile = Tile(25);
    pub const S9: Tile = Tile(26);
    pub const EAST: Tile = Tile(27);
    pub const SOUTH: Tile = Tile(28);
    pub const WEST: Tile = Tile(29);
    pub const NORTH: Tile = Tile(30);
    pub const WHITE: Tile = Tile(31);
    pub const GREEN: Tile = Tile(32);
    pub const RED: Tile = Tile(33);
    pub const RED_M5: Tile = Tile(34);
    pub const RED_P5: Tile = Tile(35);
    pub const RED_S5: Tile = Tile(36);

    pub const fn new(id: u8) -> Option<Tile> {
        if (id as usize) < SLOT_COUNT {
            Some(Tile(id))
        } else {
            None
        }
    }

    /// 種類インデックス（0..34）から牌を作る。範囲外は呼び出し側の責任。
    pub(crate) const fn from_kind(kind: usize) -> Tile {
        Tile(kind as u8)
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    /// 赤を無視した種類インデックス（0..34）
    pub const fn kind(self) -> usize {
        match self.0 {
            34 => 4,
            35 => 13,
            36 => 22,
            k => k as usize,
        }
    }

    /// 赤を無視した牌
    pub const fn normal(self) -> Tile {
        Tile(self.kind() as u8)
    }

    pub const fn is_red(self) -> bool {
        self.0 >= 34
    }

    /// 赤牌なら 0/1/2（萬/筒/索）を返す
    pub const fn red_index(self) -> Option<usize> {
        if self.is_red() {
            Some(self.0 as usize - 34)
        } else {
            None
        }
    }

    /// 5の牌に対応する赤牌
    pub const fn red_variant(self) -> Option<Tile> {
        match self.kind() {
            4 => Some(Tile::RED_M5),
            13 => Some(Tile::RED_P5),
            22 => Some(Tile::RED_S5),
            _ => None,
        }
    }

    pub const fn suit(self) -> Suit {
        match self.kind() {
            0..=8 => Suit::Man,
            9..=17 => Suit::Pin,
            18..=26 => Suit::Sou,
            _ => Suit::Honor,
        }
    }

    /// 数牌の数字（1..=9）。字牌は 0
    pub const fn number(self) -> u8 {
        let k = self.kind();
        if k < 27 {
            (k % 9) as u8 + 1
        } else {
            0
        }
    }

    pub const fn honor(self) -> Option<Honor> {
        match self.kind() {
            27 => Some(Honor::East),
            28 => Some(Honor::South),
            29 => Some(Honor::West),
            30 => Some(Honor::North),
            31 => Some(Honor::White),
            32 => Some(Honor::Green),
            33 => Some(Honor::Red),
            _ => None,
        }
    }

    pub const fn is_honor(self) -> bool {
        self.kind() >= 27
    }

    pub const fn is_terminal(self) -> bool {
        let n = self.number();
        n == 1 || n == 9
    }

    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_honor() || self.is_terminal()
    }

    pub const fn is_dragon(self) -> bool {
        self.kind() >= 31
    }

    pub const fn is_wind(self) -> bool {
        let k = self.kind();
        k >= 27 && k <= 30
    }

    /// ドラ表示牌からドラを求める
    pub const fn dora_from_indicator(self) -> Tile {
        let k = self.kind();
        let next = match k {
            0..=26 => {
                if k % 9 == 8 {
                    k - 8
                } else {
                    k + 1
                }
            }
            30 => 27,
            33 => 31,
            _ => k + 1,
        };
        Tile(next as u8)
    }

    /// ドラがこの牌になる表示牌
    pub const fn dora_indicator_of(self) -> Tile {
        let k = self.kind();
        let prev = match k {
            0..=26 => {
                if k % 9 == 0 {
                    k + 8
                } else {
                    k - 1
                }
            }
            27 => 30,
            31 => 33,
            _ => k - 1,
        };
        Tile(prev as u8)
    }

    pub fn name(self) -> &'static str {
        TILE_NAMES[self.0 as usize]
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(id: u8) -> std::result::Result<Self, Self::Error> {
        Tile::new(id).ok_or_else(|| format!("invalid tile id: {}", id))
    }
}

impl From<Tile> for u8 {
    fn from(t: Tile) -> u8 {
        t.0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub static TILE_NAMES: [&str; SLOT_COUNT] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", //
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", //
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", //
    "East", "South", "West", "North", "White", "Green", "Red", //
    "Red 5m", "Red 5p", "Red 5s",
];

/// 評価値が同じ打牌候補のうち、どれを優先して切るか（大きいほど先に切る）
pub static DISCARD_PRIORITY: [u8; KIND_COUNT] = [
    5, 4, 3, 2, 1, 2, 3, 4, 5, //
    5, 4, 3, 2, 1, 2, 3, 4, 5, //
    5, 4, 3, 2, 1, 2, 3, 4, 5, //
    5, 5, 5, 5, 5, 5, 5,
];

/// 么九牌13種
pub static ORPHANS: [usize; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

/// 5の種類インデックス（萬/筒/索）
pub static FIVE_KINDS: [usize; 3] = [4, 13, 22];

/// 牌の並びから37スロットの枚数表を作る
pub fn counts_from_tiles(tiles: &[Tile]) -> Result<Counts> {
    let mut counts = [0u8; SLOT_COUNT];
    for &t in tiles {
        add_tile(&mut counts, t);
    }
    check_counts(&counts)?;
    Ok(counts)
}

pub(crate) fn add_tile(counts: &mut Counts, t: Tile) {
    counts[t.kind()] += 1;
    if let Some(r) = t.red_index() {
        counts[34 + r] += 1;
    }
}

pub(crate) fn remove_tile(counts: &mut Counts, t: Tile) {
    counts[t.kind()] -= 1;
    if let Some(r) = t.red_index() {
        counts[34 + r] -= 1;
    }
}

/// 枚数表の各スロットが物理的にありえる範囲か検査する
pub fn check_counts(counts: &Counts) -> Result<()> {
    for (k, &c) in counts.iter().take(KIND_COUNT).enumerate() {
        if c > 4 {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} appears {} times",
                Tile::from_kind(k),
                c
            )));
        }
    }
    for (r, &five) in FIVE_KINDS.iter().enumerate() {
        let red = counts[34 + r];
        if red > 1 || red > counts[five] {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "{} appears {} times",
                TILE_NAMES[34 + r],
                red
            )));
        }
    }
    Ok(())
}

/// 赤を区別しない34種の枚数表に落とす
pub fn kind_counts(counts: &Counts) -> KindCounts {
    let mut kinds = [0u8; KIND_COUNT];
    kinds.copy_from_slice(&counts[..KIND_COUNT]);
    kinds
}
