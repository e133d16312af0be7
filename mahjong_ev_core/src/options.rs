use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// 期待値計算のオプション。ビットの組み合わせは OR のみで作る。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OptionFlags(u32);

impl OptionFlags {
    pub const NONE: OptionFlags = OptionFlags(0);
    /// 向聴戻しを考慮する
    pub const SHANTEN_DOWN: OptionFlags = OptionFlags(1);
    /// 手変わりを考慮する
    pub const TEGAWARI: OptionFlags = OptionFlags(2);
    pub const DOUBLE_RIICHI: OptionFlags = OptionFlags(4);
    pub const IPPATSU: OptionFlags = OptionFlags(8);
    pub const HAITEI: OptionFlags = OptionFlags(16);
    pub const URADORA: OptionFlags = OptionFlags(32);
    /// 赤5を引く場合を分けて考える
    pub const RED_FIVE_DRAW: OptionFlags = OptionFlags(64);
    /// 期待値ではなく和了確率を最大化する
    pub const MAXIMIZE_WIN_PROB: OptionFlags = OptionFlags(128);

    const ALL_BITS: u32 = 0xFF;

    pub const fn from_bits(bits: u32) -> Option<OptionFlags> {
        if bits & !Self::ALL_BITS == 0 {
            Some(OptionFlags(bits))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: OptionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn shanten_down(self) -> bool {
        self.contains(Self::SHANTEN_DOWN)
    }

    pub fn tegawari(self) -> bool {
        self.contains(Self::TEGAWARI)
    }

    pub fn double_riichi(self) -> bool {
        self.contains(Self::DOUBLE_RIICHI)
    }

    pub fn ippatsu(self) -> bool {
        self.contains(Self::IPPATSU)
    }

    pub fn haitei(self) -> bool {
        self.contains(Self::HAITEI)
    }

    pub fn uradora(self) -> bool {
        self.contains(Self::URADORA)
    }

    pub fn red_five_draw(self) -> bool {
        self.contains(Self::RED_FIVE_DRAW)
    }

    pub fn maximize_win_prob(self) -> bool {
        self.contains(Self::MAXIMIZE_WIN_PROB)
    }
}

impl BitOr for OptionFlags {
    type Output = OptionFlags;

    fn bitor(self, rhs: OptionFlags) -> OptionFlags {
        OptionFlags(self.0 | rhs.0)
    }
}

/// 向聴数を計算する手の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ShantenTypes(u8);

impl ShantenTypes {
    pub const REGULAR: ShantenTypes = ShantenTypes(1);
    pub const SEVEN_PAIRS: ShantenTypes = ShantenTypes(2);
    pub const THIRTEEN_ORPHANS: ShantenTypes = ShantenTypes(4);
    pub const ALL: ShantenTypes = ShantenTypes(7);

    pub const fn from_bits(bits: u8) -> Option<ShantenTypes> {
        if bits & !7 == 0 {
            Some(ShantenTypes(bits))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: ShantenTypes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn regular(self) -> bool {
        self.contains(Self::REGULAR)
    }

    pub fn seven_pairs(self) -> bool {
        self.contains(Self::SEVEN_PAIRS)
    }

    pub fn thirteen_orphans(self) -> bool {
        self.contains(Self::THIRTEEN_ORPHANS)
    }
}

impl Default for ShantenTypes {
    fn default() -> Self {
        ShantenTypes::ALL
    }
}

impl BitOr for ShantenTypes {
    type Output = ShantenTypes;

    fn bitor(self, rhs: ShantenTypes) -> ShantenTypes {
        ShantenTypes(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_accessors_follow_bits() {
        let o = OptionFlags::TEGAWARI | OptionFlags::URADORA;
        assert!(o.tegawari());
        assert!(o.uradora());
        assert!(!o.ippatsu());
        assert_eq!(o.bits(), 34);
        assert!(OptionFlags::from_bits(0x100).is_none());

        let parsed: OptionFlags = serde_json::from_str("129").unwrap();
        assert!(parsed.shanten_down());
        assert!(parsed.maximize_win_prob());
    }

    #[test]
    fn shanten_types() {
        let t = ShantenTypes::REGULAR | ShantenTypes::SEVEN_PAIRS;
        assert!(t.regular() && t.seven_pairs() && !t.thirteen_orphans());
        assert!(ShantenTypes::from_bits(0).unwrap().is_empty());
        assert!(ShantenTypes::from_bits(8).is_none());
    }
}
