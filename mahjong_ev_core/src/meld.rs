use crate::error::{AnalysisError, Result};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// 副露の種類
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeldType {
    /// チー（Chow）
    CHI,
    /// ポン（Pon）
    PON,
    /// 暗槓（ClosedKong）
    ANKAN,
    /// 明槓（OpenKong）
    MINKAN,
    /// 加槓（AddedKong）
    KAKAN,
}

impl MeldType {
    pub fn is_kong(self) -> bool {
        matches!(self, MeldType::ANKAN | MeldType::MINKAN | MeldType::KAKAN)
    }

    fn tile_len(self) -> usize {
        if self.is_kong() {
            4
        } else {
            3
        }
    }
}

/// 副露ブロック。作成時に形を検査し、以後は変更しない。
///
/// `discarded_tile` と `from` は牌譜復元用の情報で、向聴数や期待値の計算では参照しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeldBlock {
    #[serde(rename = "type")]
    meld_type: MeldType,
    tiles: Vec<Tile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discarded_tile: Option<Tile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<u8>,
}

impl MeldBlock {
    pub fn meld_type(&self) -> MeldType {
        self.meld_type
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn discarded_tile(&self) -> Option<Tile> {
        self.discarded_tile
    }

    /// 鳴いた相手の絶対座席（0..=3）
    pub fn from(&self) -> Option<u8> {
        self.from
    }

    /// 暗槓以外は門前を崩す
    pub fn is_open(&self) -> bool {
        self.meld_type != MeldType::ANKAN
    }

    pub fn is_kong(&self) -> bool {
        self.meld_type.is_kong()
    }

    /// 赤を無視した最小の種類インデックス（順子なら先頭牌）
    pub fn kind(&self) -> usize {
        self.tiles.iter().map(|t| t.kind()).min().unwrap_or(0)
    }

    pub fn red_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_red()).count()
    }

    /// 牌譜情報を付け加える
    pub fn with_provenance(mut self, discarded_tile: Option<Tile>, from: Option<u8>) -> Self {
        self.discarded_tile = discarded_tile;
        self.from = from;
        self
    }
}

/// 3枚または4枚の牌から副露の種類を推定する。4枚同一は明槓とみなす。
pub fn infer_type(tiles: &[Tile]) -> Result<MeldType> {
    match tiles.len() {
        3 if is_identical(tiles) => Ok(MeldType::PON),
        3 if is_run(tiles) => Ok(MeldType::CHI),
        4 if is_identical(tiles) => Ok(MeldType::MINKAN),
        3 | 4 => Err(AnalysisError::InvalidMeldPattern(format!(
            "{} do not form a run or identical set",
            tile_list(tiles)
        ))),
        n => Err(AnalysisError::InvalidMeldPattern(format!(
            "a meld needs 3 or 4 tiles, got {}",
            n
        ))),
    }
}

/// 牌の形を検査して副露ブロックを作る。種類の指定がなければ推定する。
pub fn build_meld(tiles: Vec<Tile>, meld_type: Option<MeldType>) -> Result<MeldBlock> {
    let meld_type = match meld_type {
        Some(mt) => {
            if tiles.len() != mt.tile_len() {
                return Err(AnalysisError::InvalidMeldPattern(format!(
                    "{:?} needs {} tiles, got {}",
                    mt,
                    mt.tile_len(),
                    tiles.len()
                )));
            }
            let ok = match mt {
                MeldType::CHI => is_run(&tiles),
                _ => is_identical(&tiles),
            };
            if !ok {
                return Err(AnalysisError::InvalidMeldPattern(format!(
                    "{} do not form a {:?}",
                    tile_list(&tiles),
                    mt
                )));
            }
            mt
        }
        None => infer_type(&tiles)?,
    };

    // 赤5は各色1枚しかない
    for red in [Tile::RED_M5, Tile::RED_P5, Tile::RED_S5] {
        if tiles.iter().filter(|&&t| t == red).count() > 1 {
            return Err(AnalysisError::InvalidMeldPattern(format!(
                "{} appears more than once",
                red
            )));
        }
    }

    Ok(MeldBlock {
        meld_type,
        tiles,
        discarded_tile: None,
        from: None,
    })
}

fn is_identical(tiles: &[Tile]) -> bool {
    tiles.windows(2).all(|w| w[0].kind() == w[1].kind())
}

fn is_run(tiles: &[Tile]) -> bool {
    if tiles.len() != 3 || tiles.iter().any(|t| t.is_honor()) {
        return false;
    }
    let mut kinds: Vec<usize> = tiles.iter().map(|t| t.kind()).collect();
    kinds.sort_unstable();
    // 同じ色の連番（色をまたぐ 8m9m1p は不可）
    kinds[0] / 9 == kinds[2] / 9 && kinds[1] == kinds[0] + 1 && kinds[2] == kinds[0] + 2
}

fn tile_list(tiles: &[Tile]) -> String {
    let names: Vec<&str> = tiles.iter().map(|t| t.name()).collect();
    format!("[{}]", names.join(", "))
}
