use serde::{Deserialize, Serialize};

pub mod analyze;
mod decompose;
mod dora;
mod engine;
pub mod error;
pub mod forecast;
mod fu;
pub mod hand;
pub mod meld;
pub mod meld_code;
pub mod options;
pub mod points;
mod score;
pub mod shanten;
pub mod required;
pub mod tile;
mod uradora;
pub mod wall;
mod yaku;

pub use analyze::{analyze, AnalysisOutcome, AnalysisRequest, AnalysisResponse, AnalysisResult};
pub use engine::score_hand;
pub use error::{AnalysisError, Result};
pub use meld::{MeldBlock, MeldType};
pub use options::{OptionFlags, ShantenTypes};
pub use points::{PointBreakdown, ScoreTitle};
pub use score::score;
pub use tile::Tile;
pub use yaku::{Yaku, YakuEntry};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Wind {
    E,
    S,
    W,
    N,
}

impl Wind {
    /// 東南西北の順の席番号
    pub const fn index(self) -> usize {
        match self {
            Wind::E => 0,
            Wind::S => 1,
            Wind::W => 2,
            Wind::N => 3,
        }
    }

    /// 風牌
    pub const fn tile(self) -> Tile {
        match self {
            Wind::E => Tile::EAST,
            Wind::S => Tile::SOUTH,
            Wind::W => Tile::WEST,
            Wind::N => Tile::NORTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WinType {
    RON,
    TSUMO,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Riichi {
    #[default]
    NONE,
    RIICHI,
    DOUBLE,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Flags {
    pub riichi: Riichi,
    pub ippatsu: bool,
    pub rinshan: bool,
    pub chankan: bool,
    pub haitei: bool,
    pub houtei: bool,
    pub tenhou: bool,
    pub chihou: bool,
}

/// 和了時の状況
#[derive(Debug, Clone)]
pub struct WinContext {
    pub round_wind: Wind,
    pub seat_wind: Wind,
    pub win_tile: Tile,
    pub win_type: WinType,
    pub flags: Flags,
    pub dora_indicators: Vec<Tile>,
    pub ura_indicators: Vec<Tile>,
    pub honba: u32,
    pub kyotaku: u32,
    /// ロンのときの放銃者
    pub discarder: Option<Wind>,
    /// 赤5をドラとして数えるか
    pub red_dora: bool,
}

impl WinContext {
    pub fn is_dealer(&self) -> bool {
        self.seat_wind == Wind::E
    }
}

/// 副露の指定。牌の並び（種類は省略可）か、牌譜の符号と手番の席
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MeldRequest {
    Tiles {
        tiles: Vec<Tile>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        meld_type: Option<MeldType>,
    },
    Code {
        code: u32,
        player: u8,
    },
}

impl MeldRequest {
    pub fn to_block(&self) -> Result<MeldBlock> {
        match self {
            MeldRequest::Tiles { tiles, meld_type } => meld::build_meld(tiles.clone(), *meld_type),
            MeldRequest::Code { code, player } => meld_code::decode_meld(*code, *player),
        }
    }
}

pub(crate) fn meld_blocks(melds: &[MeldRequest]) -> Result<Vec<MeldBlock>> {
    melds.iter().map(MeldRequest::to_block).collect()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoreRequest {
    pub round_wind: Wind,
    pub seat_wind: Wind,
    #[serde(default)]
    pub kyotaku: u32,
    #[serde(default)]
    pub honba: u32,

    pub win_type: WinType,
    /// ロンのときの放銃者
    #[serde(default)]
    pub discarder: Option<Wind>,

    /// 和了牌を含む門前の牌
    pub hand_tiles: Vec<Tile>,
    pub win_tile: Tile,

    #[serde(default)]
    pub melds: Vec<MeldRequest>,

    #[serde(default)]
    pub dora_indicators: Vec<Tile>,
    #[serde(default)]
    pub ura_indicators: Vec<Tile>,

    #[serde(default)]
    pub flags: Flags,
    #[serde(default = "default_true")]
    pub red_dora: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub yaku: Vec<YakuEntry>,
    pub han: u32,
    pub fu: u32,
    pub yakuman: u32,
    #[serde(flatten)]
    pub points: PointBreakdown,
    /// 東南西北の順の収支
    pub deltas: [i32; 4],
    pub dora_han: u32,
    pub ura_dora_han: u32,
    pub aka_dora_han: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreResult>,
}
