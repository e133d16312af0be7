use crate::error::{AnalysisError, Result};
use crate::forecast::{
    forecast_discards, forecast_draw, ForecastCandidate, ForecastContext, ForecastRow, MAX_TURNS,
};
use crate::hand::Hand;
use crate::options::{OptionFlags, ShantenTypes};
use crate::required::{required_tiles, RequiredTile};
use crate::shanten::{shanten, ShantenResult};
use crate::tile::Tile;
use crate::wall::{remaining, validate_wall};
use crate::{meld_blocks, MeldRequest, Wind};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// ドラ表示牌の上限
pub const MAX_DORA_INDICATORS: usize = 4;

fn default_shanten_types() -> u8 {
    ShantenTypes::ALL.bits()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisRequest {
    pub round_wind: Wind,
    pub seat_wind: Wind,
    /// 現在の巡目（1..=17）
    pub turn: u8,
    /// 一般形=1, 七対子=2, 国士無双=4 の OR
    #[serde(default = "default_shanten_types")]
    pub shanten_types: u8,
    #[serde(default)]
    pub dora_indicators: Vec<Tile>,
    /// `OptionFlags` のビット
    #[serde(default)]
    pub options: u32,
    /// 門前の牌（副露を含めて13枚か14枚）
    pub hand: Vec<Tile>,
    #[serde(default)]
    pub melds: Vec<MeldRequest>,
    /// 37スロットの残り枚数。省略すると手牌・副露・ドラ表示牌から求める
    #[serde(default)]
    pub wall: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    /// 13枚: 有効牌と見通し
    Draw {
        required_tiles: Vec<RequiredTile>,
        rows: Vec<ForecastRow>,
    },
    /// 14枚: 打牌候補ごとの見通し
    Discard { candidates: Vec<ForecastCandidate> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub shanten: ShantenResult,
    pub elapsed_us: u64,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
}

impl AnalysisResponse {
    fn ok(result: AnalysisResult) -> Self {
        AnalysisResponse {
            success: true,
            message: None,
            result: Some(result),
        }
    }

    fn failure(err: &AnalysisError) -> Self {
        AnalysisResponse {
            success: false,
            message: Some(err.to_string()),
            result: None,
        }
    }
}

/// 手牌を解析する。入力の誤りは success=false の応答として返す
pub fn analyze(req: &AnalysisRequest) -> AnalysisResponse {
    match analyze_request(req) {
        Ok(result) => AnalysisResponse::ok(result),
        Err(err) => {
            warn!(error = %err, "analysis request rejected");
            AnalysisResponse::failure(&err)
        }
    }
}

fn analyze_request(req: &AnalysisRequest) -> Result<AnalysisResult> {
    let start = Instant::now();

    if req.turn == 0 || req.turn as usize > MAX_TURNS {
        return Err(AnalysisError::UnsupportedOption(format!(
            "turn must be between 1 and {}, got {}",
            MAX_TURNS, req.turn
        )));
    }
    let types = ShantenTypes::from_bits(req.shanten_types).ok_or_else(|| {
        AnalysisError::UnsupportedOption(format!("unknown shanten types {}", req.shanten_types))
    })?;
    let options = OptionFlags::from_bits(req.options).ok_or_else(|| {
        AnalysisError::UnsupportedOption(format!("unknown option bits {:#x}", req.options))
    })?;
    if req.dora_indicators.len() > MAX_DORA_INDICATORS {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "at most {} dora indicators, got {}",
            MAX_DORA_INDICATORS,
            req.dora_indicators.len()
        )));
    }

    let melds = meld_blocks(&req.melds)?;
    let hand = Hand::new(req.hand.clone(), melds)?;

    let computed = remaining(hand.tiles(), &req.dora_indicators, hand.melds())?;
    let wall = match &req.wall {
        Some(supplied) => validate_wall(supplied, &computed)?,
        None => computed,
    };

    let shanten = shanten(hand.counts(), hand.melds(), types)?;
    debug!(
        tiles = hand.len(),
        melds = hand.melds().len(),
        turn = req.turn,
        options = options.bits(),
        shanten = shanten.overall,
        "analysis request"
    );

    let fc = ForecastContext {
        round_wind: req.round_wind,
        seat_wind: req.seat_wind,
        dora_indicators: req.dora_indicators.clone(),
        types,
        options,
    };

    let outcome = if hand.can_discard() {
        AnalysisOutcome::Discard {
            candidates: forecast_discards(&hand, &wall, &fc, req.turn)?,
        }
    } else {
        AnalysisOutcome::Draw {
            required_tiles: required_tiles(hand.counts(), hand.melds(), types, &wall)?,
            rows: forecast_draw(&hand, &wall, &fc)?,
        }
    };

    let elapsed_us = start.elapsed().as_micros() as u64;
    debug!(elapsed_us, "analysis finished");
    Ok(AnalysisResult {
        shanten,
        elapsed_us,
        outcome,
    })
}
