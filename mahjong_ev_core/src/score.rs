use crate::engine::score_hand;
use crate::error::Result;
use crate::{meld_blocks, ScoreRequest, ScoreResponse, ScoreResult, WinContext};
use tracing::{debug, warn};

/// 和了形の点数を求める。入力の誤りは success=false の応答として返す
pub fn score(req: &ScoreRequest) -> ScoreResponse {
    match score_request(req) {
        Ok(result) => ScoreResponse {
            success: true,
            message: None,
            result: Some(result),
        },
        Err(err) => {
            warn!(error = %err, "score request rejected");
            ScoreResponse {
                success: false,
                message: Some(err.to_string()),
                result: None,
            }
        }
    }
}

fn score_request(req: &ScoreRequest) -> Result<ScoreResult> {
    let melds = meld_blocks(&req.melds)?;
    debug!(
        tiles = req.hand_tiles.len(),
        melds = melds.len(),
        win_tile = %req.win_tile,
        "score request"
    );

    let ctx = WinContext {
        round_wind: req.round_wind,
        seat_wind: req.seat_wind,
        win_tile: req.win_tile,
        win_type: req.win_type,
        flags: req.flags.clone(),
        dora_indicators: req.dora_indicators.clone(),
        ura_indicators: req.ura_indicators.clone(),
        honba: req.honba,
        kyotaku: req.kyotaku,
        discarder: req.discarder,
        red_dora: req.red_dora,
    };
    score_hand(&req.hand_tiles, &melds, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ron_without_discarder_is_rejected() {
        let req: ScoreRequest = serde_json::from_value(json!({
            "round_wind": "E",
            "seat_wind": "S",
            "win_type": "RON",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
            "win_tile": 1,
        }))
        .unwrap();
        let res = score(&req);
        assert!(!res.success);
        assert!(res.message.unwrap().starts_with("unsupported option"));
    }

    #[test]
    fn tanyao_ron_pays_from_discarder() {
        // 234m 567m 345p 345s 77s、2m ロン
        let req: ScoreRequest = serde_json::from_value(json!({
            "round_wind": "E",
            "seat_wind": "S",
            "win_type": "RON",
            "discarder": "W",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
            "win_tile": 1,
            "red_dora": false,
        }))
        .unwrap();
        let res = score(&req);
        assert!(res.success, "{:?}", res.message);
        let result = res.result.unwrap();
        assert!(result.yaku.iter().any(|y| y.yaku == crate::Yaku::Tanyao));
        assert_eq!(result.deltas.iter().sum::<i32>(), 0);
        assert!(result.deltas[2] < 0);
        assert_eq!(result.deltas[0], 0);
    }
}
