use crate::{WinType, Wind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScoreTitle {
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    CountedYakuman,
    Yakuman,
    DoubleYakuman,
    TripleYakuman,
    QuadrupleYakuman,
    QuintupleYakuman,
    SextupleYakuman,
}

/// 点数区分。満貫未満は None
pub fn score_title(han: u32, fu: u32, yakuman: u32) -> Option<ScoreTitle> {
    match yakuman {
        0 => {}
        1 => return Some(ScoreTitle::Yakuman),
        2 => return Some(ScoreTitle::DoubleYakuman),
        3 => return Some(ScoreTitle::TripleYakuman),
        4 => return Some(ScoreTitle::QuadrupleYakuman),
        5 => return Some(ScoreTitle::QuintupleYakuman),
        _ => return Some(ScoreTitle::SextupleYakuman),
    }
    match han {
        0..=2 => None,
        3 if fu >= 70 => Some(ScoreTitle::Mangan),
        4 if fu >= 40 => Some(ScoreTitle::Mangan),
        3 | 4 => None,
        5 => Some(ScoreTitle::Mangan),
        6 | 7 => Some(ScoreTitle::Haneman),
        8..=10 => Some(ScoreTitle::Baiman),
        11 | 12 => Some(ScoreTitle::Sanbaiman),
        _ => Some(ScoreTitle::CountedYakuman),
    }
}

/// 基本点。満貫以上は区分ごとの固定値
pub fn base_points(han: u32, fu: u32, yakuman: u32) -> u32 {
    match score_title(han, fu, yakuman) {
        None => fu * (1u32 << (han + 2)),
        Some(ScoreTitle::Mangan) => 2000,
        Some(ScoreTitle::Haneman) => 3000,
        Some(ScoreTitle::Baiman) => 4000,
        Some(ScoreTitle::Sanbaiman) => 6000,
        Some(ScoreTitle::CountedYakuman) => 8000,
        Some(_) => 8000 * yakuman.min(6),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointBreakdown {
    /// 和了者の収入（本場・供託込み）
    pub total_points: u32,
    pub title: Option<ScoreTitle>,
    /// ロンで放銃者が払う点（本場抜き）
    pub ron: u32,
    /// ツモで親が払う点（子の和了のみ）
    pub from_dealer: u32,
    /// ツモで子が払う点
    pub from_non_dealer: u32,
}

/// 点数計算（100点単位切り上げ）
/// - 親/子、ロン/ツモ
/// - 本場（ロン 300、ツモ 1人100）
/// - 供託（1本 1000 を和了者へ）
pub fn calc_points(
    fu: u32,
    han: u32,
    yakuman: u32,
    win_type: WinType,
    dealer: bool,
    honba: u32,
    kyotaku: u32,
) -> PointBreakdown {
    let base = base_points(han, fu, yakuman);
    let title = score_title(han, fu, yakuman);

    let (ron, from_dealer, from_non_dealer, total) = match win_type {
        WinType::RON => {
            let ron = round_up_100(base * if dealer { 6 } else { 4 });
            (ron, 0, 0, ron + 300 * honba)
        }
        WinType::TSUMO => {
            if dealer {
                let each = round_up_100(base * 2);
                (0, 0, each, (each + 100 * honba) * 3)
            } else {
                let d = round_up_100(base * 2);
                let nd = round_up_100(base);
                (0, d, nd, d + nd * 2 + 300 * honba)
            }
        }
    };

    PointBreakdown {
        total_points: total + 1000 * kyotaku,
        title,
        ron,
        from_dealer,
        from_non_dealer,
    }
}

/// 局収支（東南西北の順）。和了者は供託分だけ全体の和より多く受け取る
pub fn seat_deltas(
    bd: &PointBreakdown,
    winner: Wind,
    discarder: Option<Wind>,
    honba: u32,
) -> [i32; 4] {
    let mut deltas = [0i32; 4];
    let w = winner.index();
    deltas[w] = bd.total_points as i32;

    match discarder {
        Some(d) => {
            deltas[d.index()] -= (bd.ron + 300 * honba) as i32;
        }
        None => {
            for seat in (0..4).filter(|&s| s != w) {
                let pay = if seat == Wind::E.index() {
                    bd.from_dealer
                } else {
                    bd.from_non_dealer
                };
                deltas[seat] -= (pay + 100 * honba) as i32;
            }
        }
    }
    deltas
}

fn round_up_100(x: u32) -> u32 {
    x.div_ceil(100) * 100
}
