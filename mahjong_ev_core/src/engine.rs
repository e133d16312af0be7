use crate::decompose::{decompose, is_seven_pairs};
use crate::dora::{count_aka, count_dora};
use crate::error::{AnalysisError, Result};
use crate::fu::{calc_fu, wait_candidates};
use crate::meld::MeldBlock;
use crate::points::{calc_points, seat_deltas};
use crate::analyze::MAX_DORA_INDICATORS;
use crate::tile::{add_tile, check_counts, counts_from_tiles, kind_counts, Counts, KindCounts, Tile};
use crate::yaku::{
    eval_seven_pairs, eval_thirteen_orphans, eval_yaku_standard, WinShape, Yaku, YakuEntry,
    YakuResult,
};
use crate::{Riichi, ScoreResult, WinContext, WinType};
use tracing::debug;

/// 1つの解釈での役と符（ドラ抜き）
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    pub yaku: YakuResult,
    pub fu: u32,
}

/// 副露を含めた枚数表
pub(crate) fn all_kinds(concealed: &KindCounts, melds: &[MeldBlock]) -> KindCounts {
    let mut all = *concealed;
    for t in melds.iter().flat_map(|m| m.tiles()) {
        all[t.kind()] += 1;
    }
    all
}

/// 和了形の解釈（国士・七対子・面子分解×待ち）をすべて評価する。
/// 和了形でなければ None、役のない解釈は除く。
pub(crate) fn evaluations(
    concealed: &KindCounts,
    all: &KindCounts,
    melds: &[MeldBlock],
    ctx: &WinContext,
) -> Option<Vec<Evaluation>> {
    let menzen = melds.iter().all(|m| !m.is_open());
    let shape = WinShape {
        all,
        concealed,
        win_kind: ctx.win_tile.kind(),
        menzen,
        has_melds: !melds.is_empty(),
    };

    let mut found = false;
    let mut out = vec![];

    // A: 国士無双（符は使わない）
    if let Some(yaku) = eval_thirteen_orphans(&shape, ctx) {
        found = true;
        out.push(Evaluation { yaku, fu: 0 });
    }

    // B: 七対子は 25符固定
    if is_seven_pairs(concealed, shape.has_melds) {
        found = true;
        out.push(Evaluation {
            yaku: eval_seven_pairs(&shape, ctx),
            fu: 25,
        });
    }

    // C: 4面子1雀頭。和了牌の取り方ごとに評価する
    for pattern in decompose(concealed, melds) {
        found = true;
        for wait in wait_candidates(&pattern, shape.win_kind, ctx.win_type) {
            let yaku = eval_yaku_standard(&pattern, wait, &shape, ctx);
            let fu = calc_fu(
                &pattern,
                wait,
                ctx.win_type,
                menzen,
                ctx.round_wind,
                ctx.seat_wind,
            );
            out.push(Evaluation { yaku, fu });
        }
    }

    // 役なしは無効
    out.retain(|e| e.yaku.yakuman > 0 || e.yaku.han > 0);
    found.then_some(out)
}

/// 最も点数の高い解釈。`bonus_han` はドラなど解釈によらない翻
pub(crate) fn best_evaluation(
    evals: Vec<Evaluation>,
    bonus_han: u32,
    win_type: WinType,
    dealer: bool,
) -> Option<Evaluation> {
    evals.into_iter().max_by_key(|e| {
        let bd = calc_points(
            e.fu,
            e.yaku.han + bonus_han,
            e.yaku.yakuman,
            win_type,
            dealer,
            0,
            0,
        );
        (bd.total_points, e.yaku.han, e.fu)
    })
}

/// 和了形の点数を求める。`hand` は和了牌を含む門前の牌。
pub fn score_hand(hand: &[Tile], melds: &[MeldBlock], ctx: &WinContext) -> Result<ScoreResult> {
    check_arguments(hand, melds, ctx)?;

    let counts = counts_from_tiles(hand)?;
    check_visible_tiles(&counts, melds, ctx)?;
    let concealed = kind_counts(&counts);
    let all = all_kinds(&concealed, melds);

    let evals = evaluations(&concealed, &all, melds, ctx)
        .ok_or_else(|| AnalysisError::InvalidHand("not a winning shape".into()))?;

    let dora = count_dora(&all, &ctx.dora_indicators);
    let ura = if ctx.flags.riichi != Riichi::NONE {
        count_dora(&all, &ctx.ura_indicators)
    } else {
        0
    };
    let aka = if ctx.red_dora {
        count_aka(hand, melds)
    } else {
        0
    };
    let bonus = dora + ura + aka;

    let best = best_evaluation(evals, bonus, ctx.win_type, ctx.is_dealer())
        .ok_or_else(|| AnalysisError::InvalidHand("no yaku".into()))?;
    debug!(
        han = best.yaku.han,
        fu = best.fu,
        yakuman = best.yaku.yakuman,
        "best interpretation"
    );

    let yakuman = best.yaku.yakuman;
    let mut yaku = best.yaku.yaku;
    let han = if yakuman > 0 {
        0
    } else {
        for (y, n) in [(Yaku::Dora, dora), (Yaku::Uradora, ura), (Yaku::Akadora, aka)] {
            if n > 0 {
                yaku.push(YakuEntry::new(y, n));
            }
        }
        best.yaku.han + bonus
    };

    let points = calc_points(
        best.fu,
        han,
        yakuman,
        ctx.win_type,
        ctx.is_dealer(),
        ctx.honba,
        ctx.kyotaku,
    );
    let deltas = seat_deltas(&points, ctx.seat_wind, ctx.discarder, ctx.honba);

    Ok(ScoreResult {
        yaku,
        han,
        fu: best.fu,
        yakuman,
        points,
        deltas,
        dora_han: dora,
        ura_dora_han: ura,
        aka_dora_han: aka,
    })
}

// =====================
// 引数の検査
// =====================

/// 本場・供託の上限。点数が i32 に収まる範囲
const MAX_STICKS: u32 = 1000;

fn check_arguments(hand: &[Tile], melds: &[MeldBlock], ctx: &WinContext) -> Result<()> {
    if melds.len() > 4 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "at most 4 melds, got {}",
            melds.len()
        )));
    }
    let total = hand.len() + 3 * melds.len();
    if total != 14 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "a winning hand has 14 tiles including melds, got {}",
            total
        )));
    }
    if !hand.iter().any(|t| t.kind() == ctx.win_tile.kind()) {
        return Err(AnalysisError::InvalidHand(format!(
            "winning tile {} is not in the hand",
            ctx.win_tile
        )));
    }

    for (name, n) in [("honba", ctx.honba), ("kyotaku", ctx.kyotaku)] {
        if n > MAX_STICKS {
            return Err(AnalysisError::UnsupportedOption(format!(
                "{} must be at most {}, got {}",
                name, MAX_STICKS, n
            )));
        }
    }
    for (name, inds) in [("dora", &ctx.dora_indicators), ("ura", &ctx.ura_indicators)] {
        if inds.len() > MAX_DORA_INDICATORS {
            return Err(AnalysisError::InconsistentTileCounts(format!(
                "at most {} {} indicators, got {}",
                MAX_DORA_INDICATORS,
                name,
                inds.len()
            )));
        }
    }

    let menzen = melds.iter().all(|m| !m.is_open());
    let tsumo = ctx.win_type == WinType::TSUMO;
    let f = &ctx.flags;
    let rules: [(bool, &str); 9] = [
        (f.ippatsu && f.riichi == Riichi::NONE, "ippatsu needs riichi"),
        (f.riichi != Riichi::NONE && !menzen, "riichi needs a closed hand"),
        (f.haitei && !tsumo, "haitei needs a self-drawn win"),
        (f.rinshan && !tsumo, "rinshan needs a self-drawn win"),
        (f.houtei && tsumo, "houtei needs a win on a discard"),
        (f.chankan && tsumo, "chankan needs a win on a discard"),
        (
            (f.tenhou || f.chihou) && (!tsumo || !melds.is_empty()),
            "tenhou and chihou need a self-drawn win without melds",
        ),
        (f.tenhou && !ctx.is_dealer(), "tenhou is for the dealer"),
        (f.chihou && ctx.is_dealer(), "chihou is for a non-dealer"),
    ];
    if let Some((_, msg)) = rules.iter().find(|(bad, _)| *bad) {
        return Err(AnalysisError::UnsupportedOption((*msg).into()));
    }

    match (ctx.win_type, ctx.discarder) {
        (WinType::RON, None) => Err(AnalysisError::UnsupportedOption(
            "a win on a discard needs the discarder seat".into(),
        )),
        (WinType::RON, Some(d)) if d == ctx.seat_wind => Err(AnalysisError::UnsupportedOption(
            "the discarder cannot be the winner".into(),
        )),
        (WinType::TSUMO, Some(_)) => Err(AnalysisError::UnsupportedOption(
            "a self-drawn win has no discarder".into(),
        )),
        _ => Ok(()),
    }
}

/// 手牌・副露・表示牌を合わせても同じ牌は4枚、赤は1枚まで
fn check_visible_tiles(hand: &Counts, melds: &[MeldBlock], ctx: &WinContext) -> Result<()> {
    let mut seen = *hand;
    let indicators = ctx.dora_indicators.iter().chain(&ctx.ura_indicators);
    for &t in melds.iter().flat_map(|m| m.tiles()).chain(indicators) {
        add_tile(&mut seen, t);
    }
    check_counts(&seen)
}
