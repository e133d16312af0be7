use crate::dora::count_dora;
use crate::engine::{all_kinds, best_evaluation, evaluations};
use crate::error::{AnalysisError, Result};
use crate::hand::Hand;
use crate::meld::MeldBlock;
use crate::options::{OptionFlags, ShantenTypes};
use crate::points::calc_points;
use crate::required::{discard_candidates, RequiredTile};
use crate::shanten::{shanten, shanten_of_kinds};
use crate::tile::{Counts, KindCounts, Tile, DISCARD_PRIORITY, FIVE_KINDS, KIND_COUNT};
use crate::uradora::{uradora_distribution, UradoraDist};
use crate::wall::sum_left;
use crate::{Flags, Riichi, WinContext, WinType, Wind};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// 1局の自摸の回数
pub const MAX_TURNS: usize = 17;
/// 期待値を計算する向聴数の上限。これより遠い手は有効牌だけを返す
pub const MAX_FORECAST_SHANTEN: i32 = 3;
/// 向聴戻しを考える向聴数（この値未満）
const SHANTEN_DOWN_MAX: i32 = 3;
/// 手変わりを考える向聴数（この値以下）
const TEGAWARI_MAX_SHANTEN: i32 = 1;
/// 和了で増える翻（ダブル立直・一発・海底）の組み合わせ数
const BONUS_LEVELS: usize = 4;
const CACHE_LEVELS: usize = MAX_FORECAST_SHANTEN as usize + 2;

/// 巡目ごとの見通し。`turn` 巡目にいる場合の値
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub turn: u8,
    pub tenpai_prob: f64,
    pub win_prob: f64,
    pub exp_value: f64,
}

/// 14枚の手の打牌候補と、その見通し
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCandidate {
    pub tile: Tile,
    pub shanten: i32,
    pub shanten_down: bool,
    pub required_tiles: Vec<RequiredTile>,
    /// 有効牌の残り枚数の合計
    pub required_count: u32,
    /// 向聴数が遠すぎる場合は空
    pub rows: Vec<ForecastRow>,
}

/// 見通しの計算に使う局の状況
#[derive(Debug, Clone)]
pub struct ForecastContext {
    pub round_wind: Wind,
    pub seat_wind: Wind,
    pub dora_indicators: Vec<Tile>,
    pub types: ShantenTypes,
    pub options: OptionFlags,
}

/// 13枚の手の見通し（1..=17 巡目）
pub fn forecast_draw(hand: &Hand, wall: &Counts, fc: &ForecastContext) -> Result<Vec<ForecastRow>> {
    if hand.len() != 13 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "a draw forecast needs 13 tiles, got {}",
            hand.len()
        )));
    }
    let s = shanten(hand.counts(), hand.melds(), fc.types)?.overall;
    if s > MAX_FORECAST_SHANTEN {
        debug!(shanten = s, "too far from tenpai for a forecast");
        return Ok(vec![]);
    }
    check_wall(wall)?;

    let mut sim = Sim::new(fc, hand, wall);
    let values = sim.draw(s);
    debug!(
        shanten = s,
        draw_states = sim.draw_states(),
        discard_states = sim.discard_states(),
        "draw forecast finished"
    );
    Ok(to_rows(&values, s == 0))
}

/// 14枚の手の打牌候補ごとの見通し。`turn` 巡目の値で並べる
pub fn forecast_discards(
    hand: &Hand,
    wall: &Counts,
    fc: &ForecastContext,
    turn: u8,
) -> Result<Vec<ForecastCandidate>> {
    if hand.len() != 14 {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "a discard forecast needs 14 tiles, got {}",
            hand.len()
        )));
    }
    let candidates = discard_candidates(
        hand.counts(),
        hand.melds(),
        fc.types,
        wall,
        fc.options.shanten_down(),
    )?;
    check_wall(wall)?;

    // 候補ごとに独立したキャッシュで並列に計算する
    let mut out: Vec<ForecastCandidate> = candidates
        .into_par_iter()
        .map(|c| {
            let rows = if c.shanten <= MAX_FORECAST_SHANTEN {
                let mut sim = Sim::new(fc, hand, wall);
                sim.remove(c.tile.kind());
                if c.shanten_down {
                    sim.state.n_extra = 1;
                }
                let values = sim.draw(c.shanten);
                to_rows(&values, c.shanten == 0)
            } else {
                vec![]
            };
            ForecastCandidate {
                tile: c.tile,
                shanten: c.shanten,
                shanten_down: c.shanten_down,
                required_count: c.required_tiles.iter().map(|r| r.count as u32).sum(),
                required_tiles: c.required_tiles,
                rows,
            }
        })
        .collect();

    rank_candidates(&mut out, turn, fc.options.maximize_win_prob());
    debug!(candidates = out.len(), "discard forecast finished");
    Ok(out)
}

/// 指定巡目の値で候補を並べる。見通しのない候補は有効牌の枚数で後ろに並べる
pub fn rank_candidates(cands: &mut [ForecastCandidate], turn: u8, maximize_win_prob: bool) {
    let idx = (turn as usize).clamp(1, MAX_TURNS) - 1;
    cands.sort_by(|a, b| {
        let by_value = match (a.rows.get(idx), b.rows.get(idx)) {
            (Some(ra), Some(rb)) => {
                let win = rb.win_prob.total_cmp(&ra.win_prob);
                let ev = rb.exp_value.total_cmp(&ra.exp_value);
                if maximize_win_prob {
                    win.then(ev)
                } else {
                    ev.then(win)
                }
            }
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a
                .shanten_down
                .cmp(&b.shanten_down)
                .then(b.required_count.cmp(&a.required_count)),
        };
        by_value
            .then_with(|| DISCARD_PRIORITY[b.tile.kind()].cmp(&DISCARD_PRIORITY[a.tile.kind()]))
            .then_with(|| a.tile.cmp(&b.tile))
    });
}

fn check_wall(wall: &Counts) -> Result<()> {
    let n = sum_left(wall);
    if (n as usize) < MAX_TURNS {
        return Err(AnalysisError::InconsistentTileCounts(format!(
            "a forecast needs at least {} unseen tiles, got {}",
            MAX_TURNS, n
        )));
    }
    Ok(())
}

fn to_rows(values: &Values, tenpai_now: bool) -> Vec<ForecastRow> {
    (0..MAX_TURNS)
        .map(|i| ForecastRow {
            turn: (i + 1) as u8,
            // すでに聴牌している場合
            tenpai_prob: if tenpai_now { 1.0 } else { values.tenpai[i] },
            win_prob: values.win[i],
            exp_value: values.ev[i],
        })
        .collect()
}

// =====================
// 探索
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct State {
    hand: KindCounts,
    wall: Counts,
    /// 手牌にある赤5
    reds: [bool; 3],
    /// 使った交換（向聴戻し・手変わり）の回数
    n_extra: u8,
}

#[derive(Debug, Default)]
struct Values {
    tenpai: [f64; MAX_TURNS],
    win: [f64; MAX_TURNS],
    ev: [f64; MAX_TURNS],
}

enum Outcome {
    /// 聴牌から和了した場合の点数（追加の翻 0..=3 ごと）
    Scores([f64; BONUS_LEVELS]),
    /// 向聴数が1つ進んだ後の見通し
    Values(Rc<Values>),
}

#[derive(Clone, Copy)]
struct DrawKind {
    kind: usize,
    count: u8,
    improves: bool,
}

type StateCache = HashMap<State, Rc<Values>>;

struct Sim<'a> {
    fc: &'a ForecastContext,
    melds: &'a [MeldBlock],
    menzen: bool,
    meld_reds: u32,
    base_wall: Counts,
    win_ctx: WinContext,

    state: State,

    tsumo_prob: [[f64; MAX_TURNS]; 5],
    not_tsumo_prob: Vec<[f64; MAX_TURNS]>,

    draw_cache: [StateCache; CACHE_LEVELS],
    discard_cache: [StateCache; CACHE_LEVELS],
    shanten_cache: HashMap<KindCounts, i32>,
    score_cache: HashMap<(KindCounts, usize, [bool; 3]), Option<[f64; BONUS_LEVELS]>>,
}

impl<'a> Sim<'a> {
    fn new(fc: &'a ForecastContext, hand: &'a Hand, wall: &Counts) -> Self {
        let n_left = sum_left(wall) as usize;
        let menzen = hand.is_closed();
        Sim {
            fc,
            melds: hand.melds(),
            menzen,
            meld_reds: hand.melds().iter().map(|m| m.red_count() as u32).sum(),
            base_wall: *wall,
            win_ctx: WinContext {
                round_wind: fc.round_wind,
                seat_wind: fc.seat_wind,
                win_tile: Tile::M1,
                win_type: WinType::TSUMO,
                // 門前なら立直している
                flags: Flags {
                    riichi: if menzen { Riichi::RIICHI } else { Riichi::NONE },
                    ..Flags::default()
                },
                dora_indicators: vec![],
                ura_indicators: vec![],
                honba: 0,
                kyotaku: 0,
                discarder: None,
                red_dora: true,
            },
            state: State {
                hand: hand.kinds(),
                wall: *wall,
                reds: hand.reds(),
                n_extra: 0,
            },
            tsumo_prob: build_tsumo_prob_table(n_left),
            not_tsumo_prob: build_not_tsumo_prob_table(n_left),
            draw_cache: Default::default(),
            discard_cache: Default::default(),
            shanten_cache: HashMap::new(),
            score_cache: HashMap::new(),
        }
    }

    fn draw_states(&self) -> usize {
        self.draw_cache.iter().map(HashMap::len).sum()
    }

    fn discard_states(&self) -> usize {
        self.discard_cache.iter().map(HashMap::len).sum()
    }

    fn options(&self) -> OptionFlags {
        self.fc.options
    }

    // ===== 手牌の操作 =====

    fn deal(&mut self, kind: usize, red: bool) {
        self.state.hand[kind] += 1;
        self.state.wall[kind] -= 1;
        if red {
            if let Some(r) = five_index(kind) {
                self.state.reds[r] = true;
                self.state.wall[KIND_COUNT + r] = 0;
            }
        }
    }

    fn undo_deal(&mut self, kind: usize, red: bool) {
        self.state.hand[kind] -= 1;
        self.state.wall[kind] += 1;
        if red {
            if let Some(r) = five_index(kind) {
                self.state.reds[r] = false;
                self.state.wall[KIND_COUNT + r] = 1;
            }
        }
    }

    /// 1枚切る。赤5は最後の1枚のときだけ切る。赤を切ったら true
    fn remove(&mut self, kind: usize) -> bool {
        self.state.hand[kind] -= 1;
        if let Some(r) = five_index(kind) {
            if self.state.reds[r] && self.state.hand[kind] == 0 {
                self.state.reds[r] = false;
                return true;
            }
        }
        false
    }

    fn restore(&mut self, kind: usize, red: bool) {
        self.state.hand[kind] += 1;
        if red {
            if let Some(r) = five_index(kind) {
                self.state.reds[r] = true;
            }
        }
    }

    fn shanten_of(&mut self, hand: KindCounts) -> i32 {
        if let Some(&s) = self.shanten_cache.get(&hand) {
            return s;
        }
        let s = shanten_of_kinds(&hand, self.melds.len(), self.fc.types).overall;
        self.shanten_cache.insert(hand, s);
        s
    }

    /// 山に残っている種類ごとの自摸候補
    fn draw_kinds(&mut self, shanten: i32) -> Vec<DrawKind> {
        let mut out = Vec::with_capacity(KIND_COUNT);
        for kind in 0..KIND_COUNT {
            let count = self.state.wall[kind];
            if count == 0 || self.state.hand[kind] >= 4 {
                continue;
            }
            let mut next = self.state.hand;
            next[kind] += 1;
            let improves = self.shanten_of(next) < shanten;
            out.push(DrawKind {
                kind,
                count,
                improves,
            });
        }
        out
    }

    /// 5を引く場合の赤/普通の内訳（重み, 赤か）
    fn draw_variants(&self, kind: usize, count: u8) -> Vec<(f64, bool)> {
        let red_left = five_index(kind).is_some_and(|r| self.state.wall[KIND_COUNT + r] > 0);
        if !red_left {
            return vec![(1.0, false)];
        }
        if count <= 1 {
            // 残りは赤だけ
            return vec![(1.0, true)];
        }
        if self.options().red_five_draw() {
            let c = count as f64;
            vec![(1.0 / c, true), ((c - 1.0) / c, false)]
        } else {
            vec![(1.0, false)]
        }
    }

    fn outcomes(&mut self, kind: usize, count: u8, shanten: i32) -> Vec<(f64, Outcome)> {
        let mut out = vec![];
        for (weight, red) in self.draw_variants(kind, count) {
            self.deal(kind, red);
            let outcome = if shanten > 0 {
                Some(Outcome::Values(self.discard(shanten - 1)))
            } else {
                self.score(kind).map(Outcome::Scores)
            };
            self.undo_deal(kind, red);
            if let Some(o) = outcome {
                out.push((weight, o));
            }
        }
        out
    }

    /// 和了時に追加される翻の数
    fn bonus_index(&self, i: usize, j: usize) -> usize {
        let opts = self.options();
        // 1巡目に聴牌していればダブル立直
        let double_riichi = self.menzen && opts.double_riichi() && i == 0;
        // 聴牌した次の自摸で和了なら一発
        let ippatsu = self.menzen && opts.ippatsu() && j == i;
        // 最後の自摸なら海底摸月
        let haitei = opts.haitei() && j == MAX_TURNS - 1;
        double_riichi as usize + ippatsu as usize + haitei as usize
    }

    fn accumulate(&self, v: &mut Values, shanten: i32, outcome: &Outcome, p: f64, i: usize, j: usize) {
        match outcome {
            Outcome::Scores(scores) => {
                v.win[i] += p;
                v.ev[i] += p * scores[self.bonus_index(i, j)];
            }
            Outcome::Values(next) => {
                if shanten == 1 {
                    // 1向聴なら次で聴牌
                    v.tenpai[i] += p;
                }
                if j + 1 < MAX_TURNS {
                    if shanten > 1 {
                        v.tenpai[i] += p * next.tenpai[j + 1];
                    }
                    v.win[i] += p * next.win[j + 1];
                    v.ev[i] += p * next.ev[j + 1];
                }
            }
        }
    }

    // ===== 自摸 =====

    fn draw(&mut self, shanten: i32) -> Rc<Values> {
        let level = shanten as usize;
        if let Some(v) = self.draw_cache[level].get(&self.state) {
            return Rc::clone(v);
        }
        let values = if self.options().tegawari()
            && self.state.n_extra == 0
            && shanten <= TEGAWARI_MAX_SHANTEN
        {
            self.draw_with_tegawari(shanten)
        } else {
            self.draw_without_tegawari(shanten)
        };
        let values = Rc::new(values);
        self.draw_cache[level].insert(self.state.clone(), Rc::clone(&values));
        values
    }

    fn draw_without_tegawari(&mut self, shanten: i32) -> Values {
        let mut v = Values::default();
        let draws = self.draw_kinds(shanten);

        // 有効牌の合計枚数
        let sum_required: usize = draws
            .iter()
            .filter(|d| d.improves)
            .map(|d| d.count as usize)
            .sum();
        let not_tsumo = self.not_tsumo_prob[sum_required];

        for d in draws.into_iter().filter(|d| d.improves) {
            let outcomes = self.outcomes(d.kind, d.count, shanten);
            if outcomes.is_empty() {
                continue;
            }
            let tsumo = self.tsumo_prob[d.count as usize];
            for i in 0..MAX_TURNS {
                let m = not_tsumo[i];
                if m == 0.0 {
                    break;
                }
                for j in i..MAX_TURNS {
                    let n = not_tsumo[j];
                    if n == 0.0 {
                        break;
                    }
                    // i 巡目にいて j 巡目に初めて有効牌を引く確率
                    let prob = tsumo[j] * n / m;
                    for (w, o) in &outcomes {
                        self.accumulate(&mut v, shanten, o, prob * w, i, j);
                    }
                }
            }
        }
        v
    }

    /// 有効牌以外を引いて手を組み替える場合も考える。
    /// 巡目ごとの残り枚数を追えないので、自摸の確率は「残り枚数 / 合計」で近似する。
    fn draw_with_tegawari(&mut self, shanten: i32) -> Values {
        let mut v = Values::default();
        let draws = self.draw_kinds(shanten);
        let total = sum_left(&self.state.wall) as f64;

        for d in &draws {
            let p = d.count as f64 / total;
            if d.improves {
                let outcomes = self.outcomes(d.kind, d.count, shanten);
                // 組み替え後の巡目は追えないので、どの巡目の自摸も一発圏内として扱う
                for i in 0..MAX_TURNS {
                    for (w, o) in &outcomes {
                        self.accumulate(&mut v, shanten, o, p * w, i, i);
                    }
                }
            } else {
                let mut nexts = vec![];
                for (w, red) in self.draw_variants(d.kind, d.count) {
                    self.deal(d.kind, red);
                    self.state.n_extra += 1;
                    nexts.push((w, self.discard(shanten)));
                    self.state.n_extra -= 1;
                    self.undo_deal(d.kind, red);
                }
                for i in 0..MAX_TURNS - 1 {
                    for (w, next) in &nexts {
                        let q = p * w;
                        v.tenpai[i] += q * next.tenpai[i + 1];
                        v.win[i] += q * next.win[i + 1];
                        v.ev[i] += q * next.ev[i + 1];
                    }
                }
            }
        }
        v
    }

    // ===== 打牌 =====

    fn discard(&mut self, shanten: i32) -> Rc<Values> {
        let level = shanten as usize;
        if let Some(v) = self.discard_cache[level].get(&self.state) {
            return Rc::clone(v);
        }
        let values = Rc::new(self.discard_slow(shanten));
        self.discard_cache[level].insert(self.state.clone(), Rc::clone(&values));
        values
    }

    /// 巡目ごとに期待値（または和了確率）が最大の打牌を選ぶ
    fn discard_slow(&mut self, shanten: i32) -> Values {
        let maximize = self.options().maximize_win_prob();
        let mut best = Values::default();
        let mut best_keys: [Option<(i64, u8)>; MAX_TURNS] = [None; MAX_TURNS];

        for kind in 0..KIND_COUNT {
            if self.state.hand[kind] == 0 {
                continue;
            }
            let red = self.remove(kind);
            let after = self.shanten_of(self.state.hand);
            let values = if after == shanten {
                Some(self.draw(shanten))
            } else if after == shanten + 1
                && self.options().shanten_down()
                && self.state.n_extra == 0
                && shanten < SHANTEN_DOWN_MAX
            {
                // 向聴戻し
                self.state.n_extra += 1;
                let v = self.draw(shanten + 1);
                self.state.n_extra -= 1;
                Some(v)
            } else {
                None
            };
            self.restore(kind, red);

            let Some(values) = values else {
                continue;
            };
            let priority = DISCARD_PRIORITY[kind];
            for i in 0..MAX_TURNS {
                // 和了確率は小数5桁、期待値は1点単位で同じなら同等とみなす
                let key = if maximize {
                    (values.win[i] * 1e5) as i64
                } else {
                    values.ev[i] as i64
                };
                let better = match best_keys[i] {
                    None => true,
                    Some((k, p)) => key > k || (key == k && priority > p),
                };
                if better {
                    best_keys[i] = Some((key, priority));
                    best.tenpai[i] = values.tenpai[i];
                    best.win[i] = values.win[i];
                    best.ev[i] = values.ev[i];
                }
            }
        }
        best
    }

    // ===== 点数 =====

    /// 和了形の自摸和了の点数。役がなければ None
    fn score(&mut self, win_kind: usize) -> Option<[f64; BONUS_LEVELS]> {
        let key = (self.state.hand, win_kind, self.state.reds);
        if let Some(s) = self.score_cache.get(&key) {
            return *s;
        }
        let s = self.score_slow(win_kind);
        self.score_cache.insert(key, s);
        s
    }

    fn score_slow(&mut self, win_kind: usize) -> Option<[f64; BONUS_LEVELS]> {
        let concealed = self.state.hand;
        let all = all_kinds(&concealed, self.melds);
        self.win_ctx.win_tile = Tile::from_kind(win_kind);
        let dealer = self.win_ctx.is_dealer();

        let evals = evaluations(&concealed, &all, self.melds, &self.win_ctx)?;
        let aka = self.state.reds.iter().filter(|&&r| r).count() as u32 + self.meld_reds;
        let dora = count_dora(&all, &self.fc.dora_indicators) + aka;
        let best = best_evaluation(evals, dora, WinType::TSUMO, dealer)?;

        let total = |han: u32| {
            calc_points(best.fu, han, best.yaku.yakuman, WinType::TSUMO, dealer, 0, 0).total_points
                as f64
        };
        if best.yaku.yakuman > 0 {
            return Some([total(0); BONUS_LEVELS]);
        }

        let base = best.yaku.han + dora;
        let ura: Option<UradoraDist> = (self.options().uradora() && self.menzen).then(|| {
            let n_indicators = self.fc.dora_indicators.len().max(1);
            uradora_distribution(&all, &self.base_wall, n_indicators)
        });

        let mut scores = [0.0; BONUS_LEVELS];
        for (b, s) in scores.iter_mut().enumerate() {
            let han = base + b as u32;
            *s = match &ura {
                Some(dist) => dist
                    .iter()
                    .enumerate()
                    .filter(|&(_, &p)| p > 0.0)
                    .map(|(k, &p)| p * total(han + k as u32))
                    .sum(),
                None => total(han),
            };
        }
        Some(scores)
    }
}

fn five_index(kind: usize) -> Option<usize> {
    FIVE_KINDS.iter().position(|&f| f == kind)
}

fn build_tsumo_prob_table(n_left: usize) -> [[f64; MAX_TURNS]; 5] {
    // tsumo[c][j] = 有効牌が c 枚のとき j 巡目にそれを引く確率
    let mut table = [[0.0; MAX_TURNS]; 5];
    for (c, row) in table.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = c as f64 / (n_left - j) as f64;
        }
    }
    table
}

fn build_not_tsumo_prob_table(n_left: usize) -> Vec<[f64; MAX_TURNS]> {
    // not_tsumo[s][j] = 有効牌が合計 s 枚のとき j - 1 巡目まで1枚も引けない確率
    let mut table = vec![[0.0; MAX_TURNS]; n_left + 1];
    for (s, row) in table.iter_mut().enumerate() {
        row[0] = 1.0;
        // 残りがすべて有効牌になったら打ち切り
        for j in 0..(MAX_TURNS - 1).min(n_left - s) {
            row[j + 1] = row[j] * (n_left - s - j) as f64 / (n_left - j) as f64;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::remaining;

    fn tenpai_tiles() -> Vec<Tile> {
        // 222m 567m 34p 33s 678s → 2p/5p 待ち
        vec![
            Tile::M2,
            Tile::M2,
            Tile::M2,
            Tile::M5,
            Tile::M6,
            Tile::M7,
            Tile::P3,
            Tile::P4,
            Tile::S3,
            Tile::S3,
            Tile::S6,
            Tile::S7,
            Tile::S8,
        ]
    }

    fn context(options: OptionFlags) -> ForecastContext {
        ForecastContext {
            round_wind: Wind::E,
            seat_wind: Wind::S,
            dora_indicators: vec![],
            types: ShantenTypes::ALL,
            options,
        }
    }

    fn draw_rows(tiles: Vec<Tile>, options: OptionFlags) -> Vec<ForecastRow> {
        let wall = remaining(&tiles, &[], &[]).unwrap();
        let hand = Hand::new(tiles, vec![]).unwrap();
        forecast_draw(&hand, &wall, &context(options)).unwrap()
    }

    #[test]
    fn tables_are_probabilities() {
        let t = build_tsumo_prob_table(123);
        assert!((t[4][0] - 4.0 / 123.0).abs() < 1e-12);
        assert!((t[4][16] - 4.0 / 107.0).abs() < 1e-12);
        let nt = build_not_tsumo_prob_table(123);
        assert_eq!(nt[0][16], 1.0);
        assert!((nt[8][1] - 115.0 / 123.0).abs() < 1e-12);
        assert!(nt[8].windows(2).all(|w| w[0] >= w[1]));
        // 全部が有効牌なら2巡目以降はありえない
        assert_eq!(nt[123][1], 0.0);
    }

    #[test]
    fn tenpai_hand_rows() {
        let rows = draw_rows(tenpai_tiles(), OptionFlags::NONE);
        assert_eq!(rows.len(), MAX_TURNS);
        assert!(rows.iter().all(|r| r.tenpai_prob == 1.0));
        assert_eq!(rows[0].turn, 1);
        assert_eq!(rows[16].turn, 17);

        // 最後の1回の自摸で 2p/5p の8枚のどれかを引く
        let last = rows[16].win_prob;
        assert!((last - 8.0 / 107.0).abs() < 1e-9, "{}", last);

        // 残り自摸が多いほど和了しやすい
        assert!(rows.windows(2).all(|w| w[0].win_prob >= w[1].win_prob));
        assert!(rows.iter().all(|r| r.win_prob <= 1.0 + 1e-9));
        assert!(rows[0].exp_value > rows[16].exp_value);
        assert!(rows[16].exp_value > 0.0);
    }

    #[test]
    fn forecasts_are_deterministic() {
        let a = draw_rows(tenpai_tiles(), OptionFlags::URADORA | OptionFlags::IPPATSU);
        let b = draw_rows(tenpai_tiles(), OptionFlags::URADORA | OptionFlags::IPPATSU);
        assert_eq!(a, b);
    }

    #[test]
    fn bonus_options_raise_expected_value() {
        let plain = draw_rows(tenpai_tiles(), OptionFlags::NONE);
        for opt in [
            OptionFlags::IPPATSU,
            OptionFlags::DOUBLE_RIICHI,
            OptionFlags::HAITEI,
            OptionFlags::URADORA,
            OptionFlags::RED_FIVE_DRAW,
        ] {
            let rows = draw_rows(tenpai_tiles(), opt);
            assert!(
                rows[0].exp_value > plain[0].exp_value,
                "{:?}: {} <= {}",
                opt,
                rows[0].exp_value,
                plain[0].exp_value
            );
            // 和了確率は変わらない
            assert!((rows[0].win_prob - plain[0].win_prob).abs() < 1e-12);
        }
        // ダブル立直は1巡目だけ
        let dr = draw_rows(tenpai_tiles(), OptionFlags::DOUBLE_RIICHI);
        assert_eq!(dr[1].exp_value, plain[1].exp_value);
    }

    #[test]
    fn one_shanten_reaches_tenpai_before_winning() {
        // 222m 567m 34p 3s 678s W
        let mut tiles = tenpai_tiles();
        tiles[9] = Tile::WEST;
        let rows = draw_rows(tiles, OptionFlags::NONE);
        assert_eq!(rows.len(), MAX_TURNS);
        let first = rows[0];
        assert!(first.tenpai_prob > 0.0 && first.tenpai_prob <= 1.0 + 1e-9);
        assert!(first.win_prob < first.tenpai_prob);
        // 最後の巡目からは聴牌しても和了できない
        assert_eq!(rows[16].win_prob, 0.0);
        assert!(rows[16].tenpai_prob > 0.0);
    }

    #[test]
    fn tegawari_keeps_rows_finite() {
        let rows = draw_rows(tenpai_tiles(), OptionFlags::TEGAWARI);
        assert_eq!(rows.len(), MAX_TURNS);
        assert!(rows.iter().all(|r| r.exp_value.is_finite() && r.exp_value >= 0.0));
        assert!(rows[0].win_prob > 0.0);
    }

    #[test]
    fn far_hands_have_no_rows() {
        let tiles = vec![
            Tile::M1,
            Tile::M4,
            Tile::M7,
            Tile::P1,
            Tile::P4,
            Tile::P7,
            Tile::S1,
            Tile::S4,
            Tile::S7,
            Tile::EAST,
            Tile::SOUTH,
            Tile::WEST,
            Tile::NORTH,
        ];
        assert!(draw_rows(tiles, OptionFlags::NONE).is_empty());
    }

    #[test]
    fn thin_wall_is_rejected() {
        let tiles = tenpai_tiles();
        let mut wall = [0u8; crate::tile::SLOT_COUNT];
        wall[Tile::P2.kind()] = 4;
        wall[Tile::P5.kind()] = 4;
        let hand = Hand::new(tiles, vec![]).unwrap();
        let err = forecast_draw(&hand, &wall, &context(OptionFlags::NONE)).unwrap_err();
        assert!(matches!(err, AnalysisError::InconsistentTileCounts(_)));
    }

    #[test]
    fn discarding_north_ranks_first() {
        let mut tiles = tenpai_tiles();
        tiles.push(Tile::NORTH);
        let wall = remaining(&tiles, &[], &[]).unwrap();
        let hand = Hand::new(tiles, vec![]).unwrap();

        for opts in [
            OptionFlags::SHANTEN_DOWN,
            OptionFlags::SHANTEN_DOWN | OptionFlags::MAXIMIZE_WIN_PROB,
        ] {
            let cands = forecast_discards(&hand, &wall, &context(opts), 1).unwrap();
            assert_eq!(cands[0].tile, Tile::NORTH);
            assert!(!cands[0].shanten_down);
            assert_eq!(cands[0].required_count, 8);
            assert!(cands[1..].iter().all(|c| c.shanten_down));
            assert!(cands.iter().all(|c| c.rows.len() == MAX_TURNS));
        }

        let only_best = forecast_discards(&hand, &wall, &context(OptionFlags::NONE), 1).unwrap();
        assert_eq!(only_best.len(), 1);
        assert_eq!(only_best[0].tile, Tile::NORTH);
    }

    #[test]
    fn candidates_without_rows_sort_by_acceptance() {
        let row = ForecastRow {
            turn: 1,
            tenpai_prob: 1.0,
            win_prob: 0.5,
            exp_value: 3000.0,
        };
        let cand = |tile, down, count, rows: Vec<ForecastRow>| ForecastCandidate {
            tile,
            shanten: 4,
            shanten_down: down,
            required_tiles: vec![],
            required_count: count,
            rows,
        };
        let mut cands = vec![
            cand(Tile::M1, true, 40, vec![]),
            cand(Tile::M2, false, 10, vec![]),
            cand(Tile::M3, false, 20, vec![]),
            cand(Tile::M4, false, 0, vec![row]),
        ];
        rank_candidates(&mut cands, 1, false);
        let order: Vec<Tile> = cands.iter().map(|c| c.tile).collect();
        assert_eq!(order, vec![Tile::M4, Tile::M3, Tile::M2, Tile::M1]);
    }
}
