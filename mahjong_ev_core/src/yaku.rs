use crate::decompose::{Block, HandPattern};
use crate::fu::{is_pinfu_shape, WaitInfo, WaitType};
use crate::tile::{KindCounts, Suit, Tile, KIND_COUNT, ORPHANS};
use crate::{Riichi, WinContext, WinType};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Yaku {
    // 1翻
    MenzenTsumo,
    Riichi,
    Ippatsu,
    Tanyao,
    Pinfu,
    Iipeikou,
    Chankan,
    Rinshan,
    Haitei,
    Houtei,
    YakuhaiWhite,
    YakuhaiGreen,
    YakuhaiRed,
    SeatWind,
    RoundWind,
    // 2翻
    DoubleRiichi,
    Chiitoitsu,
    Toitoi,
    Sanankou,
    SanshokuDoukou,
    Honroutou,
    SanshokuDoujun,
    Ittsuu,
    Chanta,
    Shousangen,
    Sankantsu,
    // 3翻以上
    Honitsu,
    Junchan,
    Ryanpeikou,
    Chinitsu,
    // 役満
    Tenhou,
    Chiihou,
    Ryuuiisou,
    Daisangen,
    Shousuushii,
    Tsuuiisou,
    Kokushi,
    Chuuren,
    Suuankou,
    Chinroutou,
    Suukantsu,
    // ダブル役満
    SuuankouTanki,
    Daisuushii,
    JunseiChuuren,
    Kokushi13,
    // ドラ（役ではない）
    Dora,
    Uradora,
    Akadora,
}

impl Yaku {
    /// (門前の翻数, 鳴きの翻数)。鳴きで不成立の役は 0
    pub const fn han(self) -> (u32, u32) {
        use Yaku::*;
        match self {
            MenzenTsumo | Riichi | Ippatsu | Pinfu | Iipeikou => (1, 0),
            Tanyao | Chankan | Rinshan | Haitei | Houtei => (1, 1),
            YakuhaiWhite | YakuhaiGreen | YakuhaiRed | SeatWind | RoundWind => (1, 1),
            DoubleRiichi | Chiitoitsu => (2, 0),
            Toitoi | Sanankou | SanshokuDoukou | Honroutou | Shousangen | Sankantsu => (2, 2),
            SanshokuDoujun | Ittsuu | Chanta => (2, 1),
            Honitsu | Junchan => (3, 2),
            Ryanpeikou => (3, 0),
            Chinitsu => (6, 5),
            _ => (0, 0),
        }
    }

    /// 役満の倍数（役満でなければ 0）
    pub const fn yakuman(self) -> u32 {
        use Yaku::*;
        match self {
            Tenhou | Chiihou | Ryuuiisou | Daisangen | Shousuushii | Tsuuiisou | Kokushi
            | Chuuren | Suuankou | Chinroutou | Suukantsu => 1,
            SuuankouTanki | Daisuushii | JunseiChuuren | Kokushi13 => 2,
            _ => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        use Yaku::*;
        match self {
            MenzenTsumo => "門前清自摸和",
            Riichi => "立直",
            Ippatsu => "一発",
            Tanyao => "断么九",
            Pinfu => "平和",
            Iipeikou => "一盃口",
            Chankan => "搶槓",
            Rinshan => "嶺上開花",
            Haitei => "海底摸月",
            Houtei => "河底撈魚",
            YakuhaiWhite => "役牌 白",
            YakuhaiGreen => "役牌 發",
            YakuhaiRed => "役牌 中",
            SeatWind => "役牌 自風",
            RoundWind => "役牌 場風",
            DoubleRiichi => "ダブル立直",
            Chiitoitsu => "七対子",
            Toitoi => "対々和",
            Sanankou => "三暗刻",
            SanshokuDoukou => "三色同刻",
            Honroutou => "混老頭",
            SanshokuDoujun => "三色同順",
            Ittsuu => "一気通貫",
            Chanta => "混全帯么九",
            Shousangen => "小三元",
            Sankantsu => "三槓子",
            Honitsu => "混一色",
            Junchan => "純全帯么九",
            Ryanpeikou => "二盃口",
            Chinitsu => "清一色",
            Tenhou => "天和",
            Chiihou => "地和",
            Ryuuiisou => "緑一色",
            Daisangen => "大三元",
            Shousuushii => "小四喜",
            Tsuuiisou => "字一色",
            Kokushi => "国士無双",
            Chuuren => "九蓮宝燈",
            Suuankou => "四暗刻",
            Chinroutou => "清老頭",
            Suukantsu => "四槓子",
            SuuankouTanki => "四暗刻単騎",
            Daisuushii => "大四喜",
            JunseiChuuren => "純正九蓮宝燈",
            Kokushi13 => "国士無双十三面待ち",
            Dora => "ドラ",
            Uradora => "裏ドラ",
            Akadora => "赤ドラ",
        }
    }

    pub const fn is_dora(self) -> bool {
        matches!(self, Yaku::Dora | Yaku::Uradora | Yaku::Akadora)
    }
}

/// 成立した役。`value` は通常役なら翻数、役満なら倍数、ドラなら枚数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YakuEntry {
    pub yaku: Yaku,
    pub name: &'static str,
    pub value: u32,
}

impl YakuEntry {
    pub fn new(yaku: Yaku, value: u32) -> Self {
        YakuEntry {
            yaku,
            name: yaku.name(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct YakuResult {
    pub yakuman: u32,
    pub han: u32,
    pub yaku: Vec<YakuEntry>,
}

impl YakuResult {
    fn add(&mut self, y: Yaku, menzen: bool) {
        let ym = y.yakuman();
        if ym > 0 {
            self.yakuman += ym;
            self.yaku.push(YakuEntry::new(y, ym));
            return;
        }
        let (closed, open) = y.han();
        let h = if menzen { closed } else { open };
        if h > 0 {
            self.han += h;
            self.yaku.push(YakuEntry::new(y, h));
        }
    }

    /// 役満があれば通常役は無視する
    fn finish(mut self) -> Self {
        if self.yakuman > 0 {
            self.yaku.retain(|e| e.yaku.yakuman() > 0);
            self.han = 0;
        }
        self
    }
}

/// 和了形の全体像。`all` は副露を含む枚数表、`concealed` は門前部分（和了牌込み）
pub struct WinShape<'a> {
    pub all: &'a KindCounts,
    pub concealed: &'a KindCounts,
    pub win_kind: usize,
    pub menzen: bool,
    pub has_melds: bool,
}

// =====================
// 状況役（全形共通）
// =====================

fn add_situational(r: &mut YakuResult, shape: &WinShape, ctx: &WinContext) {
    let menzen = shape.menzen;
    let f = &ctx.flags;

    match f.riichi {
        Riichi::DOUBLE => r.add(Yaku::DoubleRiichi, menzen),
        Riichi::RIICHI => r.add(Yaku::Riichi, menzen),
        Riichi::NONE => {}
    }
    if f.ippatsu {
        r.add(Yaku::Ippatsu, menzen);
    }
    if menzen && ctx.win_type == WinType::TSUMO {
        r.add(Yaku::MenzenTsumo, menzen);
    }
    if f.rinshan {
        r.add(Yaku::Rinshan, menzen);
    }
    if f.chankan {
        r.add(Yaku::Chankan, menzen);
    }
    if f.haitei {
        r.add(Yaku::Haitei, menzen);
    }
    if f.houtei {
        r.add(Yaku::Houtei, menzen);
    }
    if f.tenhou {
        r.add(Yaku::Tenhou, menzen);
    }
    if f.chihou {
        r.add(Yaku::Chiihou, menzen);
    }
}

// =====================
// 枚数だけで決まる役（通常形・七対子共通）
// =====================

fn add_count_based(r: &mut YakuResult, shape: &WinShape) {
    let menzen = shape.menzen;
    let all = shape.all;
    let present = move || (0..KIND_COUNT).filter(move |&k| all[k] > 0).map(Tile::from_kind);

    if present().all(|t| !t.is_terminal_or_honor()) {
        r.add(Yaku::Tanyao, menzen);
    }

    if present().all(|t| t.is_honor()) {
        r.add(Yaku::Tsuuiisou, menzen);
    } else if present().all(|t| t.is_terminal()) {
        r.add(Yaku::Chinroutou, menzen);
    } else if present().all(|t| t.is_terminal_or_honor()) {
        r.add(Yaku::Honroutou, menzen);
    }

    if present().all(is_green) {
        r.add(Yaku::Ryuuiisou, menzen);
    }

    let mut suits = present().map(|t| t.suit()).filter(|&s| s != Suit::Honor);
    if let Some(first) = suits.next() {
        if suits.all(|s| s == first) {
            if present().any(|t| t.is_honor()) {
                r.add(Yaku::Honitsu, menzen);
            } else {
                r.add(Yaku::Chinitsu, menzen);
            }
        }
    }
}

fn is_green(t: Tile) -> bool {
    t == Tile::GREEN || (t.suit() == Suit::Sou && matches!(t.number(), 2 | 3 | 4 | 6 | 8))
}

// =====================
// 通常形
// =====================

pub fn eval_yaku_standard(
    pattern: &HandPattern,
    wait: WaitInfo,
    shape: &WinShape,
    ctx: &WinContext,
) -> YakuResult {
    let menzen = shape.menzen;
    let mut r = YakuResult::default();

    add_situational(&mut r, shape, ctx);
    add_count_based(&mut r, shape);

    // ===== 平和（門前限定） =====
    if menzen && is_pinfu_shape(pattern, wait, ctx.round_wind, ctx.seat_wind) {
        r.add(Yaku::Pinfu, menzen);
    }

    // ===== 一盃口 / 二盃口（門前限定） =====
    if menzen {
        match peikou_count(pattern) {
            2 => r.add(Yaku::Ryanpeikou, menzen),
            1 => r.add(Yaku::Iipeikou, menzen),
            _ => {}
        }
    }

    // ===== 役牌（刻子/槓子） =====
    add_yakuhai(&mut r, pattern, ctx, menzen);

    // ===== 対々和 =====
    if pattern.blocks().all(|b| b.is_triplet_like()) {
        r.add(Yaku::Toitoi, menzen);
    }

    // ===== 三暗刻 / 四暗刻（ロン補正込み） =====
    let concealed_triplets = concealed_triplet_count(pattern, wait);
    if concealed_triplets == 4 {
        if pattern.pair == shape.win_kind && wait.wait_type == WaitType::Tanki {
            r.add(Yaku::SuuankouTanki, menzen);
        } else {
            r.add(Yaku::Suuankou, menzen);
        }
    } else if concealed_triplets == 3 {
        r.add(Yaku::Sanankou, menzen);
    }

    // ===== 三槓子 / 四槓子 =====
    match pattern.blocks().filter(|b| matches!(b, Block::Kantsu(_))).count() {
        4 => r.add(Yaku::Suukantsu, menzen),
        3 => r.add(Yaku::Sankantsu, menzen),
        _ => {}
    }

    // ===== 一気通貫 / 三色同順 / 三色同刻 =====
    if has_ittsuu(pattern) {
        r.add(Yaku::Ittsuu, menzen);
    }
    if has_sanshoku(pattern, |b| matches!(b, Block::Shuntsu(_))) {
        r.add(Yaku::SanshokuDoujun, menzen);
    }
    if has_sanshoku(pattern, Block::is_triplet_like) {
        r.add(Yaku::SanshokuDoukou, menzen);
    }

    // ===== 混全帯么九 / 純全帯么九（順子が必要。混老頭とは複合しない） =====
    if let Some(y) = chanta_junchan(pattern) {
        r.add(y, menzen);
    }

    // ===== 三元牌 =====
    let dragon_sets = pattern
        .blocks()
        .filter(|b| b.is_triplet_like() && Tile::from_kind(b.kind()).is_dragon())
        .count();
    let dragon_pair = Tile::from_kind(pattern.pair).is_dragon();
    if dragon_sets == 3 {
        r.add(Yaku::Daisangen, menzen);
    } else if dragon_sets == 2 && dragon_pair {
        r.add(Yaku::Shousangen, menzen);
    }

    // ===== 風牌 =====
    let wind_sets = pattern
        .blocks()
        .filter(|b| b.is_triplet_like() && Tile::from_kind(b.kind()).is_wind())
        .count();
    let wind_pair = Tile::from_kind(pattern.pair).is_wind();
    if wind_sets == 4 {
        r.add(Yaku::Daisuushii, menzen);
    } else if wind_sets == 3 && wind_pair {
        r.add(Yaku::Shousuushii, menzen);
    }

    // ===== 九蓮宝燈 =====
    if let Some(y) = chuuren(shape) {
        r.add(y, menzen);
    }

    r.finish()
}

fn add_yakuhai(r: &mut YakuResult, pattern: &HandPattern, ctx: &WinContext, menzen: bool) {
    for b in pattern.blocks().filter(|b| b.is_triplet_like()) {
        let t = Tile::from_kind(b.kind());
        match t {
            Tile::WHITE => r.add(Yaku::YakuhaiWhite, menzen),
            Tile::GREEN => r.add(Yaku::YakuhaiGreen, menzen),
            Tile::RED => r.add(Yaku::YakuhaiRed, menzen),
            _ => {}
        }
        // 連風牌なら両方乗る
        if t == ctx.seat_wind.tile() {
            r.add(Yaku::SeatWind, menzen);
        }
        if t == ctx.round_wind.tile() {
            r.add(Yaku::RoundWind, menzen);
        }
    }
}

fn peikou_count(pattern: &HandPattern) -> usize {
    let mut seqs = HashMap::<usize, u8>::new();
    for b in pattern.blocks() {
        if let Block::Shuntsu(k) = b {
            *seqs.entry(k).or_insert(0) += 1;
        }
    }
    // 同じ順子4つは二盃口
    seqs.values().map(|&c| (c / 2) as usize).sum()
}

fn concealed_triplet_count(pattern: &HandPattern, wait: WaitInfo) -> usize {
    pattern
        .mentsu
        .iter()
        .filter(|m| m.block.is_triplet_like() && !m.open)
        // シャンポンロンで完成した刻子は暗刻扱いしない
        .filter(|m| m.called || wait.ron_completed_triplet != Some(m.block.kind()))
        .count()
}

fn has_ittsuu(pattern: &HandPattern) -> bool {
    (0..3).any(|suit| {
        [0, 3, 6].iter().all(|&start| {
            pattern
                .blocks()
                .any(|b| b == Block::Shuntsu(suit * 9 + start))
        })
    })
}

fn has_sanshoku(pattern: &HandPattern, pred: impl Fn(Block) -> bool) -> bool {
    (0..9).any(|num| {
        (0..3).all(|suit| {
            pattern
                .blocks()
                .any(|b| pred(b) && b.kind() == suit * 9 + num)
        })
    })
}

fn chanta_junchan(pattern: &HandPattern) -> Option<Yaku> {
    let mut any_shuntsu = false;
    let mut any_honor = Tile::from_kind(pattern.pair).is_honor();

    if !Tile::from_kind(pattern.pair).is_terminal_or_honor() {
        return None;
    }
    for b in pattern.blocks() {
        match b {
            Block::Shuntsu(k) => {
                // 順子は 123 か 789 のみ
                if k % 9 != 0 && k % 9 != 6 {
                    return None;
                }
                any_shuntsu = true;
            }
            Block::Koutsu(k) | Block::Kantsu(k) => {
                let t = Tile::from_kind(k);
                if !t.is_terminal_or_honor() {
                    return None;
                }
                any_honor |= t.is_honor();
            }
        }
    }

    if !any_shuntsu {
        return None;
    }
    Some(if any_honor { Yaku::Chanta } else { Yaku::Junchan })
}

fn chuuren(shape: &WinShape) -> Option<Yaku> {
    if shape.has_melds || !shape.menzen {
        return None;
    }
    let c = shape.concealed;
    let suit = (0..3).find(|&s| c[s * 9] > 0)?;
    let base = suit * 9;
    if c.iter().enumerate().any(|(k, &n)| n > 0 && !(base..base + 9).contains(&k)) {
        return None;
    }
    let need = |i: usize| if i == 0 || i == 8 { 3 } else { 1 };
    if (0..9).any(|i| c[base + i] < need(i)) {
        return None;
    }

    // 和了牌を抜いた形が 1112345678999 なら純正
    let win = shape.win_kind;
    if !(base..base + 9).contains(&win) {
        return None;
    }
    let pure = (0..9).all(|i| {
        let n = c[base + i] - u8::from(base + i == win);
        n == need(i)
    });
    Some(if pure { Yaku::JunseiChuuren } else { Yaku::Chuuren })
}

// =====================
// 七対子
// =====================

pub fn eval_seven_pairs(shape: &WinShape, ctx: &WinContext) -> YakuResult {
    let mut r = YakuResult::default();
    add_situational(&mut r, shape, ctx);
    r.add(Yaku::Chiitoitsu, shape.menzen);
    add_count_based(&mut r, shape);
    r.finish()
}

// =====================
// 国士無双
// =====================

/// 国士無双の形なら役を返す（13面待ちは和了牌を抜いて13種1枚ずつ）
pub fn eval_thirteen_orphans(shape: &WinShape, ctx: &WinContext) -> Option<YakuResult> {
    if shape.has_melds {
        return None;
    }
    let c = shape.concealed;
    let total: u32 = c.iter().map(|&n| n as u32).sum();
    if total != 14 || ORPHANS.iter().any(|&k| c[k] == 0) {
        return None;
    }
    if ORPHANS.iter().map(|&k| c[k] as u32).sum::<u32>() != 14 {
        return None;
    }

    let mut r = YakuResult::default();
    add_situational(&mut r, shape, ctx);
    let thirteen_wait = c[shape.win_kind] == 2;
    r.add(
        if thirteen_wait {
            Yaku::Kokushi13
        } else {
            Yaku::Kokushi
        },
        shape.menzen,
    );
    Some(r.finish())
}
