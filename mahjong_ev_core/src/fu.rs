use crate::decompose::{Block, HandPattern, Mentsu};
use crate::tile::Tile;
use crate::{WinType, Wind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitType {
    Ryanmen, // 両面
    Kanchan, // 嵌張
    Penchan, // 辺張
    Tanki,   // 単騎
    Shanpon, // 双碰
}

/// 和了牌がどの面子（雀頭）を完成させたかの解釈
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitInfo {
    pub wait_type: WaitType,
    /// シャンポン待ちのロンで完成した刻子（明刻扱い）
    pub ron_completed_triplet: Option<usize>,
}

/// 和了牌の取り方をすべて列挙する。面子の組み方によって待ちが変わるため、
/// 呼び出し側で高い方を選ぶ。
pub fn wait_candidates(pattern: &HandPattern, win_kind: usize, win_type: WinType) -> Vec<WaitInfo> {
    let mut out = vec![];
    let mut push = |wi: WaitInfo| {
        if !out.contains(&wi) {
            out.push(wi);
        }
    };

    // 和了牌が雀頭なら単騎
    if pattern.pair == win_kind {
        push(WaitInfo {
            wait_type: WaitType::Tanki,
            ron_completed_triplet: None,
        });
    }

    // 副露した面子に和了牌は入らない
    for m in pattern.mentsu.iter().filter(|m| !m.called) {
        match m.block {
            Block::Shuntsu(s) if m.block.contains(win_kind) => {
                let pos = s % 9;
                let wait_type = if win_kind == s + 1 {
                    WaitType::Kanchan
                } else if (win_kind == s + 2 && pos == 0) || (win_kind == s && pos == 6) {
                    // 12 の3待ち / 89 の7待ち
                    WaitType::Penchan
                } else {
                    WaitType::Ryanmen
                };
                push(WaitInfo {
                    wait_type,
                    ron_completed_triplet: None,
                });
            }
            Block::Koutsu(k) if k == win_kind => {
                // シャンポン待ちでロンなら、この刻子は明刻扱いにする
                push(WaitInfo {
                    wait_type: WaitType::Shanpon,
                    ron_completed_triplet: (win_type == WinType::RON).then_some(k),
                });
            }
            _ => {}
        }
    }

    out
}

/// 平和の形（門前・全順子・役牌でない雀頭・両面待ち）か
pub fn is_pinfu_shape(pattern: &HandPattern, wait: WaitInfo, round_wind: Wind, seat_wind: Wind) -> bool {
    pattern
        .mentsu
        .iter()
        .all(|m| !m.open && matches!(m.block, Block::Shuntsu(_)))
        && pair_fu(pattern.pair, round_wind, seat_wind) == 0
        && wait.wait_type == WaitType::Ryanmen
}

pub fn calc_fu(
    pattern: &HandPattern,
    wait: WaitInfo,
    win_type: WinType,
    menzen: bool,
    round_wind: Wind,
    seat_wind: Wind,
) -> u32 {
    let pinfu = menzen && is_pinfu_shape(pattern, wait, round_wind, seat_wind);

    // 平和ツモは 20符固定
    if pinfu && win_type == WinType::TSUMO {
        return 20;
    }

    // ---- 基本符 ----
    let mut fu: u32 = 20;

    // ツモ 2符
    if win_type == WinType::TSUMO {
        fu += 2;
    }

    // 門前ロン 10符
    if win_type == WinType::RON && menzen {
        fu += 10;
    }

    // 雀頭 2符（場風/自風/三元、連風牌は 4符）
    fu += pair_fu(pattern.pair, round_wind, seat_wind);

    // 面子符
    for m in &pattern.mentsu {
        fu += mentsu_fu(m, wait.ron_completed_triplet);
    }

    // 待ち符（嵌張・辺張・単騎 = +2）
    if matches!(
        wait.wait_type,
        WaitType::Kanchan | WaitType::Penchan | WaitType::Tanki
    ) {
        fu += 2;
    }

    // 鳴き平和形のロンなど、20符のままなら 30符にする
    if fu == 20 {
        fu = 30;
    }

    round_up_10(fu)
}

fn round_up_10(x: u32) -> u32 {
    x.div_ceil(10) * 10
}

fn pair_fu(pair: usize, round_wind: Wind, seat_wind: Wind) -> u32 {
    let t = Tile::from_kind(pair);
    let mut fu = 0;

    // 三元牌
    if t.is_dragon() {
        fu += 2;
    }
    if t == round_wind.tile() {
        fu += 2;
    }
    if t == seat_wind.tile() {
        fu += 2;
    }

    fu
}

fn mentsu_fu(m: &Mentsu, ron_completed_triplet: Option<usize>) -> u32 {
    let yaochu = Tile::from_kind(m.block.kind()).is_terminal_or_honor();
    let base = match m.block {
        Block::Shuntsu(_) => return 0,
        Block::Koutsu(k) => {
            // 鳴いたポン、またはシャンポンロンで完成した刻子は明刻
            let open = m.open || (!m.called && ron_completed_triplet == Some(k));
            if open {
                2
            } else {
                4
            }
        }
        Block::Kantsu(_) => {
            if m.open {
                8
            } else {
                16
            }
        }
    };
    if yaochu {
        base * 2
    } else {
        base
    }
}
