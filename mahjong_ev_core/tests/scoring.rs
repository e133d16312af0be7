use mahjong_ev_core::{score, ScoreRequest, ScoreResponse, ScoreResult, Yaku};
use serde_json::{json, Value};

fn run(value: Value) -> ScoreResponse {
    let req: ScoreRequest = serde_json::from_value(value).unwrap();
    score(&req)
}

fn win(value: Value) -> ScoreResult {
    let res = run(value);
    assert!(res.success, "{:?}", res.message);
    res.result.unwrap()
}

fn has(result: &ScoreResult, yaku: Yaku) -> bool {
    result.yaku.iter().any(|e| e.yaku == yaku)
}

#[test]
fn all_green() {
    // 223344s 666s 888s 發發、發ツモ
    let r = win(json!({
        "round_wind": "E",
        "seat_wind": "S",
        "win_type": "TSUMO",
        "hand_tiles": [19, 19, 20, 20, 21, 21, 23, 23, 23, 25, 25, 25, 32, 32],
        "win_tile": 32,
    }));
    assert!(has(&r, Yaku::Ryuuiisou));
    assert_eq!(r.yakuman, 1);
    assert_eq!(r.han, 0);
    assert_eq!(r.points.total_points, 32000);
    assert_eq!(r.deltas, [-16000, 32000, -8000, -8000]);
}

#[test]
fn four_concealed_triplets_depend_on_the_wait() {
    // 111m 333p 555s 777s 99p
    let hand = json!([0, 0, 0, 11, 11, 11, 22, 22, 22, 24, 24, 24, 17, 17]);

    // 単騎で完成
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 17,
    }));
    assert!(has(&r, Yaku::SuuankouTanki));
    assert_eq!(r.yakuman, 2);
    assert_eq!(r.points.total_points, 64000);

    // シャンポン待ちのツモ
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 24,
    }));
    assert!(has(&r, Yaku::Suuankou));
    assert!(!has(&r, Yaku::SuuankouTanki));
    assert_eq!(r.yakuman, 1);

    // シャンポン待ちのロンは明刻扱い
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "RON", "discarder": "W",
        "hand_tiles": hand.clone(), "win_tile": 24,
    }));
    assert_eq!(r.yakuman, 0);
    assert!(has(&r, Yaku::Sanankou));
    assert!(has(&r, Yaku::Toitoi));
}

#[test]
fn terminal_and_honor_families_stay_apart() {
    // 111m 999p 西西西 北北 + 白ポン（牌譜の符号）
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [0, 0, 0, 17, 17, 17, 29, 29, 29, 30, 30],
        "win_tile": 30,
        "melds": [{"code": 48682, "player": 1}],
    }));
    assert!(has(&r, Yaku::Honroutou));
    assert!(!has(&r, Yaku::Chinroutou));
    assert!(!has(&r, Yaku::Tsuuiisou));
    assert_eq!(r.yakuman, 0);

    // 老頭牌だけなら清老頭
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [0, 0, 0, 17, 17, 17, 26, 26, 26, 8, 8],
        "win_tile": 8,
        "melds": [{"tiles": [18, 18, 18]}],
    }));
    assert!(has(&r, Yaku::Chinroutou));
    assert!(!has(&r, Yaku::Honroutou));
    assert_eq!(r.yakuman, 1);

    // 字牌だけなら字一色
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [27, 27, 27, 28, 28, 28, 33, 33, 33, 31, 31],
        "win_tile": 31,
        "melds": [{"tiles": [32, 32, 32], "type": "PON"}],
    }));
    assert!(has(&r, Yaku::Tsuuiisou));
    assert!(!has(&r, Yaku::Honroutou));
    assert_eq!(r.yakuman, 1);
}

#[test]
fn thirteen_orphans_and_thirteen_wait() {
    // 1m9m1p9p1s9s 東南西北白發中 + 1m
    let hand = json!([0, 0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33]);

    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 33,
    }));
    assert!(has(&r, Yaku::Kokushi));
    assert_eq!(r.yakuman, 1);

    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 0,
    }));
    assert!(has(&r, Yaku::Kokushi13));
    assert_eq!(r.yakuman, 2);
    assert_eq!(r.points.total_points, 64000);
}

#[test]
fn dora_and_red_fives_are_counted() {
    // 234m 5(赤)67m 345p 345s 77s、7s ツモ。ドラ表示 6s → 7s
    let r = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [1, 2, 3, 34, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
        "win_tile": 24,
        "dora_indicators": [23],
        "flags": {"riichi": "RIICHI"},
        "ura_indicators": [30],
    }));
    assert_eq!(r.dora_han, 2);
    assert_eq!(r.aka_dora_han, 1);
    assert_eq!(r.ura_dora_han, 0);
    assert!(has(&r, Yaku::Dora));
    assert!(has(&r, Yaku::Akadora));
    assert!(!has(&r, Yaku::Uradora));
}

#[test]
fn malformed_requests_fail_with_message() {
    let cases = [
        // 役なし
        json!({
            "round_wind": "E", "seat_wind": "S", "win_type": "RON", "discarder": "W",
            "hand_tiles": [9, 10, 11, 13, 14, 15, 23, 24, 25, 26, 26],
            "win_tile": 26,
            "melds": [{"tiles": [1, 2, 3]}],
        }),
        // 和了形でない
        json!({
            "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
            "hand_tiles": [0, 1, 3, 4, 6, 9, 11, 13, 18, 20, 22, 27, 29, 31],
            "win_tile": 0,
        }),
        // 一発は立直が必要
        json!({
            "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
            "win_tile": 24,
            "flags": {"ippatsu": true},
        }),
        // 面子にならない副露
        json!({
            "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 24, 24],
            "win_tile": 24,
            "melds": [{"tiles": [20, 22, 27]}],
        }),
    ];
    for case in cases {
        let res = run(case.clone());
        assert!(!res.success, "{}", case);
        assert!(res.result.is_none());
        let value = serde_json::to_value(&res).unwrap();
        assert!(value["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

fn rejected(value: Value) -> String {
    let res = run(value);
    assert!(!res.success);
    assert!(res.result.is_none());
    res.message.unwrap()
}

#[test]
fn red_five_in_hand_and_meld_is_rejected() {
    // 4m 赤5m 6m 234p 99p + 4m赤5m6m チー + 白ポン
    let msg = rejected(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [3, 34, 5, 10, 11, 12, 17, 17],
        "win_tile": 17,
        "melds": [{"tiles": [3, 34, 5]}, {"tiles": [31, 31, 31]}],
    }));
    assert!(msg.starts_with("inconsistent tile counts"), "{}", msg);
}

#[test]
fn indicators_count_toward_four_copies() {
    // 1111m 23m 234p 白白白 99p
    let hand = json!([0, 0, 0, 0, 1, 2, 10, 11, 12, 31, 31, 31, 17, 17]);

    let ok = win(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 17,
    }));
    assert!(has(&ok, Yaku::YakuhaiWhite));

    let msg = rejected(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 17,
        "dora_indicators": [0],
    }));
    assert!(msg.starts_with("inconsistent tile counts"), "{}", msg);

    let msg = rejected(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": hand.clone(), "win_tile": 17,
        "ura_indicators": [0],
    }));
    assert!(msg.starts_with("inconsistent tile counts"), "{}", msg);
}

#[test]
fn at_most_four_indicators() {
    let msg = rejected(json!({
        "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
        "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
        "win_tile": 24,
        "dora_indicators": [27, 28, 29, 30, 33],
    }));
    assert!(msg.contains("indicators"), "{}", msg);
}

#[test]
fn sticks_are_bounded() {
    let tanyao = |honba: u64, kyotaku: u64| {
        json!({
            "round_wind": "E", "seat_wind": "S", "win_type": "TSUMO",
            "hand_tiles": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
            "win_tile": 24,
            "honba": honba,
            "kyotaku": kyotaku,
        })
    };

    let msg = rejected(tanyao(4_000_000_000, 0));
    assert!(msg.starts_with("unsupported option"), "{}", msg);
    let msg = rejected(tanyao(0, 1001));
    assert!(msg.starts_with("unsupported option"), "{}", msg);

    // 上限ちょうどは計算できる
    let r = win(tanyao(1000, 1000));
    assert_eq!(r.deltas.iter().sum::<i32>(), 1000 * 1000);
}
