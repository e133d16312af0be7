use mahjong_ev_core::required::RequiredTile;
use mahjong_ev_core::wall::remaining;
use mahjong_ev_core::{analyze, AnalysisOutcome, AnalysisRequest, AnalysisResult, Tile};
use serde_json::{json, Value};

fn run(value: Value) -> AnalysisResult {
    let req: AnalysisRequest = serde_json::from_value(value).unwrap();
    let res = analyze(&req);
    assert!(res.success, "{:?}", res.message);
    res.result.unwrap()
}

fn tenpai_hand() -> Vec<u8> {
    // 222m 567m 34p 33s 678s
    vec![1, 1, 1, 4, 5, 6, 11, 12, 20, 20, 23, 24, 25]
}

#[test]
fn discarding_north_leaves_tenpai_on_two_five_pin() {
    let mut hand = tenpai_hand();
    hand.push(30);
    let result = run(json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 1,
        "hand": hand,
    }));
    assert_eq!(result.shanten.overall, 0);

    let AnalysisOutcome::Discard { candidates } = result.outcome else {
        panic!("expected discard candidates");
    };
    let north = &candidates[0];
    assert_eq!(north.tile, Tile::NORTH);
    assert_eq!(north.shanten, 0);
    assert_eq!(
        north.required_tiles,
        vec![
            RequiredTile {
                tile: Tile::P2,
                count: 4
            },
            RequiredTile {
                tile: Tile::P5,
                count: 4
            },
        ]
    );
    assert_eq!(north.rows.len(), 17);
}

#[test]
fn thirteen_tiles_report_required_tiles_and_rows() {
    let result = run(json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 9,
        "hand": tenpai_hand(),
        "options": 32,
        "dora_indicators": [10],
    }));
    let AnalysisOutcome::Draw {
        required_tiles,
        rows,
    } = result.outcome
    else {
        panic!("expected a draw forecast");
    };
    let tiles: Vec<Tile> = required_tiles.iter().map(|r| r.tile).collect();
    assert_eq!(tiles, vec![Tile::P2, Tile::P5]);
    // 2p が表示牌なので残りは3枚
    assert_eq!(required_tiles[0].count, 3);
    assert!(rows.iter().all(|r| r.tenpai_prob == 1.0));
    assert!(rows[8].win_prob > 0.0 && rows[8].exp_value > 0.0);
}

#[test]
fn supplied_wall_overrides_the_computed_one() {
    let hand: Vec<Tile> = tenpai_hand()
        .into_iter()
        .map(|id| Tile::new(id).unwrap())
        .collect();
    let mut wall = remaining(&hand, &[], &[]).unwrap();
    // 2p はすべて他家から見えている
    wall[Tile::P2.kind()] = 0;

    let result = run(json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 17,
        "hand": tenpai_hand(),
        "wall": wall.to_vec(),
    }));
    let AnalysisOutcome::Draw {
        required_tiles,
        rows,
    } = result.outcome
    else {
        panic!("expected a draw forecast");
    };
    assert_eq!(
        required_tiles,
        vec![RequiredTile {
            tile: Tile::P5,
            count: 4
        }]
    );
    // 最後の1回で 5p の4枚を引く（残り 119 - 16 枚）
    let last = rows[16].win_prob;
    assert!((last - 4.0 / 103.0).abs() < 1e-9, "{}", last);
}

#[test]
fn meld_codes_are_decoded_in_requests() {
    // 234m 567m 345p 9s + 白ポン（符号）
    let req = json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 4,
        "shanten_types": 1,
        "hand": [1, 2, 3, 4, 5, 6, 11, 12, 13, 26],
        "melds": [{"code": 48682, "player": 1}],
    });
    let result = run(req.clone());
    assert_eq!(result.shanten.overall, 0);
    assert_eq!(result.shanten.seven_pairs, None);
    let AnalysisOutcome::Draw {
        required_tiles,
        rows,
    } = result.outcome
    else {
        panic!("expected a draw forecast");
    };
    assert_eq!(
        required_tiles,
        vec![RequiredTile {
            tile: Tile::S9,
            count: 3
        }]
    );
    // 役牌があるので鳴いていても和了できる
    assert!(rows[3].win_prob > 0.0);

    // 副露があると七対子・国士は指定できない
    let mut with_all_types = req;
    with_all_types["shanten_types"] = json!(7);
    let res = analyze(&serde_json::from_value(with_all_types).unwrap());
    assert!(!res.success);
    assert!(res.message.unwrap().starts_with("unsupported option"));
}

#[test]
fn complete_and_overfull_hands_are_rejected() {
    // 234m 567m 345p 345s 77s は和了形
    let complete = json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 1,
        "hand": [1, 2, 3, 4, 5, 6, 11, 12, 13, 20, 21, 22, 24, 24],
    });
    let res = analyze(&serde_json::from_value(complete).unwrap());
    assert!(!res.success);
    assert!(res.message.unwrap().contains("already complete"));

    let fifth_copy = json!({
        "round_wind": "E",
        "seat_wind": "S",
        "turn": 1,
        "hand": [0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        "dora_indicators": [0],
    });
    let res = analyze(&serde_json::from_value(fifth_copy).unwrap());
    assert!(!res.success);
    assert!(res.message.unwrap().starts_with("inconsistent tile counts"));
}

#[test]
fn response_json_shape() {
    let mut hand = tenpai_hand();
    hand.push(30);
    let req: AnalysisRequest = serde_json::from_value(json!({
        "round_wind": "S",
        "seat_wind": "E",
        "turn": 2,
        "hand": hand,
    }))
    .unwrap();
    let value = serde_json::to_value(analyze(&req)).unwrap();
    assert_eq!(value["success"], json!(true));
    let result = &value["result"];
    assert_eq!(result["kind"], json!("discard"));
    assert!(result["elapsed_us"].is_u64());
    let cand = &result["candidates"][0];
    assert_eq!(cand["tile"], json!(30));
    assert_eq!(cand["shanten_down"], json!(false));
    assert_eq!(cand["required_count"], json!(8));
    assert_eq!(cand["rows"][1]["turn"], json!(2));
}
