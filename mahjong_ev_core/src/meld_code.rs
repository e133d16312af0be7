//! 牌譜（天鳳形式）の副露コードから副露ブロックを復元する。

use crate::error::{AnalysisError, Result};
use crate::meld::{build_meld, MeldBlock, MeldType};
use crate::tile::Tile;

/// 相対座席（0=自家, 1=下家, 2=対面, 3=上家）と手番の絶対座席から、絶対座席を引く表
pub static ABSOLUTE_SEAT: [[u8; 4]; 4] = [
    [0, 1, 2, 3], //
    [1, 2, 3, 0],
    [2, 3, 0, 1],
    [3, 0, 1, 2],
];

/// 136枚表現の牌番号を牌IDに変換する。各色の5の1枚目が赤。
pub fn tile_from_136(id: u32) -> Result<Tile> {
    match id {
        16 => Ok(Tile::RED_M5),
        52 => Ok(Tile::RED_P5),
        88 => Ok(Tile::RED_S5),
        0..=135 => Ok(Tile::from_kind((id / 4) as usize)),
        _ => Err(AnalysisError::InvalidMeldPattern(format!(
            "tile number {} is out of range",
            id
        ))),
    }
}

pub fn absolute_seat(player: u8, relative: u8) -> Result<u8> {
    if player > 3 || relative > 3 {
        return Err(AnalysisError::InvalidMeldPattern(format!(
            "seat out of range: player {}, relative {}",
            player, relative
        )));
    }
    Ok(ABSOLUTE_SEAT[player as usize][relative as usize])
}

/// 副露コードを復元する。`player` は鳴いたプレイヤーの絶対座席。
pub fn decode_meld(code: u32, player: u8) -> Result<MeldBlock> {
    if code > 0xFFFF {
        return Err(AnalysisError::InvalidMeldPattern(format!(
            "meld code {:#x} does not fit in 16 bits",
            code
        )));
    }
    let from = absolute_seat(player, (code & 3) as u8)?;

    if code & 0x4 != 0 {
        decode_chi(code, from)
    } else if code & 0x8 != 0 {
        decode_pon(code, from, false)
    } else if code & 0x10 != 0 {
        decode_pon(code, from, true)
    } else if code & 0x20 != 0 {
        Err(AnalysisError::UnsupportedOption(
            "north-dora extraction only exists in three-player games".into(),
        ))
    } else {
        decode_kan(code, from, from == player)
    }
}

// ===== チー =====
fn decode_chi(code: u32, from: u8) -> Result<MeldBlock> {
    let t = (code & 0xFC00) >> 10;
    let called = (t % 3) as usize;
    let base = t / 3;
    let base = (base / 7) * 9 + base % 7;

    let ids = [
        base * 4 + ((code >> 3) & 3),
        (base + 1) * 4 + ((code >> 5) & 3),
        (base + 2) * 4 + ((code >> 7) & 3),
    ];
    let tiles = ids
        .iter()
        .map(|&id| tile_from_136(id))
        .collect::<Result<Vec<_>>>()?;
    let discarded = tiles[called];

    Ok(build_meld(tiles, Some(MeldType::CHI))?.with_provenance(Some(discarded), Some(from)))
}

// ===== ポン / 加槓 =====
fn decode_pon(code: u32, from: u8, added: bool) -> Result<MeldBlock> {
    let t = (code & 0xFE00) >> 9;
    let called = (t % 3) as usize;
    let base = (t / 3) * 4;
    if base >= 136 {
        return Err(AnalysisError::InvalidMeldPattern(format!(
            "meld code {:#x} points past the last tile",
            code
        )));
    }
    // ポンで使われなかった1枚（加槓ではその1枚を加える）
    let unused = (code & 0x60) >> 5;

    let mut ids: Vec<u32> = (0..4).filter(|&i| i != unused).map(|i| base + i).collect();
    if added {
        ids.push(base + unused);
    }
    let tiles = ids
        .iter()
        .map(|&id| tile_from_136(id))
        .collect::<Result<Vec<_>>>()?;
    let discarded = tiles[called];
    let meld_type = if added { MeldType::KAKAN } else { MeldType::PON };

    Ok(build_meld(tiles, Some(meld_type))?.with_provenance(Some(discarded), Some(from)))
}

// ===== 暗槓 / 明槓 =====
fn decode_kan(code: u32, from: u8, closed: bool) -> Result<MeldBlock> {
    let called_id = (code & 0xFF00) >> 8;
    let base = called_id - called_id % 4;
    let tiles = (base..base + 4)
        .map(tile_from_136)
        .collect::<Result<Vec<_>>>()?;

    if closed {
        Ok(build_meld(tiles, Some(MeldType::ANKAN))?)
    } else {
        let discarded = tile_from_136(called_id)?;
        Ok(build_meld(tiles, Some(MeldType::MINKAN))?.with_provenance(Some(discarded), Some(from)))
    }
}
