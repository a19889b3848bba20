//! Pawn: one step forward before crossing the river; forward or sideways
//! (never backward) after crossing (spec §4.2).

use crate::board::in_bounds;
use crate::board::Board;
use crate::piece::Piece;
use crate::player::Color;

fn forward_dir(color: Color) -> i32 {
    match color {
        Color::Red => -1,
        Color::Black => 1,
    }
}

fn has_crossed_river(color: Color, rank: u8) -> bool {
    match color {
        Color::Red => rank <= 4,
        Color::Black => rank >= 5,
    }
}

pub fn targets(_board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let (fx, fy) = (piece.file as i32, piece.rank as i32);
    let fwd = forward_dir(piece.color);
    let mut out = Vec::new();

    let forward = (fx, fy + fwd);
    if in_bounds(forward.0, forward.1) {
        out.push((forward.0 as u8, forward.1 as u8));
    }

    if has_crossed_river(piece.color, piece.rank) {
        for dx in [-1, 1] {
            let side = (fx + dx, fy);
            if in_bounds(side.0, side.1) {
                out.push((side.0 as u8, side.1 as u8));
            }
        }
    }

    out
}
