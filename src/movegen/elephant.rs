//! Elephant: four 2-step diagonal "field" moves; never crosses the river;
//! blocked if the midpoint ("elephant eye") is occupied (spec §4.2).

use crate::board::{Board, in_bounds};
use crate::piece::Piece;
use crate::player::Color;

const FIELD_DIRS: [(i32, i32); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];

fn stays_on_own_side(color: Color, rank: i32) -> bool {
    match color {
        Color::Red => rank >= 5,
        Color::Black => rank <= 4,
    }
}

pub fn targets(board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let (fx, fy) = (piece.file as i32, piece.rank as i32);
    FIELD_DIRS
        .iter()
        .filter_map(|&(dx, dy)| {
            let (x, y) = (fx + dx, fy + dy);
            if !in_bounds(x, y) || !stays_on_own_side(piece.color, y) {
                return None;
            }
            let eye = (fx + dx / 2, fy + dy / 2);
            if board.at(eye.0 as u8, eye.1 as u8).is_some() {
                return None;
            }
            Some((x as u8, y as u8))
        })
        .collect()
}
