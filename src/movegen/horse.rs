//! Horse: eight "day"-pattern targets; blocked if the orthogonal square
//! adjacent to the horse in the direction of its first step (the "horse
//! leg") is occupied (spec §4.2).

use crate::board::{Board, in_bounds};
use crate::piece::Piece;

const JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn leg_offset(dx: i32, dy: i32) -> (i32, i32) {
    if dx.abs() == 2 {
        (dx / 2, 0)
    } else {
        (0, dy / 2)
    }
}

pub fn targets(board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let (fx, fy) = (piece.file as i32, piece.rank as i32);
    JUMPS
        .iter()
        .filter_map(|&(dx, dy)| {
            let (x, y) = (fx + dx, fy + dy);
            if !in_bounds(x, y) {
                return None;
            }
            let (lx, ly) = leg_offset(dx, dy);
            let leg = (fx + lx, fy + ly);
            if board.at(leg.0 as u8, leg.1 as u8).is_some() {
                return None;
            }
            Some((x as u8, y as u8))
        })
        .collect()
}
