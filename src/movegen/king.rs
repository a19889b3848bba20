//! King: four orthogonal steps, confined to the palace (spec §4.2).

use crate::board::{Board, in_bounds, in_palace};
use crate::piece::Piece;

use super::ORTHOGONAL_DIRS;

pub fn targets(_board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let (fx, fy) = (piece.file as i32, piece.rank as i32);
    ORTHOGONAL_DIRS
        .iter()
        .filter_map(|&(dx, dy)| {
            let (x, y) = (fx + dx, fy + dy);
            if in_bounds(x, y) && in_palace(piece.color, x as u8, y as u8) {
                Some((x as u8, y as u8))
            } else {
                None
            }
        })
        .collect()
}
