//! Rook: orthogonal rays until the first occupancy, capturing it if enemy
//! (spec §4.2).

use crate::board::Board;
use crate::piece::Piece;

use super::{ORTHOGONAL_DIRS, orthogonal_ray};

pub fn targets(board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let mut out = Vec::new();
    for &dir in &ORTHOGONAL_DIRS {
        for (x, y, occupant) in orthogonal_ray(board, (piece.file, piece.rank), dir) {
            let hit = occupant.is_some();
            out.push((x as u8, y as u8));
            if hit {
                break;
            }
        }
    }
    out
}
