//! Cannon: slides to empty squares until the first occupancy (the
//! "screen"), then may capture the very next piece on the ray if and only
//! if it is enemy-colored; intervening empties after the screen are not
//! reachable as destinations (spec §4.2).

use crate::board::Board;
use crate::piece::Piece;

use super::{ORTHOGONAL_DIRS, orthogonal_ray};

pub fn targets(board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let mut out = Vec::new();
    for &dir in &ORTHOGONAL_DIRS {
        let ray = orthogonal_ray(board, (piece.file, piece.rank), dir);
        let mut past_screen = false;
        for (x, y, occupant) in ray {
            if !past_screen {
                match occupant {
                    None => out.push((x as u8, y as u8)),
                    Some(_) => past_screen = true,
                }
            } else if let Some(target) = occupant {
                // First piece beyond the screen: capturable iff enemy.
                // Non-enemy is filtered out by pseudo_legal_targets'
                // same-color rule, but we only ever consider this one
                // square regardless of its color — the ray ends here.
                let _ = target;
                out.push((x as u8, y as u8));
                break;
            }
            // else: empty square beyond the screen, not reachable.
        }
    }
    out
}
