//! Per-piece pseudo-legal target enumeration (spec §4.2).
//!
//! No self-check filtering happens here — this is the "basic rules only"
//! generator used for UI hinting and the engine-failure fallback path; the
//! engine is the sole full-legality arbiter (spec §9). Module split mirrors
//! the teacher's one-file-per-concern layout (`position/movegen/*.rs`),
//! adapted from ray/leg bitboard scans to plain coordinate arithmetic since
//! Xiangqi's palace/river/eye/leg rules are naturally expressed that way.

mod advisor;
mod cannon;
mod elephant;
mod horse;
mod king;
mod pawn;
mod rook;

use crate::board::{Board, in_bounds};
use crate::piece::{Piece, PieceType};

/// Pseudo-legal destination squares for `piece`, with same-color
/// occupancy already filtered out (spec §4.2 "Target filter").
pub fn pseudo_legal_targets(board: &Board, piece: &Piece) -> Vec<(u8, u8)> {
    let raw = match piece.piece_type {
        PieceType::King => king::targets(board, piece),
        PieceType::Advisor => advisor::targets(board, piece),
        PieceType::Elephant => elephant::targets(board, piece),
        PieceType::Horse => horse::targets(board, piece),
        PieceType::Rook => rook::targets(board, piece),
        PieceType::Cannon => cannon::targets(board, piece),
        PieceType::Pawn => pawn::targets(board, piece),
    };
    raw.into_iter()
        .filter(|&(f, r)| match board.at(f, r) {
            Some(occupant) => occupant.color != piece.color,
            None => true,
        })
        .collect()
}

/// Counts pieces strictly between `from` and `to` along a straight
/// orthogonal line (used by rook/cannon generation and by the validator's
/// cannon screen-count check, spec §4.3). Returns 0 for non-orthogonal or
/// identical squares.
pub(crate) fn pieces_between(board: &Board, from: (u8, u8), to: (u8, u8)) -> usize {
    let (fx, fy) = (from.0 as i32, from.1 as i32);
    let (tx, ty) = (to.0 as i32, to.1 as i32);
    if fx != tx && fy != ty {
        return 0;
    }
    if fx == tx && fy == ty {
        return 0;
    }
    let (dx, dy) = ((tx - fx).signum(), (ty - fy).signum());
    let mut count = 0;
    let (mut x, mut y) = (fx + dx, fy + dy);
    while (x, y) != (tx, ty) {
        if board.at(x as u8, y as u8).is_some() {
            count += 1;
        }
        x += dx;
        y += dy;
    }
    count
}

/// Orthogonal ray scan to the edge of the board, shared by rook and cannon
/// generation. Unlike a rook's reach, this does not stop at the first
/// occupied square — the cannon needs visibility past its screen, so each
/// generator decides for itself where to stop consuming the ray.
pub(crate) fn orthogonal_ray(
    board: &Board,
    from: (u8, u8),
    dir: (i32, i32),
) -> Vec<(i32, i32, Option<Piece>)> {
    let mut squares = Vec::new();
    let (mut x, mut y) = (from.0 as i32 + dir.0, from.1 as i32 + dir.1);
    while in_bounds(x, y) {
        squares.push((x, y, board.at(x as u8, y as u8).copied()));
        x += dir.0;
        y += dir.1;
    }
    squares
}

pub(crate) const ORTHOGONAL_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::{INITIAL_FEN, parse_into_board};

    #[test]
    fn opening_cannon_has_expected_targets() {
        let (board, _, _, _) = parse_into_board(INITIAL_FEN, None).unwrap();
        let cannon = board.at(1, 7).unwrap();
        let targets = pseudo_legal_targets(&board, cannon);
        // Cannon at b2 can slide the length of its empty file and rank,
        // per the opening position, but cannot capture anything yet since
        // no screen is set up.
        assert!(targets.contains(&(4, 7))); // b2e2, scenario A
        assert!(targets.contains(&(1, 1))); // up the open b-file, short of the horse
        assert!(!targets.contains(&(1, 0))); // the black horse itself: no screen yet
        assert!(!targets.contains(&(1, 9))); // own horse's square, filtered as same-color
    }
}
