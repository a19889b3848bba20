//! Check detector (spec §4.4).
//!
//! Reuses [`crate::movegen::pseudo_legal_targets`] rather than re-deriving
//! per-piece attack patterns: a piece threatens the enemy king precisely
//! when the king's square is one of its pseudo-legal targets, since those
//! are already filtered to "different color than the mover". The one
//! pattern pseudo-legal generation doesn't cover is the flying-general
//! rule, which isn't a piece move at all.

use crate::board::Board;
use crate::error::{Error, TerminalError};
use crate::movegen::{self, pieces_between};
use crate::player::Color;

/// Whether `color`'s king is currently attacked.
pub fn is_in_check(board: &Board, color: Color) -> Result<bool, Error> {
    let king = board
        .king_of(color)
        .ok_or(Error::Terminal(TerminalError::KingMissing))?;

    for piece in board.pieces_of(color.other()) {
        let targets = movegen::pseudo_legal_targets(board, piece);
        if targets.contains(&(king.file, king.rank)) {
            return Ok(true);
        }
    }

    flying_general(board, color)
}

/// Two kings facing each other on an open file is itself an illegal
/// position; from the mover's perspective it means exposing this
/// condition is equivalent to moving into check (spec §4.4).
fn flying_general(board: &Board, color: Color) -> Result<bool, Error> {
    let king = board
        .king_of(color)
        .ok_or(Error::Terminal(TerminalError::KingMissing))?;
    let enemy_king = board
        .king_of(color.other())
        .ok_or(Error::Terminal(TerminalError::KingMissing))?;
    if king.file != enemy_king.file {
        return Ok(false);
    }
    Ok(pieces_between(
        board,
        (king.file, king.rank),
        (enemy_king.file, enemy_king.rank),
    ) == 0)
}

/// Simulates `from -> to` on a cloned board and reports whether the
/// resulting position leaves `mover`'s own king in check. Used by the
/// optional self-check-filtered target listing (spec §4.3 note, §9 open
/// question) and by the controller before committing a move when the
/// engine bridge is unavailable.
pub fn leaves_mover_in_check(
    board: &Board,
    mover: Color,
    from: (u8, u8),
    to: (u8, u8),
) -> Result<bool, Error> {
    let mut sim = board.clone();
    let id = sim.at(from.0, from.1).map(|p| p.id);
    let Some(id) = id else {
        return Ok(false);
    };
    sim.remove_at(to.0, to.1);
    sim.relocate(id, to.0, to.1);
    is_in_check(&sim, mover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_into_board;

    #[test]
    fn initial_position_has_no_check() {
        let (board, _, _, _) = parse_into_board(crate::fen::INITIAL_FEN, None).unwrap();
        assert!(!is_in_check(&board, Color::Red).unwrap());
        assert!(!is_in_check(&board, Color::Black).unwrap());
    }

    #[test]
    fn facing_kings_on_open_file_is_check() {
        let (board, _, _, _) =
            parse_into_board("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1", None).unwrap();
        assert!(is_in_check(&board, Color::Red).unwrap());
        assert!(is_in_check(&board, Color::Black).unwrap());
    }

    #[test]
    fn rook_delivers_check_along_open_file() {
        let (board, _, _, _) =
            parse_into_board("4k4/9/9/9/9/9/9/9/9/r3K4 w - - 0 1", None).unwrap();
        assert!(!is_in_check(&board, Color::Red).unwrap());
        let (board, _, _, _) =
            parse_into_board("4k4/9/9/9/9/9/9/9/4K4/r8 w - - 0 1", None).unwrap();
        assert!(is_in_check(&board, Color::Red).unwrap());
    }

    #[test]
    fn cannon_checks_only_with_exactly_one_screen() {
        let (board, _, _, _) =
            parse_into_board("4k4/9/9/9/4P4/9/9/9/9/4CK3 w - - 0 1", None).unwrap();
        assert!(is_in_check(&board, Color::Black).unwrap());
    }

    #[test]
    fn moving_into_check_is_detected_by_simulation() {
        let (board, _, _, _) =
            parse_into_board("4k4/9/9/9/9/9/9/9/9/r2K5 w - - 0 1", None).unwrap();
        // King steps onto the rook's file: illegal.
        assert!(leaves_mover_in_check(&board, Color::Red, (3, 9), (4, 9)).unwrap());
        // King steps away from the file: fine.
        assert!(!leaves_mover_in_check(&board, Color::Red, (3, 9), (3, 8)).unwrap());
    }
}
