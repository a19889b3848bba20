//! Move validator: the local-rule authority (spec §4.3), used when the
//! engine bridge is unavailable. Re-derives the same geometric and
//! blocking checks as the move generator, but reports *why* a move is
//! illegal rather than simply omitting it from a target list, and adds
//! the cannon screen-count parity check spec §4.3 calls out explicitly.

use crate::board::{Board, in_bounds, in_palace};
use crate::error::{Error, RuleError};
use crate::movegen::pieces_between;
use crate::piece::{Piece, PieceType};
use crate::player::Color;

pub fn validate_move(board: &Board, piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    match piece.piece_type {
        PieceType::King => validate_king(piece, to),
        PieceType::Advisor => validate_advisor(piece, to),
        PieceType::Elephant => validate_elephant(board, piece, to),
        PieceType::Horse => validate_horse(board, piece, to),
        PieceType::Rook => validate_rook(board, piece, to),
        PieceType::Cannon => validate_cannon(board, piece, to),
        PieceType::Pawn => validate_pawn(piece, to),
    }
}

fn geometry(ok: bool) -> Result<(), Error> {
    if ok {
        Ok(())
    } else {
        Err(Error::Rule(RuleError::IllegalGeometry))
    }
}

fn validate_king(piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry(dx.abs() + dy.abs() == 1)?;
    if !in_palace(piece.color, to.0, to.1) {
        return Err(Error::Rule(RuleError::PalaceConfinement));
    }
    Ok(())
}

fn validate_advisor(piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry(dx.abs() == 1 && dy.abs() == 1)?;
    if !in_palace(piece.color, to.0, to.1) {
        return Err(Error::Rule(RuleError::PalaceConfinement));
    }
    Ok(())
}

fn stays_on_own_side(color: Color, rank: i32) -> bool {
    match color {
        Color::Red => rank >= 5,
        Color::Black => rank <= 4,
    }
}

fn validate_elephant(board: &Board, piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry(dx.abs() == 2 && dy.abs() == 2)?;
    if !stays_on_own_side(piece.color, to.1 as i32) {
        return Err(Error::Rule(RuleError::RiverCrossing));
    }
    let eye = (
        (piece.file as i32 + dx / 2) as u8,
        (piece.rank as i32 + dy / 2) as u8,
    );
    if board.at(eye.0, eye.1).is_some() {
        return Err(Error::Rule(RuleError::ElephantEyeBlocked));
    }
    Ok(())
}

fn validate_horse(board: &Board, piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry((dx.abs() == 1 && dy.abs() == 2) || (dx.abs() == 2 && dy.abs() == 1))?;
    let (lx, ly) = if dx.abs() == 2 { (dx / 2, 0) } else { (0, dy / 2) };
    let leg = (
        (piece.file as i32 + lx) as u8,
        (piece.rank as i32 + ly) as u8,
    );
    if board.at(leg.0, leg.1).is_some() {
        return Err(Error::Rule(RuleError::HorseLegBlocked));
    }
    Ok(())
}

fn validate_rook(board: &Board, piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry((dx == 0) != (dy == 0))?;
    if pieces_between(board, (piece.file, piece.rank), to) != 0 {
        return Err(Error::Rule(RuleError::PathBlocked));
    }
    Ok(())
}

fn validate_cannon(board: &Board, piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    geometry((dx == 0) != (dy == 0))?;
    let between = pieces_between(board, (piece.file, piece.rank), to);
    let capturing = board.at(to.0, to.1).is_some();
    let required = if capturing { 1 } else { 0 };
    if between != required {
        return Err(Error::Rule(RuleError::CannonScreenMismatch));
    }
    Ok(())
}

fn validate_pawn(piece: &Piece, to: (u8, u8)) -> Result<(), Error> {
    let (dx, dy) = delta(piece, to);
    let fwd = match piece.color {
        Color::Red => -1,
        Color::Black => 1,
    };
    let crossed = match piece.color {
        Color::Red => piece.rank <= 4,
        Color::Black => piece.rank >= 5,
    };
    let is_forward = dx == 0 && dy == fwd;
    let is_sideways = crossed && dy == 0 && dx.abs() == 1;
    geometry(is_forward || is_sideways)
}

fn delta(piece: &Piece, to: (u8, u8)) -> (i32, i32) {
    (
        to.0 as i32 - piece.file as i32,
        to.1 as i32 - piece.rank as i32,
    )
}

/// Coordinate sanity shared by the controller's move pipeline (spec §7
/// "Input" errors): bounds, non-identity, distance sanity.
pub fn validate_coordinates(from: (u8, u8), to: (u8, u8)) -> Result<(), Error> {
    if !in_bounds(from.0 as i32, from.1 as i32) || !in_bounds(to.0 as i32, to.1 as i32) {
        return Err(Error::Input(crate::error::InputError::OutOfBounds {
            file: to.0 as i32,
            rank: to.1 as i32,
        }));
    }
    if from == to {
        return Err(Error::Input(crate::error::InputError::SameSquare));
    }
    let dist = (to.0 as i32 - from.0 as i32).unsigned_abs() + (to.1 as i32 - from.1 as i32).unsigned_abs();
    if dist > 18 {
        return Err(Error::Input(crate::error::InputError::DistanceSanity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::{INITIAL_FEN, parse_into_board};

    #[test]
    fn king_cannot_leave_palace() {
        let (board, _, _, _) = parse_into_board(
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAK1BNR w - - 0 1"
                .replace("RNBAK1BNR", "RNBAKABNR")
                .as_str(),
            None,
        )
        .unwrap();
        let king = board.king_of(Color::Red).unwrap();
        assert_eq!((king.file, king.rank), (4, 9));
        // Red king at (3,9) cannot go to (2,9) - construct king at b0 instead.
        let king_at_b0 = Piece {
            piece_type: PieceType::King,
            color: Color::Red,
            file: 3,
            rank: 9,
            id: 0,
        };
        let err = validate_king(&king_at_b0, (2, 9)).unwrap_err();
        assert!(matches!(err, Error::Rule(RuleError::PalaceConfinement)));
    }

    #[test]
    fn elephant_cannot_cross_river() {
        let elephant = Piece {
            piece_type: PieceType::Elephant,
            color: Color::Red,
            file: 2,
            rank: 5,
            id: 0,
        };
        let board = Board::empty();
        let err = validate_elephant(&board, &elephant, (0, 3)).unwrap_err();
        assert!(matches!(err, Error::Rule(RuleError::RiverCrossing)));
    }

    #[test]
    fn horse_leg_blocks_both_targets() {
        let mut board = Board::empty();
        let horse_id = board.place_new(PieceType::Horse, Color::Red, 1, 7);
        board.place_new(PieceType::Pawn, Color::Red, 1, 6);
        let horse = *board.get(horse_id).unwrap();
        let err1 = validate_horse(&board, &horse, (2, 5)).unwrap_err();
        let err2 = validate_horse(&board, &horse, (0, 5)).unwrap_err();
        assert!(matches!(err1, Error::Rule(RuleError::HorseLegBlocked)));
        assert!(matches!(err2, Error::Rule(RuleError::HorseLegBlocked)));
    }

    #[test]
    fn cannon_capture_requires_exactly_one_screen() {
        let mut board = Board::empty();
        let cannon_id = board.place_new(PieceType::Cannon, Color::Red, 4, 7);
        board.place_new(PieceType::King, Color::Black, 4, 0);
        let cannon = *board.get(cannon_id).unwrap();

        // Zero screens: illegal capture.
        let err = validate_cannon(&board, &cannon, (4, 0)).unwrap_err();
        assert!(matches!(err, Error::Rule(RuleError::CannonScreenMismatch)));

        // One screen: legal capture.
        board.place_new(PieceType::Pawn, Color::Red, 4, 2);
        assert!(validate_cannon(&board, &cannon, (4, 0)).is_ok());

        // Two screens: illegal again.
        board.place_new(PieceType::Pawn, Color::Black, 4, 4);
        let err = validate_cannon(&board, &cannon, (4, 0)).unwrap_err();
        assert!(matches!(err, Error::Rule(RuleError::CannonScreenMismatch)));
    }

    #[test]
    fn rook_requires_zero_intervening_pieces() {
        let mut board = Board::empty();
        let rook_id = board.place_new(PieceType::Rook, Color::Red, 0, 9);
        board.place_new(PieceType::Pawn, Color::Red, 0, 5);
        let rook = *board.get(rook_id).unwrap();
        let err = validate_rook(&board, &rook, (0, 0)).unwrap_err();
        assert!(matches!(err, Error::Rule(RuleError::PathBlocked)));
    }

    #[test]
    fn scenario_a_opening_cannon_move_is_legal() {
        let (board, _, _, _) = parse_into_board(INITIAL_FEN, None).unwrap();
        let cannon = board.at(1, 7).unwrap();
        assert!(validate_move(&board, cannon, (4, 7)).is_ok());
    }
}
