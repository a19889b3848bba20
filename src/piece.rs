//! Piece identity and type.
//!
//! Grounded on the teacher's `Piece` enum (`from_notation`, `COUNT`); the
//! bitboard-oriented `startingpos`/`starting_files` helpers are dropped
//! since they describe a western 8x8 back rank, not a 9x10 palace layout —
//! the FEN codec (`src/fen.rs`) is the sole source of starting positions
//! here (spec §6.1's initial FEN). What's kept is the notation<->type
//! mapping idiom and the `COUNT`-style enum surface.

use crate::player::Color;

/// One of the seven Xiangqi piece types (spec §3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceType {
    King,
    Advisor,
    Elephant,
    Horse,
    Rook,
    Cannon,
    Pawn,
}

impl PieceType {
    pub const COUNT: usize = 7;

    /// Maps a FEN letter (K,A,B,N,R,C,P; case gives color) to a
    /// `(Color, PieceType)` pair, per spec §4.1/§6.1.
    pub const fn from_notation(c: char) -> Option<(Color, PieceType)> {
        let piece = match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'a' => Some(PieceType::Advisor),
            'b' => Some(PieceType::Elephant),
            'n' => Some(PieceType::Horse),
            'r' => Some(PieceType::Rook),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Pawn),
            _ => None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        match piece {
            None => None,
            Some(p) => Some((color, p)),
        }
    }

    /// Inverse of [`PieceType::from_notation`]: the lowercase FEN letter
    /// for this type, to be cased by the caller according to color.
    pub const fn notation(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Advisor => 'a',
            PieceType::Elephant => 'b',
            PieceType::Horse => 'n',
            PieceType::Rook => 'r',
            PieceType::Cannon => 'c',
            PieceType::Pawn => 'p',
        }
    }
}

/// A live piece on the board (spec §3). `id` is stable across FEN
/// re-parses per the identity-preserving reparse algorithm in §4.1; it is
/// not part of piece equality for board-state comparisons, only for UI
/// keying, so `Piece` derives `PartialEq` on the full struct but callers
/// comparing *positions* should compare `(piece_type, color, file, rank)`
/// tuples instead (see [`Piece::placement`]).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub file: u8,
    pub rank: u8,
    pub id: u32,
}

impl Piece {
    /// The (type, color, file, rank) tuple used for reparse matching and
    /// round-trip comparisons (spec §4.1, §8).
    pub fn placement(&self) -> (PieceType, Color, u8, u8) {
        (self.piece_type, self.color, self.file, self.rank)
    }

    pub const fn fen_char(&self) -> char {
        let lower = self.piece_type.notation();
        match self.color {
            Color::Red => lower.to_ascii_uppercase(),
            Color::Black => lower,
        }
    }
}
