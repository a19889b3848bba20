//! Board representation: a set of live pieces plus O(1) square lookup.
//!
//! Xiangqi's 9x10 board and its piece-identity requirements (spec §3: "no
//! two live pieces share (file, rank); all live ids are unique") fit a
//! mailbox-style piece list, not the teacher's bitboard `PlayerStorage` —
//! that representation is built for 64-square boards with no per-piece
//! identity. The general shape (a `Board` that owns pieces and answers
//! occupancy queries) is grounded on the teacher's `PlayerStorageSpec`
//! trait surface (`occupied`, `get_pieceset`, `map_reduce`); the concrete
//! storage is a `Vec<Piece>` plus a square index, in the style of the
//! piece-list board in `miklz-enrust`'s `game_state/board/piece_list.rs`.

use std::collections::HashMap;

use crate::piece::{Piece, PieceType};
use crate::player::Color;

pub const FILES: u8 = 9;
pub const RANKS: u8 = 10;

/// Inclusive river boundary: rank 4 is black's side, rank 5 is red's side.
pub const RIVER_BLACK_RANK: u8 = 4;
pub const RIVER_RED_RANK: u8 = 5;

#[inline]
pub fn in_bounds(file: i32, rank: i32) -> bool {
    (0..FILES as i32).contains(&file) && (0..RANKS as i32).contains(&rank)
}

#[inline]
pub fn in_palace(color: Color, file: u8, rank: u8) -> bool {
    let (lo, hi) = color.palace_ranks();
    (3..=5).contains(&file) && (lo..=hi).contains(&rank)
}

/// A set of live pieces. Square occupancy is O(1); piece lookup by id is
/// O(1). No two live pieces ever share a square (enforced by every mutator
/// in this module).
#[derive(Clone, Debug, Default)]
pub struct Board {
    pieces: HashMap<u32, Piece>,
    by_square: HashMap<(u8, u8), u32>,
    next_id: u32,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            pieces: HashMap::new(),
            by_square: HashMap::new(),
            next_id: 0,
        }
    }

    /// Places a brand-new piece, assigning it a fresh monotonic id.
    /// Panics (a bug in the caller, not a user-facing condition) if the
    /// square is already occupied.
    pub fn place_new(&mut self, piece_type: PieceType, color: Color, file: u8, rank: u8) -> u32 {
        assert!(
            self.at(file, rank).is_none(),
            "square ({file}, {rank}) already occupied"
        );
        let id = self.next_id;
        self.next_id += 1;
        self.insert_with_id(id, piece_type, color, file, rank);
        id
    }

    /// Places a piece reusing a specific id (used by the identity-
    /// preserving FEN reparse, spec §4.1). Advances `next_id` so future
    /// `place_new` calls never collide.
    pub fn insert_with_id(&mut self, id: u32, piece_type: PieceType, color: Color, file: u8, rank: u8) {
        let piece = Piece {
            piece_type,
            color,
            file,
            rank,
            id,
        };
        self.pieces.insert(id, piece);
        self.by_square.insert((file, rank), id);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    pub fn at(&self, file: u8, rank: u8) -> Option<&Piece> {
        self.by_square.get(&(file, rank)).and_then(|id| self.pieces.get(id))
    }

    pub fn get(&self, id: u32) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |p| p.color == color)
    }

    pub fn king_of(&self, color: Color) -> Option<&Piece> {
        self.pieces
            .values()
            .find(|p| p.color == color && p.piece_type == PieceType::King)
    }

    /// Removes the piece occupying `(file, rank)`, if any, returning it.
    pub fn remove_at(&mut self, file: u8, rank: u8) -> Option<Piece> {
        let id = self.by_square.remove(&(file, rank))?;
        self.pieces.remove(&id)
    }

    /// Relocates the piece with `id` to `(file, rank)`. The destination
    /// must already be vacated by the caller (capture removal happens
    /// first in the controller's move pipeline).
    pub fn relocate(&mut self, id: u32, file: u8, rank: u8) {
        if let Some(piece) = self.pieces.get_mut(&id) {
            self.by_square.remove(&(piece.file, piece.rank));
            piece.file = file;
            piece.rank = rank;
            self.by_square.insert((file, rank), id);
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn max_id(&self) -> Option<u32> {
        self.pieces.keys().copied().max()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
