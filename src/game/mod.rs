//! Game-state types shared between the controller and its history
//! (spec §3, §4.5).

pub mod controller;
pub mod history;

pub use controller::GameController;

use crate::piece::{Piece, PieceType};
use crate::player::Color;

/// The sole notification value the controller currently emits
/// (spec §4.5 "Notification channel").
pub const NOTIFICATION_CHECK: &str = "check";

/// `GameState.status` (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Checkmate,
    Stalemate,
    Draw,
}

/// Handle returned by `GameController::subscribe`, used to
/// `unsubscribe` later (spec §9 "Listener model").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A read-only snapshot of one piece, the shape spec §6.4's "snapshot of
/// pieces" names explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub piece_type: PieceType,
    pub color: Color,
    pub file: u8,
    pub rank: u8,
    pub id: u32,
}

impl From<&Piece> for PieceSnapshot {
    fn from(p: &Piece) -> Self {
        Self {
            piece_type: p.piece_type,
            color: p.color,
            file: p.file,
            rank: p.rank,
            id: p.id,
        }
    }
}

/// Turn-timing accumulators (spec §3, §4.5 "Turn-timing").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub red_total_millis: u64,
    pub black_total_millis: u64,
}
