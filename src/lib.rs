//! Xiangqi game-state controller: board/move representation, local rule
//! validation, an async bridge to an external UCI-like engine, and the
//! turn-by-turn game controller that ties them together (spec §1).

pub mod ai;
pub mod board;
pub mod check;
pub mod engine;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod mv;
pub mod output;
pub mod piece;
pub mod player;
pub mod validator;

pub use error::{Error, Result};
pub use game::GameController;
pub use player::Color;
