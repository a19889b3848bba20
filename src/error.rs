//! Error kinds for the controller, validator and engine bridge.
//!
//! Mirrors the five error families from the error-handling design: input,
//! rule, engine, protocol and terminal. Input and rule failures are always
//! local (no board mutation); engine failures degrade to the local
//! validator rather than surfacing; protocol's "busy" sentinel is modeled
//! separately (see [`crate::ai::HintOutcome`]) since it is an expected
//! outcome, not a failure.

use thiserror::Error;

/// Coordinate or ownership problems detected before any rule is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("square ({file}, {rank}) is outside the board")]
    OutOfBounds { file: i32, rank: i32 },
    #[error("no piece at origin ({file}, {rank})")]
    EmptyOrigin { file: u8, rank: u8 },
    #[error("piece at ({file}, {rank}) does not belong to the side to move")]
    WrongColor { file: u8, rank: u8 },
    #[error("destination is occupied by a piece of the same color")]
    SelfCapture,
    #[error("origin and destination are the same square")]
    SameSquare,
    #[error("move distance exceeds the maximum possible on a 9x10 board")]
    DistanceSanity,
    #[error("malformed FEN string: {0}")]
    MalformedFen(String),
    #[error("malformed UCI move string: {0}")]
    MalformedUci(String),
    #[error("nothing to undo: history is already at its initial entry")]
    NothingToUndo,
}

/// Per-piece geometry and blocking failures, the local-rule authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("piece cannot move in that geometric pattern")]
    IllegalGeometry,
    #[error("path is blocked by an intervening piece")]
    PathBlocked,
    #[error("king or advisor may not leave the palace")]
    PalaceConfinement,
    #[error("elephant may not cross the river")]
    RiverCrossing,
    #[error("elephant eye is blocked")]
    ElephantEyeBlocked,
    #[error("horse leg is blocked")]
    HorseLegBlocked,
    #[error("cannon must jump exactly one screen to capture")]
    CannonScreenMismatch,
    #[error("move would leave the mover's own king in check")]
    SelfCheck,
    #[error("engine rejected the move: {0}")]
    EngineRejected(String),
}

/// Engine-bridge transport/communication failures. These degrade to the
/// local validator rather than rejecting the move outright.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("engine process is unreachable: {0}")]
    Unreachable(String),
    #[error("engine did not reply within the configured time budget")]
    Timeout,
    #[error("engine reply could not be parsed: {0}")]
    MalformedReply(String),
    #[error("engine ruling contradicts the local rule layer")]
    Contradiction,
}

/// UCI protocol-level conditions that are not, by themselves, move
/// rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("bestmove reply was missing or \"(none)\"")]
    NoMove,
    #[error("engine is already processing a bestmove request")]
    Busy,
}

/// Terminal-state conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TerminalError {
    #[error("a king is missing from the board")]
    KingMissing,
}

/// Top-level error type returned by fallible controller and bridge
/// operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

pub type Result<T> = std::result::Result<T, Error>;
