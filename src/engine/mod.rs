//! Engine bridge: an external UCI-like search engine treated as an opaque
//! service (spec §1, §4.6, §6.2).

pub mod process;
pub mod uci;

pub use process::EngineBridge;

use std::path::PathBuf;

/// Engine-bridge tunables (spec §4.6 "threading configuration" plus the
/// difficulty knobs §4.7 references). Every field has a documented
/// default; presentation code overrides what it needs before
/// `GameController::new`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the engine executable.
    pub engine_path: PathBuf,
    pub threads: usize,
    pub hash_mb: u32,
    pub skill_level: u32,
    pub depth: u32,
    pub move_time_ms: u32,
    /// Override for the bundled opening book asset (spec §6.3).
    pub opening_book_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2)
            .max(2)
            / 2;
        Self {
            engine_path: PathBuf::from("engine"),
            threads: threads.max(1),
            hash_mb: 128,
            skill_level: 10,
            depth: 12,
            move_time_ms: 1000,
            opening_book_path: None,
        }
    }
}

/// Engine bridge lifecycle state (spec §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Thinking,
    Error,
}

/// Result of `analyze` (spec §6.2).
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    pub best_move: Option<String>,
    pub ponder: Option<String>,
    pub score_cp: i32,
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub pv: Vec<String>,
}

/// Result of `is_move_legal` (spec §6.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalityReport {
    pub legal: bool,
    pub reason: Option<String>,
}
