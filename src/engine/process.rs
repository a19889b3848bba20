//! The engine bridge's process transport (spec §4.6 "AMBIENT Transport",
//! §5 concurrency model).
//!
//! The engine is reached as a child process speaking line-oriented text
//! over stdin/stdout, spawned with `tokio::process::Command` rather than
//! `std::process::Command` so every request is a suspension point the
//! control thread yields at, matching spec §5's "the bridge exposes
//! suspendable operations that yield the control thread until reply".
//! Cancellation is a `futures::channel::oneshot` raced against the pending
//! reply with `tokio::select!`, the same `sigstop`-receiver-vs-search
//! pattern the teacher's `search/basic_minimax.rs` uses to abort an
//! in-progress local search — here it aborts a pending `bestmove` wait
//! instead, with the identical cancellation primitive.

use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::channel::oneshot;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Mutex;

use super::uci::{self, EngineLine};
use super::{Analysis, Config, EngineState, LegalityReport};
use crate::error::{EngineError, Error};

/// A live connection to an external engine process, plus the state spec
/// §4.6 says the bridge owns: lifecycle, configuration, and the
/// one-outstanding-`best_move` guard.
pub struct EngineBridge {
    config: Mutex<Config>,
    state: Mutex<EngineState>,
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    lines: Mutex<Option<tokio::sync::mpsc::UnboundedReceiver<String>>>,
    thinking: AtomicBool,
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    identity: Mutex<String>,
}

struct ThinkingGuard<'a>(&'a AtomicBool);

impl Drop for ThinkingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl EngineBridge {
    pub fn new(config: Config) -> Self {
        Self {
            config: Mutex::new(config),
            state: Mutex::new(EngineState::Uninitialized),
            child: Mutex::new(None),
            stdin: Mutex::new(None),
            lines: Mutex::new(None),
            thinking: AtomicBool::new(false),
            stop_tx: Mutex::new(None),
            identity: Mutex::new(String::new()),
        }
    }

    pub async fn state(&self) -> EngineState {
        *self.state.lock().await
    }

    pub async fn info(&self) -> String {
        self.identity.lock().await.clone()
    }

    /// Spawns the engine process and performs the `uci`/`uciok` handshake.
    /// Idempotent: a second call while already `Ready` or `Thinking` is a
    /// no-op (spec §6.2 "initialize() - idempotent").
    pub async fn initialize(&self) -> Result<(), Error> {
        {
            let state = self.state.lock().await;
            if matches!(*state, EngineState::Ready | EngineState::Thinking) {
                return Ok(());
            }
        }
        *self.state.lock().await = EngineState::Initializing;

        let engine_path = self.config.lock().await.engine_path.clone();
        let mut child = spawn(&engine_path)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Engine(EngineError::Unreachable("no stdout pipe".into())))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Engine(EngineError::Unreachable("no stdin pipe".into())))?;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        *self.child.lock().await = Some(child);
        *self.stdin.lock().await = Some(stdin);
        *self.lines.lock().await = Some(rx);

        self.write_line(&uci::cmd_uci()).await?;
        let mut identity = String::new();
        self.read_until(|line| {
            if let EngineLine::Id { key, value } = line {
                identity.push_str(&format!("{key} {value}\n"));
            }
            matches!(line, EngineLine::UciOk)
        })
        .await?;
        *self.identity.lock().await = identity;

        *self.state.lock().await = EngineState::Ready;
        let cfg = self.config.lock().await.clone();
        self.apply_config(&cfg).await
    }

    /// Updates the stored configuration and pushes it to the engine via
    /// `setoption` (spec §4.6 "threading configuration").
    pub async fn configure(&self, cfg: Config) -> Result<(), Error> {
        *self.config.lock().await = cfg.clone();
        self.apply_config(&cfg).await
    }

    async fn apply_config(&self, cfg: &Config) -> Result<(), Error> {
        self.write_line(&uci::cmd_setoption("Threads", &cfg.threads.to_string()))
            .await?;
        self.write_line(&uci::cmd_setoption("Hash", &cfg.hash_mb.to_string()))
            .await?;
        self.write_line(&uci::cmd_setoption("Skill Level", &cfg.skill_level.to_string()))
            .await?;
        self.write_line(&uci::cmd_isready()).await?;
        self.read_until(|line| matches!(line, EngineLine::ReadyOk)).await?;
        Ok(())
    }

    pub async fn set_position(&self, fen: &str) -> Result<(), Error> {
        self.write_line(&uci::cmd_position_fen(fen)).await
    }

    /// Requests a best move for `fen` at `difficulty` (scaled into the
    /// configured `move_time_ms`). Enforces spec §4.6's "at most one
    /// outstanding bestmove request": a concurrent call observes
    /// `Error::Protocol(ProtocolError::Busy)` rather than queuing.
    pub async fn best_move(&self, fen: &str, difficulty: u32) -> Result<Option<String>, Error> {
        if self.thinking.swap(true, Ordering::SeqCst) {
            return Err(Error::Protocol(crate::error::ProtocolError::Busy));
        }
        let _guard = ThinkingGuard(&self.thinking);
        *self.state.lock().await = EngineState::Thinking;

        self.set_position(fen).await?;
        let (stop_tx, stop_rx) = oneshot::channel();
        *self.stop_tx.lock().await = Some(stop_tx);

        let move_time_ms = self.scaled_move_time(difficulty).await;
        self.write_line(&uci::cmd_go_movetime(move_time_ms)).await?;

        let result = tokio::select! {
            _ = stop_rx => {
                self.write_line(&uci::cmd_stop()).await.ok();
                Ok(None)
            }
            reply = self.read_until(|line| matches!(line, EngineLine::BestMove { .. })) => {
                match reply? {
                    EngineLine::BestMove { mv, .. } => Ok(mv),
                    _ => unreachable!(),
                }
            }
        };

        *self.state.lock().await = EngineState::Ready;
        result
    }

    async fn scaled_move_time(&self, difficulty: u32) -> u32 {
        let base = self.config.lock().await.move_time_ms;
        base.saturating_mul(difficulty.clamp(1, 20)) / 10
    }

    /// Signals cancellation of a pending `best_move` (spec §5
    /// "Cancellation"). A no-op if nothing is outstanding.
    pub async fn stop(&self) {
        if let Some(tx) = self.stop_tx.lock().await.take() {
            let _ = tx.send(());
        }
    }

    pub async fn analyze(&self, fen: &str, depth: u32, time_limit_ms: u32) -> Result<Analysis, Error> {
        self.set_position(fen).await?;
        self.write_line(&uci::cmd_go_depth(depth, time_limit_ms)).await?;

        let mut analysis = Analysis::default();
        loop {
            match self.read_one().await? {
                EngineLine::Info(info) => {
                    if let Some(d) = info.depth {
                        analysis.depth = d;
                    }
                    if let Some(cp) = info.score_cp {
                        analysis.score_cp = cp;
                    }
                    if let Some(nodes) = info.nodes {
                        analysis.nodes = nodes;
                    }
                    if let Some(nps) = info.nps {
                        analysis.nps = nps;
                    }
                    if let Some(t) = info.time_ms {
                        analysis.time_ms = t;
                    }
                    if !info.pv.is_empty() {
                        analysis.pv = info.pv;
                    }
                }
                EngineLine::BestMove { mv, ponder } => {
                    analysis.best_move = mv;
                    analysis.ponder = ponder;
                    return Ok(analysis);
                }
                _ => {}
            }
        }
    }

    pub async fn is_move_legal(&self, fen: &str, mv: &str) -> Result<LegalityReport, Error> {
        self.write_line(&uci::cmd_is_move_legal(fen, mv)).await?;
        match self.read_until(|line| matches!(line, EngineLine::Legality { .. })).await? {
            EngineLine::Legality { legal, reason } => Ok(LegalityReport { legal, reason }),
            _ => unreachable!(),
        }
    }

    pub async fn legal_moves(&self, fen: &str) -> Result<Vec<String>, Error> {
        self.write_line(&uci::cmd_legal_moves(fen)).await?;
        match self
            .read_until(|line| matches!(line, EngineLine::LegalMoves(_)))
            .await?
        {
            EngineLine::LegalMoves(moves) => Ok(moves),
            _ => unreachable!(),
        }
    }

    pub async fn evaluate(&self, fen: &str) -> Result<i32, Error> {
        self.write_line(&uci::cmd_evaluate(fen)).await?;
        match self.read_until(|line| matches!(line, EngineLine::Eval(_))).await? {
            EngineLine::Eval(cp) => Ok(cp),
            _ => unreachable!(),
        }
    }

    pub async fn is_in_check(&self, fen: &str) -> Result<bool, Error> {
        self.write_line(&uci::cmd_is_in_check(fen)).await?;
        self.read_bool().await
    }

    pub async fn is_checkmate(&self, fen: &str) -> Result<bool, Error> {
        self.write_line(&uci::cmd_is_checkmate(fen)).await?;
        self.read_bool().await
    }

    pub async fn is_stalemate(&self, fen: &str) -> Result<bool, Error> {
        self.write_line(&uci::cmd_is_stalemate(fen)).await?;
        self.read_bool().await
    }

    async fn read_bool(&self) -> Result<bool, Error> {
        match self.read_until(|line| matches!(line, EngineLine::Bool(_))).await? {
            EngineLine::Bool(b) => Ok(b),
            _ => unreachable!(),
        }
    }

    /// Restores the startup position and clears busy/stop state without
    /// tearing the process down (spec §6.2 `reset()`).
    pub async fn reset(&self) -> Result<(), Error> {
        self.set_position(crate::fen::INITIAL_FEN).await?;
        self.thinking.store(false, Ordering::SeqCst);
        *self.stop_tx.lock().await = None;
        Ok(())
    }

    /// Tears the process down (spec §6.2 `dispose()`).
    pub async fn dispose(&self) -> Result<(), Error> {
        self.write_line(&uci::cmd_quit()).await.ok();
        if let Some(mut child) = self.child.lock().await.take() {
            let _ = child.kill().await;
        }
        *self.stdin.lock().await = None;
        *self.lines.lock().await = None;
        *self.state.lock().await = EngineState::Uninitialized;
        Ok(())
    }

    async fn write_line(&self, line: &str) -> Result<(), Error> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard
            .as_mut()
            .ok_or_else(|| Error::Engine(EngineError::Unreachable("engine not initialized".into())))?;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| Error::Engine(EngineError::Unreachable(e.to_string())))?;
        stdin
            .flush()
            .await
            .map_err(|e| Error::Engine(EngineError::Unreachable(e.to_string())))
    }

    async fn read_one(&self) -> Result<EngineLine, Error> {
        let mut guard = self.lines.lock().await;
        let rx = guard
            .as_mut()
            .ok_or_else(|| Error::Engine(EngineError::Unreachable("engine not initialized".into())))?;
        match rx.recv().await {
            Some(line) => Ok(uci::parse_line(&line)),
            None => {
                *self.state.lock().await = EngineState::Error;
                Err(Error::Engine(EngineError::Unreachable(
                    "engine stdout closed".into(),
                )))
            }
        }
    }

    async fn read_until(&self, mut matcher: impl FnMut(&EngineLine) -> bool) -> Result<EngineLine, Error> {
        loop {
            let line = self.read_one().await?;
            if matcher(&line) {
                return Ok(line);
            }
        }
    }
}

fn spawn(engine_path: &Path) -> Result<Child, Error> {
    Command::new(engine_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::Engine(EngineError::Unreachable(e.to_string())))
}
