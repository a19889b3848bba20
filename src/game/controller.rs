//! The game controller (spec §4.5): the turn machine, history/undo,
//! notification channel, and the entry point for the dual-validation
//! pipeline (spec §4.6).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};

use crate::board::Board;
use crate::check;
use crate::engine::{Config, EngineBridge};
use crate::error::{Error, InputError, RuleError};
use crate::fen;
use crate::movegen;
use crate::mv::{Move, MoveRecord};
use crate::player::Color;
use crate::validator;

use super::history::History;
use super::{ListenerId, NOTIFICATION_CHECK, PieceSnapshot, Stats, Status};

type Listener = Box<dyn Fn(&str)>;

/// Owns the authoritative board, history, timers and engine handle.
/// Mutation happens only through its public methods; see spec §5 for the
/// single-threaded cooperative scheduling model this assumes.
pub struct GameController {
    board: Board,
    turn: Color,
    status: Status,
    history: History,
    initial_fen: String,
    halfmove_clock: u32,
    fullmove_number: u32,
    last_move: Option<Move>,
    last_hint: Option<Move>,
    pending_notification: Option<String>,
    stats: Stats,
    current_move_start: Instant,
    ai_enabled: bool,
    ai_color: Color,
    ai_level: u32,
    self_play: bool,
    engine: Arc<EngineBridge>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl GameController {
    /// Sets up the initial board, a one-entry history, timers, and an
    /// engine handle that is initialized lazily on first suspending use
    /// rather than blocking here (spec §4.5 "lazily, off the calling
    /// thread").
    pub fn new(
        initial_fen: Option<&str>,
        starting_turn: Color,
        ai_enabled: bool,
        ai_level: u32,
        config: Config,
    ) -> Result<Self, Error> {
        let fen_string = initial_fen
            .map(str::to_string)
            .unwrap_or_else(|| with_turn(fen::INITIAL_FEN, starting_turn));
        let (board, turn, halfmove_clock, fullmove_number) = fen::parse_into_board(&fen_string, None)?;

        Ok(Self {
            board,
            turn,
            status: Status::Playing,
            history: History::new(fen_string.clone()),
            initial_fen: fen_string,
            halfmove_clock,
            fullmove_number,
            last_move: None,
            last_hint: None,
            pending_notification: None,
            stats: Stats::default(),
            current_move_start: Instant::now(),
            ai_enabled,
            ai_color: Color::Black,
            ai_level,
            self_play: false,
            engine: Arc::new(EngineBridge::new(config)),
            listeners: Vec::new(),
            next_listener_id: 0,
        })
    }

    /// Attempts `(fx,fy) -> (tx,ty)` for the side to move (spec §4.5
    /// `move`). On any validation failure, no state changes occur.
    pub async fn move_piece(&mut self, fx: u8, fy: u8, tx: u8, ty: u8) -> Result<(), Error> {
        let mover = self.turn;
        self.execute_move(fx, fy, tx, ty, mover).await
    }

    /// Plays `uci` as `as_color` regardless of whose turn it nominally
    /// is, used by the opening-book first move and by emergency-move
    /// fallback (spec §4.7, §6.4 `play_uci_move`).
    pub async fn play_uci_move(&mut self, uci: &str, as_color: Color) -> Result<(), Error> {
        let mv = Move::from_uci(uci)
            .ok_or_else(|| Error::Input(InputError::MalformedUci(uci.to_string())))?;
        self.execute_move(mv.from.0, mv.from.1, mv.to.0, mv.to.1, as_color).await
    }

    async fn execute_move(&mut self, fx: u8, fy: u8, tx: u8, ty: u8, mover: Color) -> Result<(), Error> {
        validator::validate_coordinates((fx, fy), (tx, ty))?;

        let piece = *self
            .board
            .at(fx, fy)
            .ok_or(Error::Input(InputError::EmptyOrigin { file: fx, rank: fy }))?;
        if piece.color != mover {
            return Err(Error::Input(InputError::WrongColor { file: fx, rank: fy }));
        }
        if let Some(occupant) = self.board.at(tx, ty) {
            if occupant.color == piece.color {
                return Err(Error::Input(InputError::SelfCapture));
            }
        }

        let mv = Move::new((fx, fy), (tx, ty));
        match self.validate_with_engine(&mv).await {
            Ok(()) => {}
            Err(Error::Engine(e)) => {
                warn!("engine validation unavailable ({e}), falling back to local validator");
                validator::validate_move(&self.board, &piece, (tx, ty))?;
            }
            Err(other) => return Err(other),
        }

        self.commit_move(piece, mv, mover).await
    }

    async fn validate_with_engine(&self, mv: &Move) -> Result<(), Error> {
        self.engine.initialize().await?;
        let report = self
            .engine
            .is_move_legal(self.history.current_fen(), &mv.to_uci())
            .await?;
        if report.legal {
            Ok(())
        } else {
            Err(Error::Rule(RuleError::EngineRejected(
                report.reason.unwrap_or_else(|| "rejected by engine".to_string()),
            )))
        }
    }

    async fn commit_move(&mut self, piece: crate::piece::Piece, mv: Move, mover: Color) -> Result<(), Error> {
        let elapsed_ms = self.current_move_start.elapsed().as_millis() as u64;
        match mover {
            Color::Red => self.stats.red_total_millis += elapsed_ms,
            Color::Black => self.stats.black_total_millis += elapsed_ms,
        }

        let captured = self.board.remove_at(mv.to.0, mv.to.1);
        self.board.relocate(piece.id, mv.to.0, mv.to.1);

        self.halfmove_clock = if captured.is_some() { 0 } else { self.halfmove_clock + 1 };
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        let new_turn = mover.other();
        let new_fen = fen::serialize(&self.board, new_turn, self.halfmove_clock, self.fullmove_number);
        self.history.push(new_fen, MoveRecord { mv, captured });

        self.last_move = Some(mv);
        self.last_hint = None;
        self.turn = new_turn;
        self.current_move_start = Instant::now();

        self.update_terminal_status().await;

        self.pending_notification = None;
        if self.status == Status::Playing && check::is_in_check(&self.board, self.turn)? {
            self.pending_notification = Some(NOTIFICATION_CHECK.to_string());
            debug!("check: {:?} to move is attacked", self.turn);
        }

        self.notify();
        Ok(())
    }

    /// Terminal conditions are either a missing king (spec §3 invariant 4,
    /// §7 "king missing") or an engine-reported checkmate/stalemate
    /// (GLOSSARY: "Checkmate/stalemate: Engine-reported terminal
    /// states"). No local substitute exists for the latter since it
    /// requires full legal-move enumeration with self-check filtering,
    /// which spec.md reserves to the engine.
    async fn update_terminal_status(&mut self) {
        if self.board.king_of(Color::Red).is_none() || self.board.king_of(Color::Black).is_none() {
            self.status = Status::Checkmate;
            return;
        }
        if self.engine.initialize().await.is_err() {
            return;
        }
        let fen = self.history.current_fen().to_string();
        if matches!(self.engine.is_checkmate(&fen).await, Ok(true)) {
            self.status = Status::Checkmate;
        } else if matches!(self.engine.is_stalemate(&fen).await, Ok(true)) {
            self.status = Status::Stalemate;
        }
    }

    /// Undoes the last move (spec §4.5 `undo`). Requires at least one
    /// completed move.
    pub async fn undo(&mut self) -> Result<(), Error> {
        let Some((_, restored_fen)) = self.history.pop() else {
            return Err(Error::Input(InputError::NothingToUndo));
        };

        let (board, turn, halfmove_clock, fullmove_number) =
            fen::parse_into_board(&restored_fen, Some(&self.board))?;
        self.board = board;
        self.turn = turn;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.status = Status::Playing;
        self.last_hint = None;
        self.last_move = self.history.last_move_record().map(|r| r.mv);
        self.pending_notification = None;

        self.update_terminal_status().await;
        self.notify();
        Ok(())
    }

    /// Restores the initial position and clears history/timers (spec
    /// §4.5 `reset`).
    pub fn reset(&mut self) -> Result<(), Error> {
        let (board, turn, halfmove_clock, fullmove_number) = fen::parse_into_board(&self.initial_fen, None)?;
        self.board = board;
        self.turn = turn;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self.history.reset(self.initial_fen.clone());
        self.status = Status::Playing;
        self.last_move = None;
        self.last_hint = None;
        self.pending_notification = None;
        self.stats = Stats::default();
        self.current_move_start = Instant::now();
        self.notify();
        Ok(())
    }

    /// Basic-rules-only targets for the piece at `(x,y)` (spec §4.5
    /// `legal_targets`, §4.2). Does not consult the engine.
    pub fn legal_targets(&self, x: u8, y: u8) -> Vec<(u8, u8)> {
        match self.board.at(x, y) {
            Some(piece) => movegen::pseudo_legal_targets(&self.board, piece),
            None => Vec::new(),
        }
    }

    /// Additive, engine-independent self-check-filtered targets (spec §9
    /// "implementers may optionally add a self-check filter").
    pub fn legal_targets_filtered(&self, x: u8, y: u8) -> Result<Vec<(u8, u8)>, Error> {
        let Some(piece) = self.board.at(x, y) else {
            return Ok(Vec::new());
        };
        let mover = piece.color;
        let mut kept = Vec::new();
        for target in movegen::pseudo_legal_targets(&self.board, piece) {
            if !check::leaves_mover_in_check(&self.board, mover, (x, y), target)? {
                kept.push(target);
            }
        }
        Ok(kept)
    }

    /// Delegates to the engine bridge (spec §4.5 `evaluate`); positive is
    /// a red advantage.
    pub async fn evaluate(&self) -> Result<i32, Error> {
        self.engine.initialize().await?;
        self.engine.evaluate(self.history.current_fen()).await
    }

    pub fn get_stats(&self) -> Stats {
        self.stats
    }

    pub fn consume_notification(&mut self) -> Option<String> {
        self.pending_notification.take()
    }

    pub fn fen(&self) -> &str {
        self.history.current_fen()
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn move_history(&self) -> Vec<String> {
        self.history.annotated_moves()
    }

    pub fn fen_history(&self) -> &[String] {
        self.history.fen_history()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn last_hint(&self) -> Option<Move> {
        self.last_hint
    }

    pub fn set_last_hint(&mut self, hint: Option<Move>) {
        self.last_hint = hint;
    }

    pub fn pieces(&self) -> Vec<PieceSnapshot> {
        self.board.pieces().map(PieceSnapshot::from).collect()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn engine(&self) -> &Arc<EngineBridge> {
        &self.engine
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    pub fn ai_color(&self) -> Color {
        self.ai_color
    }

    pub fn set_ai_color(&mut self, color: Color) {
        self.ai_color = color;
    }

    pub fn ai_level(&self) -> u32 {
        self.ai_level
    }

    pub fn set_ai_level(&mut self, level: u32) {
        self.ai_level = level;
    }

    pub fn self_play(&self) -> bool {
        self.self_play
    }

    pub fn toggle_self_play(&mut self, enabled: bool) {
        self.self_play = enabled;
    }

    /// Forces `status` directly, used by the AI driver's retry policy
    /// when retries are exhausted and the engine reports no legal moves
    /// at all (spec §4.7 "otherwise marks status = stalemate").
    pub fn force_status(&mut self, status: Status) {
        self.status = status;
        self.notify();
    }

    /// True when the side to move is currently under AI control (spec
    /// §4.7 "Opponent response").
    pub fn is_ai_turn(&self) -> bool {
        self.status == Status::Playing && (self.self_play || (self.ai_enabled && self.turn == self.ai_color))
    }

    /// Registers a state-changed listener, returning a handle for
    /// `unsubscribe` (spec §9 "Listener model"). Notifications fan out in
    /// registration order, after the mutation completes (spec §5
    /// "Ordering guarantees").
    pub fn subscribe(&mut self, listener: impl Fn(&str) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    /// Broadcasts the current pending notification (or an empty state-
    /// changed marker) to every listener. One listener's panic is caught
    /// so it cannot suppress delivery to the rest (spec §4.5 "each
    /// listener is isolated").
    fn notify(&self) {
        let message = self.pending_notification.as_deref().unwrap_or("");
        for (id, listener) in &self.listeners {
            if std::panic::catch_unwind(AssertUnwindSafe(|| listener(message))).is_err() {
                warn!("listener {:?} panicked during notification", id);
            }
        }
    }
}

/// Rewrites the turn field of a starting FEN without touching the rest,
/// used when `GameController::new` is given `starting_turn` but no
/// explicit FEN.
fn with_turn(fen_str: &str, turn: Color) -> String {
    let mut fields: Vec<&str> = fen_str.split_whitespace().collect();
    let letter = turn.uci_letter().to_string();
    if fields.len() > 1 {
        fields[1] = &letter;
        fields.join(" ")
    } else {
        fen_str.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> GameController {
        GameController::new(None, Color::Red, false, 10, Config::default()).unwrap()
    }

    #[tokio::test]
    async fn scenario_a_legal_opening_move() {
        let mut game = controller();
        game.move_piece(1, 7, 4, 7).await.unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.move_history(), vec!["b2-e2".to_string()]);
        assert_eq!(game.board().at(4, 7).unwrap().piece_type, crate::piece::PieceType::Cannon);
    }

    #[tokio::test]
    async fn scenario_d_undo_restores_exactly() {
        let mut game = controller();
        let f0 = game.fen().to_string();
        game.move_piece(7, 7, 4, 7).await.unwrap(); // h2e2
        assert_ne!(game.fen(), f0);
        game.undo().await.unwrap();
        assert_eq!(game.fen(), f0);
        assert_eq!(game.turn(), Color::Red);
        assert!(game.move_history().is_empty());
    }

    #[tokio::test]
    async fn undo_with_empty_history_fails() {
        let mut game = controller();
        let err = game.undo().await.unwrap_err();
        assert!(matches!(err, Error::Input(InputError::NothingToUndo)));
    }

    #[tokio::test]
    async fn wrong_color_origin_is_rejected_with_no_mutation() {
        let mut game = controller();
        let f0 = game.fen().to_string();
        let err = game.move_piece(1, 0, 1, 1).await.unwrap_err();
        assert!(matches!(err, Error::Input(InputError::WrongColor { .. })));
        assert_eq!(game.fen(), f0);
    }

    #[tokio::test]
    async fn reset_restores_initial_fen() {
        let mut game = controller();
        let f0 = game.fen().to_string();
        game.move_piece(1, 7, 4, 7).await.unwrap();
        game.reset().unwrap();
        assert_eq!(game.fen(), f0);
        assert!(game.move_history().is_empty());
    }
}
