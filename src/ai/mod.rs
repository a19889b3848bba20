//! Asynchronous AI turn orchestration (spec §4.7): opponent response,
//! hint requests, and the opening-book first move.

pub mod book;

use std::time::Duration;

use log::{info, warn};
use rand::thread_rng;

pub use book::OpeningBook;

use crate::error::{Error, ProtocolError};
use crate::game::{GameController, Status};
use crate::mv::Move;
use crate::player::Color;

/// Outcome of a `hint` request. Spec §7 calls for "a distinct sentinel"
/// for the busy case rather than an error, since a search already in
/// flight is an expected condition, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Move(String),
    Busy,
    None,
}

const MAX_RETRIES: u32 = 3;
const PRESENTATION_DELAY: Duration = Duration::from_millis(300);

/// Drives one AI turn for whichever side is currently under AI control
/// (spec §4.7 "Opponent response"). If self-play is enabled and the game
/// is still `Playing` after the move commits, immediately schedules the
/// other side's turn (spec §9 "Asynchronous self-play loop" — the
/// recursion only continues post-commit, so a terminal result always
/// breaks the loop).
pub async fn play_ai_turn(game: &mut GameController) -> Result<(), Error> {
    if !game.is_ai_turn() {
        return Ok(());
    }
    tokio::time::sleep(PRESENTATION_DELAY).await;

    let mover = game.turn();
    let level = game.ai_level();
    let fen = game.fen().to_string();

    game.engine().initialize().await.ok();

    let mut played = false;
    for attempt in 1..=MAX_RETRIES {
        match game.engine().best_move(&fen, level).await {
            Ok(Some(uci)) => match game.play_uci_move(&uci, mover).await {
                Ok(()) => {
                    played = true;
                    break;
                }
                Err(e) => warn!("AI move {uci} rejected on attempt {attempt}/{MAX_RETRIES}: {e}"),
            },
            Ok(None) => info!("engine returned no move on attempt {attempt}/{MAX_RETRIES}"),
            Err(e) => warn!("engine best_move failed on attempt {attempt}/{MAX_RETRIES}: {e}"),
        }
    }

    if !played {
        match game.engine().legal_moves(&fen).await {
            Ok(moves) if !moves.is_empty() => {
                let emergency = moves[0].clone();
                warn!("AI retries exhausted, playing emergency move {emergency}");
                game.play_uci_move(&emergency, mover).await?;
            }
            _ => {
                warn!("AI retries exhausted and no legal moves remain; marking stalemate");
                game.force_status(Status::Stalemate);
            }
        }
    }

    if game.self_play() && game.status() == Status::Playing {
        Box::pin(play_ai_turn(game)).await?;
    }
    Ok(())
}

/// `hint(difficulty)` (spec §4.7 "Hint"): temporarily enables the engine
/// at `difficulty`, requests a best move from the current position,
/// restores the prior enabled/difficulty state, and — on success —
/// records the decoded move as `lastHint`.
pub async fn hint(game: &mut GameController, difficulty: u32) -> HintOutcome {
    let prior_enabled = game.ai_enabled();
    let prior_level = game.ai_level();
    game.set_ai_enabled(true);
    game.set_ai_level(difficulty);

    let fen = game.fen().to_string();
    let init = game.engine().initialize().await;
    let result = match init {
        Ok(()) => game.engine().best_move(&fen, difficulty).await,
        Err(e) => Err(e),
    };

    game.set_ai_enabled(prior_enabled);
    game.set_ai_level(prior_level);

    match result {
        Ok(Some(uci)) => {
            if let Some(mv) = Move::from_uci(&uci) {
                game.set_last_hint(Some(mv));
            }
            HintOutcome::Move(uci)
        }
        Ok(None) => HintOutcome::None,
        Err(Error::Protocol(ProtocolError::Busy)) => HintOutcome::Busy,
        Err(e) => {
            warn!("hint request failed: {e}");
            HintOutcome::None
        }
    }
}

/// Plays the opening-book first move when the controller was freshly
/// initialized with AI-moves-first enabled and nothing has been played
/// yet (spec §4.7 "Opening-book first move"). Returns whether a move was
/// played.
pub async fn maybe_play_opening_book_move(game: &mut GameController, book: &OpeningBook) -> Result<bool, Error> {
    if !game.fen_history().len().eq(&1) {
        return Ok(false);
    }
    let color = game.turn();
    let ai_controls_color = game.self_play() || (game.ai_enabled() && game.ai_color() == color);
    if !ai_controls_color {
        return Ok(false);
    }

    let mut rng = thread_rng();
    match book.sample(color, &mut rng) {
        Some(uci) => {
            game.play_uci_move(&uci, color).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Test-only entry point for deterministic opening-book selection
/// without depending on the process-global RNG (spec §8 "injected
/// deterministic RNG").
#[cfg(test)]
pub async fn play_book_move_with_draw(
    game: &mut GameController,
    book: &OpeningBook,
    draw: u32,
) -> Result<bool, Error> {
    let color = game.turn();
    match book::select(book.candidates(color), draw) {
        Some(uci) => {
            game.play_uci_move(&uci, color).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Config;
    use crate::player::Color;

    #[tokio::test]
    async fn scenario_f_book_move_is_played_with_deterministic_draw() {
        let mut game = GameController::new(None, Color::Red, true, 5, Config::default()).unwrap();
        let book = OpeningBook::bundled();
        let played = play_book_move_with_draw(&mut game, &book, 0).await.unwrap();
        assert!(played);
        assert_eq!(game.move_history().len(), 1);
    }

    #[tokio::test]
    async fn hint_returns_none_when_engine_is_unreachable() {
        let mut game = GameController::new(None, Color::Red, false, 5, Config::default()).unwrap();
        let outcome = hint(&mut game, 5).await;
        assert_eq!(outcome, HintOutcome::None);
        assert!(game.last_hint().is_none());
    }
}
