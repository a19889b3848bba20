//! Line-oriented console harness for manually exercising a
//! [`xiangqi::GameController`]. Demonstration scaffolding only: it carries
//! no rendering or input logic of its own, just enough glue to type moves
//! at a terminal.

use std::io::{self, BufRead, Write};

use xiangqi::ai::{self, HintOutcome};
use xiangqi::engine::Config;
use xiangqi::game::Status;
use xiangqi::player::Color;
use xiangqi::GameController;

#[tokio::main]
async fn main() {
    xiangqi::output::init().ok();

    let mut game = GameController::new(None, Color::Red, false, 5, Config::default())
        .expect("initial FEN is well-formed");

    println!("xiangqi console harness. Commands: move <uci>, hint, undo, reset, fen, ai on|off, quit");
    println!("{}", game.fen());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");

        match command {
            "quit" | "exit" => break,
            "move" => {
                let Some(uci) = parts.next() else {
                    println!("usage: move <uci>");
                    continue;
                };
                let mover = game.turn();
                match game.play_uci_move(uci, mover).await {
                    Ok(()) => report(&game),
                    Err(e) => println!("rejected: {e}"),
                }
            }
            "hint" => {
                let level = game.ai_level();
                match ai::hint(&mut game, level).await {
                    HintOutcome::Move(uci) => println!("hint: {uci}"),
                    HintOutcome::Busy => println!("hint: engine is busy"),
                    HintOutcome::None => println!("hint: no move available"),
                }
            }
            "undo" => match game.undo().await {
                Ok(()) => report(&game),
                Err(e) => println!("cannot undo: {e}"),
            },
            "reset" => match game.reset() {
                Ok(()) => report(&game),
                Err(e) => println!("cannot reset: {e}"),
            },
            "fen" => println!("{}", game.fen()),
            "ai" => match parts.next() {
                Some("on") => {
                    game.set_ai_enabled(true);
                    println!("ai enabled for {:?}", game.ai_color());
                }
                Some("off") => {
                    game.set_ai_enabled(false);
                    println!("ai disabled");
                }
                _ => println!("usage: ai on|off"),
            },
            other => println!("unknown command: {other}"),
        }

        if let Some(notification) = game.consume_notification() {
            println!("notification: {notification}");
        }
        if game.is_ai_turn() {
            if let Err(e) = ai::play_ai_turn(&mut game).await {
                println!("ai turn failed: {e}");
            }
            report(&game);
        }

        io::stdout().flush().ok();
    }
}

fn report(game: &GameController) {
    println!("{}", game.fen());
    match game.status() {
        Status::Playing => {}
        other => println!("status: {other:?}"),
    }
}

