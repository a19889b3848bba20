//! UCI-ish text line codec for the engine bridge (spec §4.6, §6.2).
//!
//! Adapted from the teacher's `uci/mod.rs` tokenizer, but in the opposite
//! direction: the teacher parses commands a GUI sends *to* an engine this
//! crate speaks *as* a GUI, encoding commands and parsing the engine's
//! replies. The capability surface in spec §6.2 goes beyond plain UCI
//! (`is_move_legal`, `legal_moves`, `evaluate`, `is_in_check`, ...), which
//! no standard UCI engine exposes as distinct commands; this crate treats
//! those as single-line extension commands on the same stdin/stdout
//! channel, since spec §1 explicitly treats the engine process as an
//! opaque service and leaves the wire format of the "UCI-like capability"
//! unpinned beyond move encoding.

/// One parsed line of engine output.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineLine {
    Id { key: String, value: String },
    UciOk,
    ReadyOk,
    BestMove { mv: Option<String>, ponder: Option<String> },
    Info(InfoLine),
    Legality { legal: bool, reason: Option<String> },
    LegalMoves(Vec<String>),
    Eval(i32),
    Bool(bool),
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub score_cp: Option<i32>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time_ms: Option<u64>,
    pub pv: Vec<String>,
}

pub fn parse_line(line: &str) -> EngineLine {
    let line = line.trim();
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("id") => {
            let key = tokens.next().unwrap_or("").to_string();
            let value = tokens.collect::<Vec<_>>().join(" ");
            EngineLine::Id { key, value }
        }
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("bestmove") => {
            let mv = tokens.next().filter(|&m| m != "(none)" && !m.is_empty());
            let mut ponder = None;
            while let Some(tok) = tokens.next() {
                if tok == "ponder" {
                    ponder = tokens.next().map(str::to_string);
                }
            }
            EngineLine::BestMove {
                mv: mv.map(str::to_string),
                ponder,
            }
        }
        Some("info") => EngineLine::Info(parse_info(tokens)),
        Some("legal") => EngineLine::Legality {
            legal: true,
            reason: None,
        },
        Some("illegal") => EngineLine::Legality {
            legal: false,
            reason: Some(tokens.collect::<Vec<_>>().join(" ")).filter(|s| !s.is_empty()),
        },
        Some("legalmoves") => EngineLine::LegalMoves(tokens.map(str::to_string).collect()),
        Some("eval") => EngineLine::Eval(tokens.next().and_then(|s| s.parse().ok()).unwrap_or(0)),
        Some("true") => EngineLine::Bool(true),
        Some("false") => EngineLine::Bool(false),
        _ => EngineLine::Unknown(line.to_string()),
    }
}

fn parse_info<'a>(mut tokens: impl Iterator<Item = &'a str>) -> InfoLine {
    let mut info = InfoLine::default();
    while let Some(tok) = tokens.next() {
        match tok {
            "depth" => info.depth = tokens.next().and_then(|s| s.parse().ok()),
            "nodes" => info.nodes = tokens.next().and_then(|s| s.parse().ok()),
            "nps" => info.nps = tokens.next().and_then(|s| s.parse().ok()),
            "time" => info.time_ms = tokens.next().and_then(|s| s.parse().ok()),
            "score" => {
                if tokens.next() == Some("cp") {
                    info.score_cp = tokens.next().and_then(|s| s.parse().ok());
                }
            }
            "pv" => info.pv = tokens.by_ref().map(str::to_string).collect(),
            _ => {}
        }
    }
    info
}

pub fn cmd_uci() -> String {
    "uci\n".to_string()
}

pub fn cmd_isready() -> String {
    "isready\n".to_string()
}

pub fn cmd_setoption(name: &str, value: &str) -> String {
    format!("setoption name {name} value {value}\n")
}

pub fn cmd_position_fen(fen: &str) -> String {
    format!("position fen {fen}\n")
}

pub fn cmd_go_movetime(ms: u32) -> String {
    format!("go movetime {ms}\n")
}

pub fn cmd_go_depth(depth: u32, movetime_ms: u32) -> String {
    format!("go depth {depth} movetime {movetime_ms}\n")
}

pub fn cmd_stop() -> String {
    "stop\n".to_string()
}

pub fn cmd_quit() -> String {
    "quit\n".to_string()
}

pub fn cmd_is_move_legal(fen: &str, uci: &str) -> String {
    format!("islegal {fen} {uci}\n")
}

pub fn cmd_legal_moves(fen: &str) -> String {
    format!("legalmoves {fen}\n")
}

pub fn cmd_evaluate(fen: &str) -> String {
    format!("evaluate {fen}\n")
}

pub fn cmd_is_in_check(fen: &str) -> String {
    format!("incheck {fen}\n")
}

pub fn cmd_is_checkmate(fen: &str) -> String {
    format!("ischeckmate {fen}\n")
}

pub fn cmd_is_stalemate(fen: &str) -> String {
    format!("isstalemate {fen}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bestmove_with_ponder() {
        let line = parse_line("bestmove b2e2 ponder h9g7");
        assert_eq!(
            line,
            EngineLine::BestMove {
                mv: Some("b2e2".to_string()),
                ponder: Some("h9g7".to_string()),
            }
        );
    }

    #[test]
    fn bestmove_none_parses_as_no_move() {
        let line = parse_line("bestmove (none)");
        assert_eq!(
            line,
            EngineLine::BestMove {
                mv: None,
                ponder: None
            }
        );
    }

    #[test]
    fn parses_info_score_and_pv() {
        let line = parse_line("info depth 8 score cp 35 nodes 1200 nps 50000 time 24 pv b2e2 h9g7");
        match line {
            EngineLine::Info(info) => {
                assert_eq!(info.depth, Some(8));
                assert_eq!(info.score_cp, Some(35));
                assert_eq!(info.pv, vec!["b2e2", "h9g7"]);
            }
            other => panic!("expected Info, got {other:?}"),
        }
    }

    #[test]
    fn parses_legality_reply() {
        assert_eq!(
            parse_line("legal"),
            EngineLine::Legality {
                legal: true,
                reason: None
            }
        );
        assert_eq!(
            parse_line("illegal horse leg blocked"),
            EngineLine::Legality {
                legal: false,
                reason: Some("horse leg blocked".to_string()),
            }
        );
    }
}
