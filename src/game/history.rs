//! Move/FEN history and the undo stack (spec §3 invariant 1: `|fenHistory|
//! = |moveHistory| + 1`).

use crate::mv::MoveRecord;

#[derive(Clone, Debug)]
pub struct History {
    fen_history: Vec<String>,
    move_history: Vec<MoveRecord>,
}

impl History {
    pub fn new(initial_fen: String) -> Self {
        Self {
            fen_history: vec![initial_fen],
            move_history: Vec::new(),
        }
    }

    pub fn push(&mut self, fen: String, record: MoveRecord) {
        self.fen_history.push(fen);
        self.move_history.push(record);
    }

    /// Pops the last move and its FEN, returning the record and the FEN
    /// that is now current. `None` if nothing remains to undo (spec §4.5
    /// "requires |fenHistory| >= 2").
    pub fn pop(&mut self) -> Option<(MoveRecord, String)> {
        if self.fen_history.len() < 2 {
            return None;
        }
        self.fen_history.pop();
        let record = self.move_history.pop()?;
        let current_fen = self.fen_history.last().cloned()?;
        Some((record, current_fen))
    }

    pub fn reset(&mut self, initial_fen: String) {
        self.fen_history = vec![initial_fen];
        self.move_history.clear();
    }

    pub fn current_fen(&self) -> &str {
        self.fen_history.last().expect("history is never empty")
    }

    pub fn fen_history(&self) -> &[String] {
        &self.fen_history
    }

    pub fn annotated_moves(&self) -> Vec<String> {
        self.move_history.iter().map(MoveRecord::annotated).collect()
    }

    pub fn last_move_record(&self) -> Option<&MoveRecord> {
        self.move_history.last()
    }

    pub fn len_moves(&self) -> usize {
        self.move_history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mv::Move;

    #[test]
    fn pop_refuses_below_the_initial_entry() {
        let mut history = History::new("startfen".to_string());
        assert!(history.pop().is_none());
    }

    #[test]
    fn push_then_pop_restores_prior_fen() {
        let mut history = History::new("f0".to_string());
        history.push(
            "f1".to_string(),
            MoveRecord {
                mv: Move::new((1, 7), (4, 7)),
                captured: None,
            },
        );
        let (record, current) = history.pop().unwrap();
        assert_eq!(current, "f0");
        assert_eq!(record.annotated(), "b2-e2");
        assert!(history.pop().is_none());
    }
}
