//! The `Move` value type and UCI coordinate mapping (spec §3, §4.6).

use crate::piece::Piece;

/// A proposed or completed move: origin, destination, and — once
/// executed — whatever piece was captured, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: (u8, u8),
    pub to: (u8, u8),
}

impl Move {
    pub fn new(from: (u8, u8), to: (u8, u8)) -> Self {
        Self { from, to }
    }

    /// UCI rank maps to internal `y = 9 - r`; UCI file letter maps to
    /// `x = c - 'a'` (spec §4.6).
    pub fn to_uci(self) -> String {
        format!(
            "{}{}",
            square_to_uci(self.from),
            square_to_uci(self.to)
        )
    }

    pub fn from_uci(s: &str) -> Option<Self> {
        let bytes: Vec<char> = s.trim().chars().collect();
        if bytes.len() != 4 {
            return None;
        }
        let from = uci_to_square(bytes[0], bytes[1])?;
        let to = uci_to_square(bytes[2], bytes[3])?;
        Some(Self { from, to })
    }
}

fn square_to_uci((file, rank): (u8, u8)) -> String {
    let file_letter = (b'a' + file) as char;
    let uci_rank = 9 - rank;
    format!("{file_letter}{uci_rank}")
}

fn uci_to_square(file_letter: char, rank_digit: char) -> Option<(u8, u8)> {
    if !('a'..='i').contains(&file_letter) {
        return None;
    }
    let rank_digit = rank_digit.to_digit(10)?;
    if rank_digit > 9 {
        return None;
    }
    let file = file_letter as u8 - b'a';
    let rank = 9 - rank_digit as u8;
    Some((file, rank))
}

/// A completed move record as kept in move history (spec §3, §6.4):
/// the UCI string plus a capture marker ('x' if a piece was taken, '-'
/// otherwise), and the captured piece, if any, for undo/inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub mv: Move,
    pub captured: Option<Piece>,
}

impl MoveRecord {
    /// Rendering used in move history: origin square, a capture marker
    /// ('x' if a piece was taken, '-' otherwise), then the destination
    /// square — e.g. "b2-e2" or "b2xe2" (spec §6.4, scenario A).
    pub fn annotated(&self) -> String {
        let marker = if self.captured.is_some() { "x" } else { "-" };
        let (from, to) = (square_to_uci(self.mv.from), square_to_uci(self.mv.to));
        format!("{from}{marker}{to}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uci_round_trip_matches_spec_example() {
        // "e2e4" = from (4,7) to (4,5).
        let mv = Move::from_uci("e2e4").unwrap();
        assert_eq!(mv.from, (4, 7));
        assert_eq!(mv.to, (4, 5));
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn b2e2_cannon_opening_move_notation() {
        let mv = Move::new((1, 7), (4, 7));
        assert_eq!(mv.to_uci(), "b2e2");
    }

    #[test]
    fn annotated_non_capture_uses_dash_marker() {
        let record = MoveRecord {
            mv: Move::new((1, 7), (4, 7)),
            captured: None,
        };
        assert_eq!(record.annotated(), "b2-e2");
    }
}
