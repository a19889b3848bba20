//! Opening book: weighted first-move sampling (spec §6.3, §4.7).
//!
//! Parsed with `serde`/`serde_json` since that is the JSON idiom the
//! broader example pack reaches for; the teacher has no JSON-asset
//! analogue to ground this on (it has no opening book at all), so this is
//! built fresh in the teacher's general "small, direct parser" style
//! rather than against a specific teacher file.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::{EngineError, Error};
use crate::player::Color;

const DEFAULT_BOOK: &str = include_str!("../../data/opening_book.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(rename = "move")]
    pub mv: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct SingleSideBook {
    start: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct DualSideBook {
    red: Vec<Candidate>,
    black: Vec<Candidate>,
}

/// A loaded opening book, always normalized to per-side candidate tables
/// regardless of which JSON shape it came from (spec §6.3).
#[derive(Debug, Clone)]
pub struct OpeningBook {
    red: Vec<Candidate>,
    black: Vec<Candidate>,
}

impl OpeningBook {
    /// The book embedded in the crate at compile time (spec §4.7's "a
    /// bundled asset"), so the crate has a working book with no external
    /// file dependency.
    pub fn bundled() -> Self {
        Self::parse(DEFAULT_BOOK).expect("bundled opening book is well-formed JSON")
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Engine(EngineError::Unreachable(format!("opening book: {e}"))))?;
        Self::parse(&text)
    }

    /// Dual-side is preferred; a single-side `"start"` table falls back
    /// to vertical reflection for black (spec §6.3).
    fn parse(text: &str) -> Result<Self, Error> {
        if let Ok(dual) = serde_json::from_str::<DualSideBook>(text) {
            return Ok(Self {
                red: dual.red,
                black: dual.black,
            });
        }
        let single: SingleSideBook = serde_json::from_str(text)
            .map_err(|e| Error::Engine(EngineError::MalformedReply(format!("opening book: {e}"))))?;
        let black = single
            .start
            .iter()
            .map(|c| Candidate {
                mv: reflect(&c.mv),
                count: c.count,
            })
            .collect();
        Ok(Self {
            red: single.start,
            black,
        })
    }

    pub fn candidates(&self, color: Color) -> &[Candidate] {
        match color {
            Color::Red => &self.red,
            Color::Black => &self.black,
        }
    }

    /// Count-weighted sampling: draw uniformly in `[0, Σcount)`, scan
    /// accumulating counts (spec §4.7, scenario F).
    pub fn sample(&self, color: Color, rng: &mut impl Rng) -> Option<String> {
        let candidates = self.candidates(color);
        let total: u32 = candidates.iter().map(|c| c.count).sum();
        if total == 0 {
            return None;
        }
        select(candidates, rng.gen_range(0..total))
    }
}

/// The pure selection step, exposed separately so tests can exercise
/// scenario F's exact draws without depending on RNG behavior.
pub fn select(candidates: &[Candidate], draw: u32) -> Option<String> {
    let mut cumulative = 0;
    for c in candidates {
        cumulative += c.count;
        if draw < cumulative {
            return Some(c.mv.clone());
        }
    }
    None
}

/// Vertically reflects a UCI move: rank digit `r -> 9 - r` on both
/// endpoints, file untouched (spec §6.3).
fn reflect(uci: &str) -> String {
    let chars: Vec<char> = uci.chars().collect();
    if chars.len() != 4 {
        return uci.to_string();
    }
    let flip_rank = |c: char| -> char {
        match c.to_digit(10) {
            Some(d) => char::from_digit(9 - d, 10).unwrap_or(c),
            None => c,
        }
    };
    format!("{}{}{}{}", chars[0], flip_rank(chars[1]), chars[2], flip_rank(chars[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_f_candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                mv: "h2e2".to_string(),
                count: 3,
            },
            Candidate {
                mv: "b2e2".to_string(),
                count: 1,
            },
        ]
    }

    #[test]
    fn scenario_f_weighted_selection_is_deterministic() {
        let candidates = scenario_f_candidates();
        assert_eq!(select(&candidates, 2), Some("h2e2".to_string()));
        assert_eq!(select(&candidates, 3), Some("b2e2".to_string()));
    }

    #[test]
    fn draw_past_total_count_selects_nothing() {
        let candidates = scenario_f_candidates();
        assert_eq!(select(&candidates, 4), None);
    }

    #[test]
    fn reflects_rank_not_file() {
        assert_eq!(reflect("b2e2"), "b7e7");
    }

    #[test]
    fn single_side_book_falls_back_with_reflection() {
        let json = r#"{"start": [{"move":"b2e2","count":5}]}"#;
        let book = OpeningBook::parse(json).unwrap();
        assert_eq!(book.candidates(Color::Red)[0].mv, "b2e2");
        assert_eq!(book.candidates(Color::Black)[0].mv, "b7e7");
    }

    #[test]
    fn dual_side_book_is_used_directly_when_present() {
        let json = r#"{"red": [{"move":"b2e2","count":1}], "black": [{"move":"h7e7","count":1}]}"#;
        let book = OpeningBook::parse(json).unwrap();
        assert_eq!(book.candidates(Color::Black)[0].mv, "h7e7");
    }

    #[test]
    fn bundled_book_parses() {
        let book = OpeningBook::bundled();
        assert!(!book.candidates(Color::Red).is_empty());
    }
}
