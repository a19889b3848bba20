//! FEN codec with identity-preserving reparse (spec §4.1, §6.1).
//!
//! Parsing and serialization are plain text processing with no teacher
//! analogue worth grounding on (the teacher's position module is bitboard
//! FEN, a different board shape entirely); the identity-preserving reparse
//! algorithm is implemented exactly as spec'd, since it is the one piece of
//! codec behavior this crate cannot get from a generic chess FEN reader.

use crate::board::{Board, FILES, RANKS};
use crate::error::{Error, InputError};
use crate::piece::PieceType;
use crate::player::Color;

pub const INITIAL_FEN: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// A fully parsed FEN: the raw per-square piece list (in rank-major,
/// file-major parse order — this order matters for the identity reparse's
/// "current cardinal index" rule) plus the non-position fields.
#[derive(Clone, Debug)]
pub struct ParsedFen {
    pub placements: Vec<(PieceType, Color, u8, u8)>,
    pub turn: Color,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// Parses the position/turn/castling/en-passant/halfmove/fullmove fields
/// of a Xiangqi FEN string (spec §6.1). Castling and en-passant fields are
/// always "-" and are validated for shape but otherwise ignored.
pub fn parse(fen: &str) -> Result<ParsedFen, Error> {
    let mut fields = fen.split_whitespace();
    let position = fields
        .next()
        .ok_or_else(|| malformed(fen, "missing position field"))?;
    let turn_field = fields.next().unwrap_or("w");
    let _castling = fields.next().unwrap_or("-");
    let _en_passant = fields.next().unwrap_or("-");
    let halfmove_clock = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove_number = fields.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let turn = Color::from_uci_letter(turn_field.chars().next().unwrap_or('w'))
        .ok_or_else(|| malformed(fen, "turn field must be 'w' or 'b'"))?;

    let ranks: Vec<&str> = position.split('/').collect();
    if ranks.len() != RANKS as usize {
        return Err(malformed(fen, "expected 10 rank segments"));
    }

    let mut placements = Vec::new();
    for (rank, segment) in ranks.iter().enumerate() {
        let mut file: u32 = 0;
        for c in segment.chars() {
            if let Some(empties) = c.to_digit(10) {
                file += empties;
            } else if let Some((color, piece_type)) = PieceType::from_notation(c) {
                if file >= FILES as u32 {
                    return Err(malformed(fen, "rank segment overflows the board width"));
                }
                placements.push((piece_type, color, file as u8, rank as u8));
                file += 1;
            } else {
                return Err(malformed(fen, "unrecognized character in position field"));
            }
        }
        if file != FILES as u32 {
            return Err(malformed(fen, "rank segment does not sum to 9 files"));
        }
    }

    Ok(ParsedFen {
        placements,
        turn,
        halfmove_clock,
        fullmove_number,
    })
}

fn malformed(fen: &str, reason: &str) -> Error {
    Error::Input(InputError::MalformedFen(format!("{reason} (\"{fen}\")")))
}

/// Serializes a board back to the position field of a FEN string.
pub fn serialize_position(board: &Board) -> String {
    let mut segments = Vec::with_capacity(RANKS as usize);
    for rank in 0..RANKS {
        let mut segment = String::new();
        let mut empty_run = 0u8;
        for file in 0..FILES {
            match board.at(file, rank) {
                Some(piece) => {
                    if empty_run > 0 {
                        segment.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    segment.push(piece.fen_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            segment.push(char::from(b'0' + empty_run));
        }
        segments.push(segment);
    }
    segments.join("/")
}

/// Serializes the full FEN string (spec §6.1).
pub fn serialize(board: &Board, turn: Color, halfmove_clock: u32, fullmove_number: u32) -> String {
    format!(
        "{} {} - - {} {}",
        serialize_position(board),
        turn.uci_letter(),
        halfmove_clock,
        fullmove_number
    )
}

/// Parses `fen` into a fresh [`Board`], assigning ids by the
/// identity-preserving reparse algorithm (spec §4.1) against `prior`, if
/// given. Pass `None` for the very first parse of a game (every piece gets
/// a fresh id in parse order).
pub fn parse_into_board(fen: &str, prior: Option<&Board>) -> Result<(Board, Color, u32, u32), Error> {
    let parsed = parse(fen)?;
    let board = reparse_with_identity(&parsed.placements, prior);
    Ok((board, parsed.turn, parsed.halfmove_clock, parsed.fullmove_number))
}

fn reparse_with_identity(placements: &[(PieceType, Color, u8, u8)], prior: Option<&Board>) -> Board {
    let mut pool: Vec<_> = prior.map(|b| b.pieces().copied().collect()).unwrap_or_default();
    let max_existing_id = pool.iter().map(|p| p.id).max();
    let mut monotonic_next = max_existing_id.map_or(0, |m| m + 1);

    let mut board = Board::empty();
    let mut used_ids: std::collections::HashSet<u32> = std::collections::HashSet::new();

    for (idx, &(piece_type, color, file, rank)) in placements.iter().enumerate() {
        // 1. Exact (type, color, file, rank) match.
        if let Some(pos) = pool
            .iter()
            .position(|p| p.piece_type == piece_type && p.color == color && p.file == file && p.rank == rank)
        {
            let piece = pool.remove(pos);
            board.insert_with_id(piece.id, piece_type, color, file, rank);
            used_ids.insert(piece.id);
            continue;
        }

        // 2. Nearest unmatched piece of the same (type, color), ties
        // broken by lowest id.
        let nearest = pool
            .iter()
            .enumerate()
            .filter(|(_, p)| p.piece_type == piece_type && p.color == color)
            .map(|(i, p)| {
                let dist = (file as i32 - p.file as i32).unsigned_abs()
                    + (rank as i32 - p.rank as i32).unsigned_abs();
                (i, dist, p.id)
            })
            .min_by_key(|&(_, dist, id)| (dist, id));
        if let Some((i, _, _)) = nearest {
            let piece = pool.remove(i);
            board.insert_with_id(piece.id, piece_type, color, file, rank);
            used_ids.insert(piece.id);
            continue;
        }

        // 3. Fresh id: try the cardinal parse index first, else the next
        // free id above every existing one, incrementing monotonically.
        let candidate = idx as u32;
        let collides = pool.iter().any(|p| p.id == candidate) || used_ids.contains(&candidate);
        let id = if collides {
            let id = monotonic_next;
            monotonic_next += 1;
            id
        } else {
            candidate
        };
        board.insert_with_id(id, piece_type, color, file, rank);
        used_ids.insert(id);
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_initial_fen() {
        let (board, turn, _, _) = parse_into_board(INITIAL_FEN, None).unwrap();
        assert_eq!(turn, Color::Red);
        assert_eq!(board.len(), 32);
        assert_eq!(board.king_of(Color::Red).unwrap().file, 4);
        assert_eq!(board.king_of(Color::Red).unwrap().rank, 9);
        assert_eq!(board.king_of(Color::Black).unwrap().file, 4);
        assert_eq!(board.king_of(Color::Black).unwrap().rank, 0);
    }

    #[test]
    fn round_trips_initial_fen() {
        let (board, turn, half, full) = parse_into_board(INITIAL_FEN, None).unwrap();
        let serialized = serialize(&board, turn, half, full);
        assert_eq!(serialized, INITIAL_FEN);
    }

    #[test]
    fn reparse_preserves_id_across_non_capturing_move() {
        let (board0, _, _, _) = parse_into_board(INITIAL_FEN, None).unwrap();
        let mover_id = board0.at(1, 7).unwrap().id; // red cannon b2 (file b=1, rank 7)

        // b2e2: cannon moves from (1,7) to (4,7), i.e. the rank-7 segment's
        // cannon relocates from file b to file e.
        let fen1 = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/4C2C1/9/RNBAKABNR b - - 1 1";
        let (board1, _, _, _) = parse_into_board(fen1, Some(&board0)).unwrap();
        let moved = board1.at(4, 7).unwrap();
        assert_eq!(moved.id, mover_id);
    }

    #[test]
    fn reparse_retires_captured_id_and_keeps_mover_id() {
        let (board0, _, _, _) = parse_into_board(INITIAL_FEN, None).unwrap();
        let mover_id = board0.at(0, 9).unwrap().id; // red rook a0 (file a=0, rank 9)
        let captured_id = board0.at(0, 0).unwrap().id; // black rook a9 (file a=0, rank 0)

        // Not a legal single-ply rook move (the file isn't clear), but the
        // reparse algorithm only looks at the resulting placement, not at
        // how it was reached: the red rook now sits where the black rook
        // used to, and the black rook is simply gone from the position.
        let fen_after_capture = "Rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/1NBAKABNR b - - 0 1";
        let (after, _, _, _) = parse_into_board(fen_after_capture, Some(&board0)).unwrap();

        let rook = after.at(0, 0).unwrap();
        assert_eq!(rook.id, mover_id);
        assert!(after.get(captured_id).is_none());
    }
}
