//! Side to move / piece ownership.
//!
//! Grounded on the teacher's `Player` enum (`other`, `from_usize`, `COUNT`);
//! renamed to `Color` to match the domain vocabulary in spec §3 ("color ∈
//! {red, black}"). The compile-time `ColorTr`/`WhiteS`/`BlackS` marker-type
//! trick is dropped along with the generic bitboard `PieceSet<Color>` it
//! existed to parametrize (see DESIGN.md).

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub const COUNT: usize = 2;

    pub const fn other(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    pub fn from_usize(x: usize) -> Color {
        match x {
            0 => Color::Red,
            1 => Color::Black,
            _ => panic!("unknown color index {x}"),
        }
    }

    /// Rank of this side's back row in internal coordinates (file 0 = 'a',
    /// rank 0 = black's back row / top, rank 9 = red's back row / bottom).
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::Red => 9,
            Color::Black => 0,
        }
    }

    /// Palace ranks (inclusive) for this side, per spec §3.
    pub const fn palace_ranks(self) -> (u8, u8) {
        match self {
            Color::Red => (7, 9),
            Color::Black => (0, 2),
        }
    }

    /// UCI turn-field letter: 'w' = red, 'b' = black (spec §6.1).
    pub const fn uci_letter(self) -> char {
        match self {
            Color::Red => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_uci_letter(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}
