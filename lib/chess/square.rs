use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use shakmaty as sm;
use std::{fmt, str::FromStr};

/// A square on the chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(into = "String", try_from = "String")]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// All squares ordered by [index][`Square::index`], rank by rank.
    #[rustfmt::skip]
    pub const ALL: [Self; 64] = {
        use Square::*;
        [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ]
    };

    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    pub fn new(f: File, r: Rank) -> Self {
        Square::ALL[r.index() * 8 + f.index()]
    }

    /// This square's index in the range (0..=63).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// This square's [`File`].
    pub fn file(&self) -> File {
        File::ALL[self.index() % 8]
    }

    /// This square's [`Rank`].
    pub fn rank(&self) -> Rank {
        Rank::ALL[self.index() / 8]
    }

    /// The square reached by stepping `df` files and `dr` ranks, if it is on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        Some(Square::new(self.file().offset(df)?, self.rank().offset(dr)?))
    }

    /// Like [`Square::offset`], except files wrap around the board's edge.
    ///
    /// Only stepping off the first or last rank leaves the board.
    pub fn wrapping_offset(&self, df: i8, dr: i8) -> Option<Self> {
        let rank = self.rank().offset(dr)?;
        Some(Square::new(self.file().wrapping_offset(df), rank))
    }

    /// Whether two squares touch each other, including diagonally.
    pub fn is_adjacent(&self, other: Square) -> bool {
        let df = (self.file() - other.file()).abs();
        let dr = (self.rank() - other.rank()).abs();
        df.max(dr) == 1
    }

    /// Whether two squares touch each other diagonally.
    pub fn is_diagonally_adjacent(&self, other: Square) -> bool {
        (self.file() - other.file()).abs() == 1 && (self.rank() - other.rank()).abs() == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file(), f)?;
        fmt::Display::fmt(&self.rank(), f)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error, From)]
pub enum ParseSquareError {
    #[display(fmt = "failed to parse square, {}", _0)]
    InvalidFile(ParseFileError),
    #[display(fmt = "failed to parse square, {}", _0)]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}

impl TryFrom<String> for Square {
    type Error = ParseSquareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

#[doc(hidden)]
impl From<sm::Square> for Square {
    fn from(sq: sm::Square) -> Self {
        Square::new(sq.file().into(), sq.rank().into())
    }
}

#[doc(hidden)]
impl From<Square> for sm::Square {
    fn from(sq: Square) -> Self {
        sm::Square::from_coords(sq.file().into(), sq.rank().into())
    }
}
