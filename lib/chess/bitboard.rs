use crate::chess::Square;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::{fmt, iter::FusedIterator};

/// A set of squares on a chess board.
#[derive(
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    Not,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(transparent)]
pub struct Bitboard(u64);

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sq) in (*self).into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            fmt::Display::fmt(&sq, f)?;
        }

        Ok(())
    }
}

impl Bitboard {
    /// An empty set.
    pub const fn empty() -> Self {
        Bitboard(0)
    }

    /// Whether this set contains no squares.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The number of squares in this set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether a [`Square`] is in this set.
    pub fn contains(&self, sq: Square) -> bool {
        self.0 & (1u64 << sq.index()) != 0
    }

    /// This set with a [`Square`] added.
    pub fn with(self, sq: Square) -> Self {
        Bitboard(self.0 | 1u64 << sq.index())
    }

    /// This set with a [`Square`] removed.
    pub fn without(self, sq: Square) -> Self {
        Bitboard(self.0 & !(1u64 << sq.index()))
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Self {
        Bitboard::empty().with(sq)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::empty(), Bitboard::with)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Self::IntoIter {
        Squares(self.0)
    }
}

/// An iterator over the [`Square`]s in a [`Bitboard`], in index order.
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = Square::ALL[self.0.trailing_zeros() as usize];
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Squares {}
impl FusedIterator for Squares {}
