use crate::chess::Color;
use derive_more::{Display, Error};
use shakmaty as sm;
use std::{ops::Sub, str::FromStr};

/// A row on the chess board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Rank {
    #[display(fmt = "1")]
    First,
    #[display(fmt = "2")]
    Second,
    #[display(fmt = "3")]
    Third,
    #[display(fmt = "4")]
    Fourth,
    #[display(fmt = "5")]
    Fifth,
    #[display(fmt = "6")]
    Sixth,
    #[display(fmt = "7")]
    Seventh,
    #[display(fmt = "8")]
    Eighth,
}

impl Rank {
    /// All ranks ordered by [index][`Rank::index`].
    pub const ALL: [Self; 8] = [
        Rank::First,
        Rank::Second,
        Rank::Third,
        Rank::Fourth,
        Rank::Fifth,
        Rank::Sixth,
        Rank::Seventh,
        Rank::Eighth,
    ];

    /// This rank's index in the range (0..=7).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The rank `i` rows away, if it is on the board.
    pub fn offset(&self, i: i8) -> Option<Self> {
        let r = self.index() as i8 + i;
        (0..8).contains(&r).then(|| Rank::ALL[r as usize])
    }

    /// The rank pawns of a [`Color`] start from.
    pub fn pawns(c: Color) -> Self {
        match c {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        }
    }

    /// Whether this is either the first or the last rank.
    pub fn is_back_rank(&self) -> bool {
        matches!(self, Rank::First | Rank::Eighth)
    }
}

impl Sub for Rank {
    type Output = i8;

    fn sub(self, rhs: Self) -> Self::Output {
        self as i8 - rhs as i8
    }
}

/// The reason why parsing [`Rank`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "failed to parse rank, expected digit in the range `('1'..='8')`")]
pub struct ParseRankError;

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Rank::First),
            "2" => Ok(Rank::Second),
            "3" => Ok(Rank::Third),
            "4" => Ok(Rank::Fourth),
            "5" => Ok(Rank::Fifth),
            "6" => Ok(Rank::Sixth),
            "7" => Ok(Rank::Seventh),
            "8" => Ok(Rank::Eighth),
            _ => Err(ParseRankError),
        }
    }
}

#[doc(hidden)]
impl From<sm::Rank> for Rank {
    fn from(r: sm::Rank) -> Self {
        Rank::ALL[u8::from(r) as usize]
    }
}

#[doc(hidden)]
impl From<Rank> for sm::Rank {
    fn from(r: Rank) -> Self {
        sm::Rank::ALL[r.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn rank_has_an_index(r: Rank) {
        assert_eq!(Rank::ALL[r.index()], r);
    }

    #[proptest]
    fn parsing_printed_rank_is_an_identity(r: Rank) {
        assert_eq!(r.to_string().parse(), Ok(r));
    }

    #[proptest]
    fn parsing_rank_fails_for_digits_out_of_range(#[filter(!('1'..='8').contains(&#c))] c: char) {
        assert_eq!(c.to_string().parse::<Rank>(), Err(ParseRankError));
    }

    #[proptest]
    fn offset_stays_on_the_board(r: Rank, #[strategy(-8i8..=8)] i: i8) {
        match r.offset(i) {
            Some(s) => assert_eq!(s - r, i),
            None => assert!(!(0..8).contains(&(r.index() as i8 + i))),
        }
    }

    #[test]
    fn pawns_start_on_the_second_rank_from_their_side() {
        assert_eq!(Rank::pawns(Color::White), Rank::Second);
        assert_eq!(Rank::pawns(Color::Black), Rank::Seventh);
    }

    #[proptest]
    fn only_the_outermost_ranks_are_back_ranks(r: Rank) {
        assert_eq!(r.is_back_rank(), r == Rank::First || r == Rank::Eighth);
    }

    #[proptest]
    fn rank_has_an_equivalent_shakmaty_representation(r: Rank) {
        assert_eq!(Rank::from(sm::Rank::from(r)), r);
    }
}
