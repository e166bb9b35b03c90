use crate::chess::{Bitboard, Color, File, Piece, Rank, Role, Square};
use shakmaty as sm;
use std::{fmt, ops::Index};

/// The piece placement on the board.
///
/// This type does not validate whether the placement it holds is reachable
/// according to any set of chess rules, a board may even lack kings.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

// We provide a custom implementation of Arbitrary rather than deriving,
// proptest only implements Arbitrary for small arrays.
#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Board {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::{collection::vec, prelude::*};

        vec(any::<Option<Piece>>(), 64)
            .prop_map(|v| {
                let mut board = Board::empty();
                board.squares.iter_mut().zip(v).for_each(|(s, p)| *s = p);
                board
            })
            .boxed()
    }
}

impl Default for Board {
    /// The standard initial position.
    fn default() -> Self {
        use Role::*;

        let mut board = Board::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (f, r) in File::ALL.into_iter().zip(back) {
            board.put(Square::new(f, Rank::First), Piece(Color::White, r));
            board.put(Square::new(f, Rank::Second), Piece(Color::White, Pawn));
            board.put(Square::new(f, Rank::Seventh), Piece(Color::Black, Pawn));
            board.put(Square::new(f, Rank::Eighth), Piece(Color::Black, r));
        }

        board
    }
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Places a [`Piece`] on a [`Square`], returning whatever was there before.
    pub fn put(&mut self, sq: Square, p: Piece) -> Option<Piece> {
        self.squares[sq.index()].replace(p)
    }

    /// Removes the [`Piece`] on a [`Square`], if any.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// An iterator over all pieces on the board, in square order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(|sq| self[sq].map(|p| (sq, p)))
    }

    /// [`Square`]s occupied by any piece.
    pub fn occupied(&self) -> Bitboard {
        self.iter().map(|(sq, _)| sq).collect()
    }

    /// [`Square`]s occupied by pieces of a [`Color`].
    pub fn by_color(&self, c: Color) -> Bitboard {
        self.iter()
            .filter(|(_, p)| p.color() == c)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// The [`Square`] occupied by the king of a [`Color`], if it is still on the board.
    pub fn king(&self, c: Color) -> Option<Square> {
        self.iter()
            .find(|&(_, p)| p == Piece(c, Role::King))
            .map(|(sq, _)| sq)
    }
}

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.index()]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", sm::Board::from(*self))
    }
}

/// Draws the board from white's point of view.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for file in File::ALL {
            write!(f, "  {} ", file)?;
        }

        writeln!(f)?;
        writeln!(f, "   +---+---+---+---+---+---+---+---+")?;

        for rank in Rank::ALL.into_iter().rev() {
            write!(f, " {} |", rank)?;

            for file in File::ALL {
                match self[Square::new(file, rank)] {
                    Some(p) => write!(f, " {} |", p)?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {}", rank)?;
            writeln!(f, "   +---+---+---+---+---+---+---+---+")?;
        }

        write!(f, "   ")?;
        for file in File::ALL {
            write!(f, "  {} ", file)?;
        }

        Ok(())
    }
}

#[doc(hidden)]
impl From<sm::Board> for Board {
    fn from(b: sm::Board) -> Self {
        let mut board = Board::empty();

        for sq in b.occupied() {
            if let Some(p) = b.piece_at(sq) {
                board.put(sq.into(), p.into());
            }
        }

        board
    }
}

#[doc(hidden)]
impl From<Board> for sm::Board {
    fn from(b: Board) -> Self {
        b.iter()
            .map(|(sq, p)| (sm::Square::from(sq), sm::Piece::from(p)))
            .collect()
    }
}
