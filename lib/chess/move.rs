use crate::chess::{ParseSquareError, Piece, Square};
use bitflags::bitflags;
use derive_more::{Display, Error, From};
use std::str::FromStr;

/// A chess move in pure coordinate notation.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[display(fmt = "{}{}", _0, _1)]
pub struct Move(pub Square, pub Square);

impl Move {
    /// The source [`Square`].
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    pub fn whither(&self) -> Square {
        self.1
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error, From)]
pub enum ParseMoveError {
    #[display(fmt = "failed to parse move, expected pure coordinate notation like `e2e4`")]
    InvalidLength,
    #[display(fmt = "failed to parse move, {}", _0)]
    InvalidSquare(ParseSquareError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match (s.get(..2), s.get(2..)) {
            (Some(whence), Some(whither)) if s.len() == 4 => {
                Ok(Move(whence.parse()?, whither.parse()?))
            }

            _ => Err(ParseMoveError::InvalidLength),
        }
    }
}

bitflags! {
    /// Characteristics of a played [`Move`].
    #[derive(Default)]
    pub struct MoveKind: u8 {
        const CAPTURE =     0b00000001;
        const PROMOTION =   0b00000010;
        const REGICIDE =    0b00000100;
    }
}

/// The metadata of a [`Move`] that was played.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[display(fmt = "{}", _1)]
pub struct Played(pub Piece, pub Move, pub MoveKind);

impl Played {
    /// The [`Piece`] that moved, as it was before any promotion.
    pub fn mover(&self) -> Piece {
        self.0
    }

    /// The source [`Square`].
    pub fn whence(&self) -> Square {
        self.1.whence()
    }

    /// The destination [`Square`].
    pub fn whither(&self) -> Square {
        self.1.whither()
    }

    /// The characteristics of the move.
    pub fn kind(&self) -> MoveKind {
        self.2
    }

    /// Whether an enemy piece was taken.
    pub fn is_capture(&self) -> bool {
        self.2.contains(MoveKind::CAPTURE)
    }
}
