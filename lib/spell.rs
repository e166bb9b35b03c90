use crate::chess::{Board, Color, ParseSquareError, Piece, Rank, Role, Square};
use crate::movegen::{destinations, promote, stun_targets, Movement};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the eight spells that bend the rules of chess.
#[derive(
    Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(into = "String", try_from = "String")]
pub enum Spell {
    /// Places a new pawn in the middle of the board.
    #[display(fmt = "summon")]
    Summon,

    /// Turns a pawn, rook or bishop into a knight.
    #[display(fmt = "transform")]
    Morph,

    /// Slips a pawn, knight or rook one square diagonally.
    #[display(fmt = "slip")]
    MistStep,

    /// Lends a knight, bishop or rook the movement of the queen for one move.
    #[display(fmt = "empower")]
    QueensGrace,

    /// Swaps a piece with an enemy piece of the same kind.
    #[display(fmt = "exchange")]
    Equilibrium,

    /// Moves a piece as if the board's edges were glued together.
    #[display(fmt = "portal")]
    Cylinder,

    /// Trades a piece for a lesser enemy piece.
    #[display(fmt = "sacrifice")]
    BloodPact,

    /// Steps next to an enemy piece and stuns it for a turn.
    #[display(fmt = "cat")]
    CatsHiss,
}

impl Spell {
    pub const ALL: [Self; 8] = [
        Spell::Summon,
        Spell::Morph,
        Spell::MistStep,
        Spell::QueensGrace,
        Spell::Equilibrium,
        Spell::Cylinder,
        Spell::BloodPact,
        Spell::CatsHiss,
    ];

    /// Whether casting requires a source square.
    pub fn is_sourced(&self) -> bool {
        !matches!(self, Spell::Summon | Spell::Morph)
    }

    /// The [`Movement`] granted to the source piece, if this spell relocates it by one.
    pub fn movement(&self) -> Option<Movement> {
        match self {
            Spell::QueensGrace => Some(Movement::Empowered),
            Spell::Cylinder => Some(Movement::Cylindrical),
            Spell::CatsHiss => Some(Movement::Adjacent),
            _ => None,
        }
    }
}

/// The reason why parsing [`Spell`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(
    fmt = "failed to parse spell, expected one of `summon`, `transform`, `slip`, `empower`, `exchange`, `portal`, `sacrifice`, `cat`"
)]
pub struct ParseSpellError;

impl FromStr for Spell {
    type Err = ParseSpellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Spell::ALL
            .into_iter()
            .find(|spell| spell.to_string() == s)
            .ok_or(ParseSpellError)
    }
}

impl TryFrom<String> for Spell {
    type Error = ParseSpellError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Spell> for String {
    fn from(s: Spell) -> Self {
        s.to_string()
    }
}

/// The target of a spell as it travels over the wire.
///
/// Only [`Spell::CatsHiss`] takes the second square, its stun target, written
/// after a comma as in `f4,f5`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(into = "String", try_from = "String")]
pub struct Target(pub Square, pub Option<Square>);

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            None => write!(f, "{}", self.0),
            Some(stun) => write!(f, "{},{}", self.0, stun),
        }
    }
}

impl FromStr for Target {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            None => Ok(Target(s.parse()?, None)),
            Some((sq, stun)) => Ok(Target(sq.parse()?, Some(stun.parse()?))),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = ParseSquareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Target> for String {
    fn from(t: Target) -> Self {
        t.to_string()
    }
}

impl From<Square> for Target {
    fn from(sq: Square) -> Self {
        Target(sq, None)
    }
}

/// A spell together with the squares it acts upon.
///
/// Sourced spells list the source first, then the target.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Cast {
    #[display(fmt = "summon {}", _0)]
    Summon(Square),
    #[display(fmt = "transform {}", _0)]
    Morph(Square),
    #[display(fmt = "slip {} {}", _1, _0)]
    MistStep(Square, Square),
    #[display(fmt = "empower {} {}", _1, _0)]
    QueensGrace(Square, Square),
    #[display(fmt = "exchange {} {}", _1, _0)]
    Equilibrium(Square, Square),
    #[display(fmt = "portal {} {}", _1, _0)]
    Cylinder(Square, Square),
    #[display(fmt = "sacrifice {} {}", _1, _0)]
    BloodPact(Square, Square),
    #[display(fmt = "cat {},{} {}", _1, _2, _0)]
    CatsHiss(Square, Square, Square),
}

/// The reason why a [`Cast`] could not be assembled.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum MalformedCast {
    #[display(fmt = "spell `{}` requires a source square", _0)]
    MissingSource(#[error(not(source))] Spell),
    #[display(fmt = "spell `cat` requires a stun target, as in `f4,f5`")]
    MissingStunTarget,
    #[display(fmt = "spell `{}` takes a single target square", _0)]
    UnexpectedStunTarget(#[error(not(source))] Spell),
}

/// The reason why a [`Cast`] is not allowed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum IllegalCast {
    #[display(fmt = "the game is over")]
    GameOver,
    #[display(fmt = "the piece on `{}` is stunned", _0)]
    Stunned(#[error(not(source))] Square),
    #[display(fmt = "square `{}` does not hold a piece of the side to move", _0)]
    NotOwned(#[error(not(source))] Square),
    #[display(fmt = "the piece on `{}` cannot be the subject of this spell", _0)]
    Ineligible(#[error(not(source))] Square),
    #[display(fmt = "square `{}` is occupied", _0)]
    Occupied(#[error(not(source))] Square),
    #[display(fmt = "square `{}` is outside ranks 3 to 6", _0)]
    OutsideSummoningRanks(#[error(not(source))] Square),
    #[display(fmt = "square `{}` is out of reach", _0)]
    Unreachable(#[error(not(source))] Square),
    #[display(fmt = "square `{}` does not hold a matching enemy piece", _0)]
    InvalidTarget(#[error(not(source))] Square),
    #[display(fmt = "square `{}` does not hold an enemy piece next to the cat", _0)]
    NotStunnable(#[error(not(source))] Square),
}

/// The board mutation a validated [`Cast`] performs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Effect {
    /// Puts a piece on a square, replacing whatever was there.
    Place(Square, Piece),
    /// Lifts the piece off the first square and lands the given piece on the second.
    Relocate(Square, Square, Piece),
    Swap(Square, Square),
    /// Removes the pieces on both squares.
    Banish(Square, Square),
    /// Like [`Effect::Relocate`], stunning the piece on `stun` afterwards.
    Hiss {
        whence: Square,
        whither: Square,
        piece: Piece,
        stun: Square,
    },
}

impl Effect {
    pub fn apply(&self, board: &mut Board) {
        match *self {
            Effect::Place(sq, p) => {
                board.put(sq, p);
            }

            Effect::Relocate(whence, whither, piece)
            | Effect::Hiss {
                whence,
                whither,
                piece,
                ..
            } => {
                board.remove(whence);
                board.put(whither, piece);
            }

            Effect::Swap(a, b) => {
                if let Some(p) = board.remove(a) {
                    if let Some(q) = board.put(b, p) {
                        board.put(a, q);
                    }
                }
            }

            Effect::Banish(a, b) => {
                board.remove(a);
                board.remove(b);
            }
        }
    }

    /// The square to be stunned, if any.
    pub fn stun(&self) -> Option<Square> {
        match *self {
            Effect::Hiss { stun, .. } => Some(stun),
            _ => None,
        }
    }
}

const ANY: [Role; 6] = Role::ALL;

impl Cast {
    /// Assembles a [`Cast`] from a spell, its target and an optional source.
    ///
    /// The source is ignored by spells that take none.
    pub fn new(spell: Spell, target: Target, source: Option<Square>) -> Result<Self, MalformedCast> {
        let Target(whither, stun) = target;
        let source = source.ok_or(MalformedCast::MissingSource(spell));
        let sourced = |c: fn(Square, Square) -> Cast| -> Result<Cast, MalformedCast> {
            Ok(c(source?, whither))
        };

        match (spell, stun) {
            (Spell::Summon, None) => Ok(Cast::Summon(whither)),
            (Spell::Morph, None) => Ok(Cast::Morph(whither)),
            (Spell::MistStep, None) => sourced(Cast::MistStep),
            (Spell::QueensGrace, None) => sourced(Cast::QueensGrace),
            (Spell::Equilibrium, None) => sourced(Cast::Equilibrium),
            (Spell::Cylinder, None) => sourced(Cast::Cylinder),
            (Spell::BloodPact, None) => sourced(Cast::BloodPact),
            (Spell::CatsHiss, Some(stun)) => Ok(Cast::CatsHiss(source?, whither, stun)),
            (Spell::CatsHiss, None) => Err(MalformedCast::MissingStunTarget),
            (s, Some(_)) => Err(MalformedCast::UnexpectedStunTarget(s)),
        }
    }

    /// The [`Spell`] being cast.
    pub fn spell(&self) -> Spell {
        match self {
            Cast::Summon(..) => Spell::Summon,
            Cast::Morph(..) => Spell::Morph,
            Cast::MistStep(..) => Spell::MistStep,
            Cast::QueensGrace(..) => Spell::QueensGrace,
            Cast::Equilibrium(..) => Spell::Equilibrium,
            Cast::Cylinder(..) => Spell::Cylinder,
            Cast::BloodPact(..) => Spell::BloodPact,
            Cast::CatsHiss(..) => Spell::CatsHiss,
        }
    }

    /// The square holding the casting piece, if the spell has one.
    pub fn source(&self) -> Option<Square> {
        match *self {
            Cast::Summon(_) | Cast::Morph(_) => None,
            Cast::MistStep(s, _)
            | Cast::QueensGrace(s, _)
            | Cast::Equilibrium(s, _)
            | Cast::Cylinder(s, _)
            | Cast::BloodPact(s, _)
            | Cast::CatsHiss(s, _, _) => Some(s),
        }
    }

    /// The target as it travels over the wire.
    pub fn target(&self) -> Target {
        match *self {
            Cast::Summon(t)
            | Cast::Morph(t)
            | Cast::MistStep(_, t)
            | Cast::QueensGrace(_, t)
            | Cast::Equilibrium(_, t)
            | Cast::Cylinder(_, t)
            | Cast::BloodPact(_, t) => Target(t, None),
            Cast::CatsHiss(_, t, stun) => Target(t, Some(stun)),
        }
    }

    /// Checks every precondition of this spell when cast by `color`.
    ///
    /// The board is left untouched, the returned [`Effect`] performs the mutation.
    pub fn validate(&self, board: &Board, color: Color) -> Result<Effect, IllegalCast> {
        use IllegalCast::*;

        let own = |sq: Square, roles: &[Role]| match board[sq] {
            Some(p) if p.color() == color && roles.contains(&p.role()) => Ok(p),
            Some(p) if p.color() == color => Err(Ineligible(sq)),
            _ => Err(NotOwned(sq)),
        };

        let enemy = |sq: Square, roles: &[Role]| match board[sq] {
            Some(p) if p.color() != color && roles.contains(&p.role()) => Ok(p),
            _ => Err(InvalidTarget(sq)),
        };

        let reach = |whence: Square, whither: Square, movement: Movement| {
            if destinations(board, whence, movement).contains(whither) {
                Ok(())
            } else {
                Err(Unreachable(whither))
            }
        };

        match *self {
            Cast::Summon(t) => {
                if board[t].is_some() {
                    Err(Occupied(t))
                } else if !(Rank::Third..=Rank::Sixth).contains(&t.rank()) {
                    Err(OutsideSummoningRanks(t))
                } else {
                    Ok(Effect::Place(t, Piece(color, Role::Pawn)))
                }
            }

            Cast::Morph(t) => {
                let p = own(t, &[Role::Pawn, Role::Rook, Role::Bishop])?;
                Ok(Effect::Place(t, p.morph(Role::Knight)))
            }

            Cast::MistStep(s, t) => {
                let p = own(s, &[Role::Pawn, Role::Knight, Role::Rook])?;
                if board[t].is_some() {
                    Err(Occupied(t))
                } else if !s.is_diagonally_adjacent(t) {
                    Err(Unreachable(t))
                } else {
                    Ok(Effect::Relocate(s, t, p))
                }
            }

            Cast::QueensGrace(s, t) => {
                let p = own(s, &[Role::Knight, Role::Bishop, Role::Rook])?;
                reach(s, t, Movement::Empowered)?;
                Ok(Effect::Relocate(s, t, p))
            }

            Cast::Equilibrium(s, t) => {
                let p = own(s, &[Role::Rook, Role::Knight, Role::Bishop, Role::Queen])?;
                enemy(t, &[p.role()])?;
                Ok(Effect::Swap(s, t))
            }

            Cast::Cylinder(s, t) => {
                let p = own(s, &ANY)?;
                reach(s, t, Movement::Cylindrical)?;
                Ok(Effect::Relocate(s, t, promote(p, t)))
            }

            Cast::BloodPact(s, t) => {
                let p = own(s, &[Role::Queen, Role::Rook, Role::Bishop, Role::Knight])?;
                let prey: &[Role] = match p.role() {
                    Role::Queen => &[Role::Rook, Role::Bishop, Role::Knight, Role::Pawn],
                    Role::Rook => &[Role::Bishop, Role::Knight, Role::Pawn],
                    Role::Bishop => &[Role::Knight, Role::Pawn],
                    _ => &[Role::Pawn],
                };

                enemy(t, prey)?;
                Ok(Effect::Banish(s, t))
            }

            Cast::CatsHiss(s, t, stun) => {
                let p = own(s, &ANY)?;
                reach(s, t, Movement::Adjacent)?;
                if !stun_targets(board, t, color).contains(stun) {
                    return Err(NotStunnable(stun));
                }

                Ok(Effect::Hiss {
                    whence: s,
                    whither: t,
                    piece: promote(p, t),
                    stun,
                })
            }
        }
    }
}
