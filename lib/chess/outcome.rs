use crate::chess::Color;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One of the possible outcomes of a game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    #[display(fmt = "the {} player captured the opposing king", _0)]
    Regicide(Color),

    /// Both kings left the board, no winner can be determined.
    #[display(fmt = "both kings were captured")]
    MutualRegicide,

    #[display(fmt = "draw by insufficient material")]
    DrawByInsufficientMaterial,

    #[display(fmt = "draw by the 50-move rule")]
    DrawBy50MoveRule,
}

impl Outcome {
    /// Whether the outcome is a draw and neither side has won.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Outcome::DrawByInsufficientMaterial | Outcome::DrawBy50MoveRule
        )
    }

    /// Whether the outcome is decisive and one of the sides has won.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Outcome::Regicide(_))
    }

    /// Whether the game ended in a state that has no defined result.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Outcome::MutualRegicide)
    }

    /// The winning side, if the outcome is [decisive](`Self::is_decisive`).
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Regicide(c) => Some(c),
            _ => None,
        }
    }

    /// The result reported to whoever settles the game, if one is defined.
    pub fn result(&self) -> Option<GameResult> {
        match *self {
            Outcome::Regicide(Color::White) => Some(GameResult::White),
            Outcome::Regicide(Color::Black) => Some(GameResult::Black),
            Outcome::DrawByInsufficientMaterial | Outcome::DrawBy50MoveRule => {
                Some(GameResult::Draw)
            }
            Outcome::MutualRegicide => None,
        }
    }
}

/// The result of a game, as consumed by outer layers.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "black")]
    Black,
    #[display(fmt = "draw")]
    Draw,
}
