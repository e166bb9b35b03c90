use crate::chess::{Bitboard, Board, Color, Piece, Rank, Role, Square};

/// The rule set by which a piece moves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Movement {
    /// Standard chess movement, kings may be captured.
    Orthodox,

    /// Queen movement regardless of the piece's role, kings may not be captured.
    Empowered,

    /// Orthodox movement with files wrapping around the board's edge.
    Cylindrical,

    /// A single step in any direction onto a square that touches an enemy piece.
    Adjacent,
}

const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const ROYAL: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// The [`Square`]s the piece on `whence` can reach according to a [`Movement`].
///
/// Stepping onto a friendly piece is never possible, moves are otherwise
/// pseudo-legal, i.e. whether the own king is left exposed is irrelevant.
pub fn destinations(board: &Board, whence: Square, movement: Movement) -> Bitboard {
    let piece = match board[whence] {
        Some(p) => p,
        None => return Bitboard::empty(),
    };

    let rules = Rules {
        board,
        whence,
        color: piece.color(),
        wrapping: movement == Movement::Cylindrical,
        prevent_regicide: movement == Movement::Empowered,
    };

    match movement {
        Movement::Orthodox | Movement::Cylindrical => rules.generate(piece.role()),
        Movement::Empowered => rules.generate(Role::Queen),
        Movement::Adjacent => adjacent(board, whence, piece.color()),
    }
}

/// The [`Piece`] as it lands on `whither`, pawns reaching a back rank become queens.
pub fn promote(piece: Piece, whither: Square) -> Piece {
    if piece.role() == Role::Pawn && whither.rank().is_back_rank() {
        piece.morph(Role::Queen)
    } else {
        piece
    }
}

/// Enemy pieces of `color` that touch `at`.
pub fn stun_targets(board: &Board, at: Square, color: Color) -> Bitboard {
    ROYAL
        .iter()
        .filter_map(|&(df, dr)| at.offset(df, dr))
        .filter(|&sq| matches!(board[sq], Some(p) if p.color() != color))
        .collect()
}

fn adjacent(board: &Board, whence: Square, color: Color) -> Bitboard {
    ROYAL
        .iter()
        .filter_map(|&(df, dr)| whence.offset(df, dr))
        .filter(|&to| board[to].map_or(true, |p| p.color() != color))
        .filter(|&to| !stun_targets(board, to, color).is_empty())
        .collect()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Landing {
    Empty,
    Capture,
    Blocked,
}

struct Rules<'a> {
    board: &'a Board,
    whence: Square,
    color: Color,
    wrapping: bool,
    prevent_regicide: bool,
}

impl Rules<'_> {
    fn generate(&self, role: Role) -> Bitboard {
        match role {
            Role::Pawn => self.pawn(),
            Role::Knight => self.leap(&KNIGHT),
            Role::King => self.leap(&ROYAL),
            Role::Bishop => self.slide(&DIAGONAL),
            Role::Rook => self.slide(&ORTHOGONAL),
            Role::Queen => self.slide(&ROYAL),
        }
    }

    // A wrapping walk may come back around, the origin is never a destination.
    fn step(&self, sq: Square, df: i8, dr: i8) -> Option<Square> {
        let to = if self.wrapping {
            sq.wrapping_offset(df, dr)?
        } else {
            sq.offset(df, dr)?
        };

        (to != self.whence).then_some(to)
    }

    fn landing(&self, to: Square) -> Landing {
        match self.board[to] {
            None => Landing::Empty,
            Some(p) if p.color() == self.color => Landing::Blocked,
            Some(p) if self.prevent_regicide && p.role() == Role::King => Landing::Blocked,
            Some(_) => Landing::Capture,
        }
    }

    fn leap(&self, steps: &[(i8, i8)]) -> Bitboard {
        steps
            .iter()
            .filter_map(|&(df, dr)| self.step(self.whence, df, dr))
            .filter(|&to| self.landing(to) != Landing::Blocked)
            .collect()
    }

    fn slide(&self, directions: &[(i8, i8)]) -> Bitboard {
        let mut reach = Bitboard::empty();

        for &(df, dr) in directions {
            let mut sq = self.whence;
            for _ in 0..8 {
                let to = match self.step(sq, df, dr) {
                    Some(to) => to,
                    None => break,
                };

                match self.landing(to) {
                    Landing::Empty => reach |= to.into(),
                    Landing::Capture => {
                        reach |= to.into();
                        break;
                    }
                    Landing::Blocked => break,
                }

                sq = to;
            }
        }

        reach
    }

    fn pawn(&self) -> Bitboard {
        let forward = self.color.forward();
        let mut reach = Bitboard::empty();

        if let Some(one) = self.whence.offset(0, forward) {
            if self.board[one].is_none() {
                reach |= one.into();

                if self.whence.rank() == Rank::pawns(self.color) {
                    match one.offset(0, forward) {
                        Some(two) if self.board[two].is_none() => reach |= two.into(),
                        _ => {}
                    }
                }
            }
        }

        for df in [1, -1] {
            match self.step(self.whence, df, forward) {
                Some(to) if self.landing(to) == Landing::Capture => reach |= to.into(),
                _ => {}
            }
        }

        reach
    }
}
