use crate::chess::{Board, Color};
use derive_more::{DebugCustom, Display, Error};
use shakmaty as sm;
use std::{num::NonZeroU32, str::FromStr};

/// A representation of the [Forsyth–Edwards Notation].
///
/// Only the piece placement, the side to move and the move counters are
/// meaningful, the variant has neither castling nor en passant, so both
/// fields are always `-`.
///
/// [Forsyth–Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(DebugCustom, Display, Clone, Eq, PartialEq, Hash)]
#[debug(fmt = "Fen(\"{}\")", self)]
#[display(fmt = "{}", _0)]
pub struct Fen(sm::fen::Fen);

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Fen {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Fen>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        (any::<Board>(), any::<Color>(), 0u32..150, 1u32..500)
            .prop_map(|(board, turn, halfmoves, fullmoves)| {
                let fullmoves = NonZeroU32::new(fullmoves).unwrap_or(NonZeroU32::MIN);
                Fen::new(board, turn, halfmoves, fullmoves)
            })
            .boxed()
    }
}

impl Fen {
    /// Constructs [`Fen`] from its meaningful fields.
    pub fn new(board: Board, turn: Color, halfmoves: u32, fullmoves: NonZeroU32) -> Self {
        Fen(sm::fen::Fen(sm::Setup {
            board: board.into(),
            turn: turn.into(),
            castling_rights: sm::Bitboard(0),
            ep_square: None,
            halfmoves,
            fullmoves,
            ..Default::default()
        }))
    }

    /// The piece placement.
    pub fn board(&self) -> Board {
        self.setup().board.clone().into()
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.setup().turn.into()
    }

    /// The number of halfmoves since the last capture or pawn advance.
    pub fn halfmoves(&self) -> u32 {
        self.setup().halfmoves
    }

    /// The move number, starting at 1 and incremented after every move by black.
    pub fn fullmoves(&self) -> NonZeroU32 {
        self.setup().fullmoves
    }

    fn setup(&self) -> &sm::Setup {
        &(self.0).0
    }
}

/// The initial position.
impl Default for Fen {
    fn default() -> Self {
        Fen::new(Board::default(), Color::White, 0, NonZeroU32::MIN)
    }
}

/// The reason why the string is not valid FEN.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum ParseFenError {
    #[display(fmt = "syntax error at the piece placement field")]
    InvalidPlacement,
    #[display(fmt = "syntax error at the side to move field")]
    InvalidTurn,
    #[display(fmt = "syntax error at the castling rights field")]
    InvalidCastlingRights,
    #[display(fmt = "syntax error at the en passant square field")]
    InvalidEnPassantSquare,
    #[display(fmt = "syntax error at the halfmove clock field")]
    InvalidHalfmoveClock,
    #[display(fmt = "syntax error at the fullmove counter field")]
    InvalidFullmoves,
    #[display(fmt = "unspecified syntax error")]
    InvalidSyntax,
}

#[doc(hidden)]
impl From<sm::fen::ParseFenError> for ParseFenError {
    fn from(e: sm::fen::ParseFenError) -> Self {
        use ParseFenError::*;
        match e {
            sm::fen::ParseFenError::InvalidBoard => InvalidPlacement,
            sm::fen::ParseFenError::InvalidTurn => InvalidTurn,
            sm::fen::ParseFenError::InvalidCastling => InvalidCastlingRights,
            sm::fen::ParseFenError::InvalidEpSquare => InvalidEnPassantSquare,
            sm::fen::ParseFenError::InvalidHalfmoveClock => InvalidHalfmoveClock,
            sm::fen::ParseFenError::InvalidFullmoves => InvalidFullmoves,
            _ => InvalidSyntax,
        }
    }
}

/// Parses any syntactically valid FEN, dropping castling rights and en passant.
impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fen = Fen(s.parse()?);
        Ok(Fen::new(
            fen.board(),
            fen.turn(),
            fen.halfmoves(),
            fen.fullmoves(),
        ))
    }
}

#[doc(hidden)]
impl From<Fen> for sm::Setup {
    fn from(fen: Fen) -> Self {
        (fen.0).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Piece, Role, Square};
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_fen_is_an_identity(fen: Fen) {
        assert_eq!(fen.to_string().parse(), Ok(fen));
    }

    #[proptest]
    fn fen_preserves_its_fields(
        b: Board,
        c: Color,
        #[strategy(0u32..150)] halfmoves: u32,
        #[strategy(1u32..500)] fullmoves: u32,
    ) {
        let fullmoves = NonZeroU32::new(fullmoves).unwrap();
        let fen = Fen::new(b, c, halfmoves, fullmoves);
        assert_eq!(fen.board(), b);
        assert_eq!(fen.turn(), c);
        assert_eq!(fen.halfmoves(), halfmoves);
        assert_eq!(fen.fullmoves(), fullmoves);
    }

    #[proptest]
    fn parsing_invalid_fen_fails(
        #[by_ref] fen: Fen,
        #[strategy(..=#fen.to_string().len())] n: usize,
        #[strategy("[^[:ascii:]]+")] r: String,
    ) {
        assert!([&fen.to_string()[..n], &r].concat().parse::<Fen>().is_err());
    }

    #[test]
    fn default_fen_is_the_initial_position_without_castling_rights() {
        assert_eq!(
            Fen::default().to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn parsing_drops_castling_rights_and_en_passant() -> Result<(), ParseFenError> {
        let fen: Fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".parse()?;
        assert_eq!(
            fen.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
        );
        Ok(())
    }

    #[test]
    fn positions_without_kings_can_be_parsed() -> Result<(), ParseFenError> {
        let fen: Fen = "8/8/8/8/4Q3/8/8/8 w - - 0 1".parse()?;
        assert_eq!(fen.board()[Square::E4], Some(Piece(Color::White, Role::Queen)));
        assert_eq!(fen.board().king(Color::White), None);
        Ok(())
    }
}
