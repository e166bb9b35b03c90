use crate::chess::{Bitboard, Board, Color, Fen, Move, MoveKind, Outcome, ParseFenError, Played};
use crate::chess::{Role, Square};
use crate::movegen::{destinations, promote, Movement};
use crate::spell::{Cast, IllegalCast, Spell};
use crate::stun::StunClock;
use derive_more::{Display, Error};
use shakmaty as sm;
use std::{num::NonZeroU32, str::FromStr};
use tracing::{debug, instrument};

/// The reason why a [`Move`] is not allowed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum IllegalMove {
    #[display(fmt = "the game is over")]
    GameOver,
    #[display(fmt = "square `{}` does not hold a piece of the side to move", _0)]
    NotOwned(#[error(not(source))] Square),
    #[display(fmt = "the piece on `{}` is stunned", _0)]
    Stunned(#[error(not(source))] Square),
    #[display(fmt = "move `{}` is illegal in this position", _0)]
    Unreachable(#[error(not(source))] Move),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct Snapshot {
    board: Board,
    halfmoves: u32,
    fullmoves: NonZeroU32,
    stuns: StunClock,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum Ply {
    Move(Move, Snapshot),
    Spell,
}

/// The state of a game in progress.
///
/// Moves are pseudo-legal, there is no notion of check and a side wins
/// by capturing the opposing king.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Game {
    board: Board,
    turn: Color,
    ply: u64,
    halfmoves: u32,
    fullmoves: NonZeroU32,
    stuns: StunClock,
    history: Vec<Ply>,
}

/// The standard initial position.
impl Default for Game {
    fn default() -> Self {
        Game::from(Fen::default())
    }
}

impl Game {
    /// The piece placement.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The number of plies played, used to time stuns.
    pub fn ply(&self) -> u64 {
        self.ply
    }

    /// The number of halfmoves since the last capture, pawn advance or spell.
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// The move number, incremented after every ply by black.
    pub fn fullmoves(&self) -> NonZeroU32 {
        self.fullmoves
    }

    /// Whether the piece on a [`Square`] is stunned.
    pub fn is_stunned(&self, sq: Square) -> bool {
        self.stuns.is_stunned(sq, self.ply)
    }

    /// The squares currently stunned.
    pub fn stunned(&self) -> Bitboard {
        self.stuns.squares(self.ply)
    }

    /// The result of the game, if it has ended.
    ///
    /// Draws are informational, spells can still bring material back to the
    /// board, so only the loss of a king stops the game.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.board.king(Color::White), self.board.king(Color::Black)) {
            (None, None) => Some(Outcome::MutualRegicide),
            (Some(_), None) => Some(Outcome::Regicide(Color::White)),
            (None, Some(_)) => Some(Outcome::Regicide(Color::Black)),
            _ if self.halfmoves >= 100 => Some(Outcome::DrawBy50MoveRule),
            _ if self.is_material_insufficient() => Some(Outcome::DrawByInsufficientMaterial),
            _ => None,
        }
    }

    /// Whether a king has been captured, after which nothing may be played.
    pub fn is_over(&self) -> bool {
        self.board.king(Color::White).is_none() || self.board.king(Color::Black).is_none()
    }

    // Positions shakmaty deems invalid, e.g. with pawns on a back rank, are never drawn.
    fn is_material_insufficient(&self) -> bool {
        let setup = sm::Setup::from(Fen::from(self));
        match setup.position::<sm::Chess>(sm::CastlingMode::Standard) {
            Ok(chess) => sm::Position::is_insufficient_material(&chess),
            Err(_) => false,
        }
    }

    /// The [`Square`]s the piece on `whence` can reach.
    ///
    /// If `ability` names a spell together with its source and the source is
    /// `whence`, the movement the spell grants is used instead of the orthodox one.
    pub fn destinations(&self, whence: Square, ability: Option<(Spell, Square)>) -> Bitboard {
        match self.board[whence] {
            Some(p) if p.color() == self.turn && self.is_stunned(whence) => Bitboard::empty(),
            _ => {
                let movement = match ability {
                    Some((spell, source)) if source == whence => spell.movement(),
                    _ => None,
                };

                destinations(&self.board, whence, movement.unwrap_or(Movement::Orthodox))
            }
        }
    }

    /// Plays a standard [`Move`], pawns reaching the last rank become queens.
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<Played, IllegalMove> {
        if self.is_over() {
            return Err(IllegalMove::GameOver);
        }

        let piece = match self.board[m.whence()] {
            Some(p) if p.color() == self.turn => p,
            _ => return Err(IllegalMove::NotOwned(m.whence())),
        };

        if self.is_stunned(m.whence()) {
            return Err(IllegalMove::Stunned(m.whence()));
        }

        if !destinations(&self.board, m.whence(), Movement::Orthodox).contains(m.whither()) {
            return Err(IllegalMove::Unreachable(m));
        }

        let snapshot = self.snapshot();
        let landing = promote(piece, m.whither());
        let mut kind = MoveKind::empty();

        if landing != piece {
            kind |= MoveKind::PROMOTION;
        }

        self.board.remove(m.whence());
        if let Some(captured) = self.board.put(m.whither(), landing) {
            kind |= MoveKind::CAPTURE;
            if captured.role() == Role::King {
                kind |= MoveKind::REGICIDE;
            }
        }

        if piece.role() == Role::Pawn || kind.contains(MoveKind::CAPTURE) {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        self.history.push(Ply::Move(m, snapshot));
        self.advance();

        let played = Played(piece, m, kind);
        debug!(ply = self.ply, %played, ?kind);
        Ok(played)
    }

    /// Casts a spell on behalf of the side to move.
    ///
    /// Charges are not accounted for here, see [`Match`][`crate::session::Match`].
    #[instrument(level = "debug", skip(self), err)]
    pub fn cast(&mut self, cast: Cast) -> Result<Spell, IllegalCast> {
        if self.is_over() {
            return Err(IllegalCast::GameOver);
        }

        let effect = cast.validate(&self.board, self.turn)?;

        if let Some(source) = cast.source().filter(|&s| self.is_stunned(s)) {
            return Err(IllegalCast::Stunned(source));
        }

        effect.apply(&mut self.board);

        // Stunned through the opponent's next ply, released on the ply after.
        if let Some(sq) = effect.stun() {
            self.stuns.stun(sq, self.ply.saturating_add(2));
        }

        self.halfmoves = 0;
        self.history.push(Ply::Spell);
        self.advance();

        debug!(ply = self.ply, %cast);
        Ok(cast.spell())
    }

    /// Takes back the last ply if it was a standard move, spells cannot be undone.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> Option<Move> {
        match self.history.pop() {
            Some(Ply::Move(m, snapshot)) => {
                self.board = snapshot.board;
                self.halfmoves = snapshot.halfmoves;
                self.fullmoves = snapshot.fullmoves;
                self.stuns = snapshot.stuns;
                self.turn = !self.turn;
                self.ply = self.ply.saturating_sub(1);
                debug!(ply = self.ply, %m, "undone");
                Some(m)
            }

            Some(ply) => {
                self.history.push(ply);
                None
            }

            None => None,
        }
    }

    /// Restores the initial position, releasing every stun.
    pub fn reset(&mut self) {
        *self = Game::default();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
            stuns: self.stuns.clone(),
        }
    }

    fn advance(&mut self) {
        if self.turn == Color::Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }

        self.turn = !self.turn;
        self.ply = self.ply.saturating_add(1);
        self.stuns.prune(self.ply);
    }
}

impl From<&Game> for Fen {
    fn from(game: &Game) -> Self {
        Fen::new(game.board, game.turn, game.halfmoves, game.fullmoves)
    }
}

/// Starts a game from an arbitrary position.
///
/// Stuns are not part of the notation, so none are in effect.
impl From<Fen> for Game {
    fn from(fen: Fen) -> Self {
        let turn = fen.turn();
        let ply = 2 * (u64::from(fen.fullmoves().get()) - 1) + u64::from(turn == Color::Black);

        Game {
            board: fen.board(),
            turn,
            ply,
            halfmoves: fen.halfmoves(),
            fullmoves: fen.fullmoves(),
            stuns: StunClock::default(),
            history: Vec::new(),
        }
    }
}

impl FromStr for Game {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<Fen>()?.into())
    }
}
