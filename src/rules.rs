//! Interface between the Ban Chess layer and the chess rules implementation.
//!
//! The ply state machine in [`crate::game`] never looks at the board directly:
//! everything it needs (legal moves of a side, check detection, applying a
//! move) goes through [`Rules`]. [`ShakmatyRules`] is the implementation backed
//! by [shakmaty].
//!
//! [shakmaty]: https://docs.rs/shakmaty

use std::fmt;
use std::ops::Not;

use anyhow::{anyhow, bail};
use arrayvec::ArrayVec;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, FromSetup, Position};

/// Upper bound on the number of legal moves in any reachable chess position
/// (the known maximum is 218).
pub const MAX_MOVES: usize = 256;

/// Legal moves of a single side. The order is whatever the move generator
/// produced and carries no meaning.
pub type MoveList<M> = ArrayVec<M, MAX_MOVES>;

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::White => 'w',
                Self::Black => 'b',
            }
        )
    }
}

impl From<Color> for Player {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::White => Self::White,
            Player::Black => Self::Black,
        }
    }
}

/// Chess rules the Ban Chess layer is built on.
///
/// Every query takes the side explicitly instead of relying on the position's
/// own notion of whose turn it is. This is what allows asking for the
/// opponent's moves during a ban phase without touching the real game state.
///
/// Failures are reported as [`anyhow::Error`] and are propagated by the callers
/// untouched.
pub trait Rules {
    /// Board state, including whose turn it is under normal chess rules.
    type Position: Clone + fmt::Debug;
    /// Move representation. Equality is move identity: a ban removes exactly
    /// the moves equal to it.
    type Move: Clone + Eq + fmt::Debug;

    /// The player to move according to the chess rules (not the Ban Chess
    /// phase).
    fn side_to_move(&self, position: &Self::Position) -> Player;

    /// Legal moves of `side` on the current board, as if it was `side`'s turn.
    ///
    /// # Errors
    ///
    /// Fails when the board can not be presented with `side` to move.
    fn legal_moves(
        &self,
        position: &Self::Position,
        side: Player,
    ) -> anyhow::Result<MoveList<Self::Move>>;

    /// Whether the king of `side` is attacked.
    ///
    /// # Errors
    ///
    /// Fails when `side` has no king on the board.
    fn in_check(&self, position: &Self::Position, side: Player) -> anyhow::Result<bool>;

    /// Plays a move for the side to move and returns the new position together
    /// with the player who moves next.
    ///
    /// # Errors
    ///
    /// Fails when the move is not legal in the position.
    fn apply_move(
        &self,
        position: &Self::Position,
        next_move: &Self::Move,
    ) -> anyhow::Result<(Self::Position, Player)>;

    /// Parses a move of `side` in UCI notation.
    ///
    /// # Errors
    ///
    /// Fails when the input is not valid UCI or does not describe a legal move
    /// of `side`.
    fn parse_move(
        &self,
        position: &Self::Position,
        side: Player,
        input: &str,
    ) -> anyhow::Result<Self::Move>;

    /// Serializes a move in UCI notation.
    fn move_to_uci(&self, next_move: &Self::Move) -> String;

    /// Serializes the position in FEN.
    fn fen(&self, position: &Self::Position) -> String;
}

/// [`Rules`] backed by [`shakmaty::Chess`] with standard castling notation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    /// Parses a position from FEN.
    ///
    /// # Errors
    ///
    /// Fails when the FEN is malformed or describes an illegal position.
    pub fn position_from_fen(input: &str) -> anyhow::Result<Chess> {
        let fen: Fen = input
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid FEN '{input}': {e}"))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|e| anyhow!("illegal position '{input}': {e}"))
    }

    /// Returns a copy of `position` with only the side to move changed. The
    /// copy is meant to be queried and dropped within a single call.
    ///
    /// En passant is cleared because the capture right belongs to the player
    /// who was to move.
    ///
    /// The game itself never needs it: bans always target the position's own
    /// side to move. It serves [`Rules`] callers asking about the other side,
    /// e.g. listing or parsing the moves of the player who is not to move.
    fn flipped(position: &Chess) -> anyhow::Result<Chess> {
        let mut setup = position.clone().into_setup(EnPassantMode::Legal);
        setup.turn = !setup.turn;
        setup.ep_square = None;
        Chess::from_setup(setup, CastlingMode::Standard)
            .map_err(|e| anyhow!("can not pass the turn to the opponent: {e}"))
    }
}

impl Rules for ShakmatyRules {
    type Move = shakmaty::Move;
    type Position = Chess;

    fn side_to_move(&self, position: &Chess) -> Player {
        position.turn().into()
    }

    fn legal_moves(&self, position: &Chess, side: Player) -> anyhow::Result<MoveList<Self::Move>> {
        if self.side_to_move(position) == side {
            return Ok(position.legal_moves().into_iter().collect());
        }
        let view = Self::flipped(position)?;
        Ok(view.legal_moves().into_iter().collect())
    }

    fn in_check(&self, position: &Chess, side: Player) -> anyhow::Result<bool> {
        let color = Color::from(side);
        let Some(king) = position.board().king_of(color) else {
            bail!("{side} has no king");
        };
        Ok(position
            .king_attackers(king, !color, position.board().occupied())
            .any())
    }

    fn apply_move(
        &self,
        position: &Chess,
        next_move: &Self::Move,
    ) -> anyhow::Result<(Chess, Player)> {
        let next = position
            .clone()
            .play(next_move)
            .map_err(|e| anyhow!("can not play {}: {e}", self.move_to_uci(next_move)))?;
        let next_player = next.turn().into();
        Ok((next, next_player))
    }

    fn parse_move(&self, position: &Chess, side: Player, input: &str) -> anyhow::Result<Self::Move> {
        let uci: UciMove = input
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid UCI move '{input}': {e}"))?;
        let parsed = if self.side_to_move(position) == side {
            uci.to_move(position)
        } else {
            uci.to_move(&Self::flipped(position)?)
        };
        parsed.map_err(|e| anyhow!("'{input}' is not a legal move for {side}: {e}"))
    }

    fn move_to_uci(&self, next_move: &Self::Move) -> String {
        next_move.to_uci(CastlingMode::Standard).to_string()
    }

    fn fen(&self, position: &Chess) -> String {
        Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
    }
}
