//! Ban Chess ply state machine.
//!
//! A traditional chess move is split into two plies: first the opponent of the
//! player to move bans one of that player's legal moves, then the player moves
//! with the banned move unavailable. The plies are counted from 1, so odd plies
//! are bans and even plies are moves.
//!
//! The board never changes during a ban ply and neither does the side to move
//! under regular chess rules. What changes is the player who *acts*: during a
//! ban ply it is the opponent of [`Game::side_to_move`].

use std::error::Error;
use std::fmt;

use shakmaty::Chess;

use crate::config::Config;
use crate::rules::{MoveList, Player, Rules, ShakmatyRules};

/// Ply index of the first action of every game.
pub const FIRST_PLY: u32 = 1;

/// Sub-phase of a traditional chess move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The acting player forbids one of the opponent's legal moves.
    Ban,
    /// The acting player moves, avoiding the banned move.
    Move,
}

impl Phase {
    /// Phase of the given (1-indexed) Ban Chess ply: odd plies are bans, even
    /// plies are moves.
    #[must_use]
    pub const fn from_ply(ply: u32) -> Self {
        if ply % 2 == 1 {
            Self::Ban
        } else {
            Self::Move
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ban => "ban",
            Self::Move => "move",
        })
    }
}

/// Whether the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalStatus {
    #[allow(missing_docs)]
    Ongoing,
    /// The side to move has no way out of check. During a ban phase this also
    /// covers the case when it has exactly one way out: the acting player bans
    /// it.
    Checkmate,
    /// The side to move has no legal moves and is not in check.
    Stalemate,
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ongoing => "ongoing",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        })
    }
}

/// A successfully applied ply.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action<M> {
    Ban(M),
    Move(M),
}

impl<M> Action<M> {
    /// Wraps a move into the action expected in the given phase.
    #[must_use]
    pub const fn for_phase(phase: Phase, chess_move: M) -> Self {
        match phase {
            Phase::Ban => Self::Ban(chess_move),
            Phase::Move => Self::Move(chess_move),
        }
    }

    /// The move being banned or played.
    #[must_use]
    pub const fn chess_move(&self) -> &M {
        match self {
            Self::Ban(chess_move) | Self::Move(chess_move) => chess_move,
        }
    }
}

/// Rejection of [`Game::submit_ban`]. The game is left untouched.
#[derive(Debug)]
pub enum BanError {
    /// The game is in a move phase.
    InvalidPhase,
    /// The move is not legal for the player whose move is being banned.
    IllegalBan(String),
    /// The chess rules implementation failed.
    Engine(anyhow::Error),
}

impl fmt::Display for BanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhase => write!(f, "can not ban during a move phase"),
            Self::IllegalBan(banned) => {
                write!(f, "can not ban {banned}: it is not a legal move of the opponent")
            },
            Self::Engine(e) => write!(f, "chess rules failure: {e}"),
        }
    }
}

impl Error for BanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(e) => Some(&**e),
            _ => None,
        }
    }
}

/// Rejection of [`Game::submit_move`]. The game is left untouched.
#[derive(Debug)]
pub enum MoveError {
    /// The game is in a ban phase.
    InvalidPhase,
    /// The move is either illegal or banned.
    IllegalMove(String),
    /// The chess rules implementation failed.
    Engine(anyhow::Error),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhase => write!(f, "can not move during a ban phase"),
            Self::IllegalMove(played) => {
                write!(f, "can not play {played}: it is illegal or banned")
            },
            Self::Engine(e) => write!(f, "chess rules failure: {e}"),
        }
    }
}

impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(e) => Some(&**e),
            _ => None,
        }
    }
}

/// State of a single Ban Chess game.
///
/// The state is only changed by [`Game::submit_ban`] and [`Game::submit_move`]
/// (and [`Game::submit`]/[`Game::play_uci`] which dispatch to them). Both
/// either apply all of their effects or none.
#[derive(Clone, Debug)]
pub struct Game<R: Rules = ShakmatyRules> {
    rules: R,
    config: Config,
    position: R::Position,
    side_to_move: Player,
    ply: u32,
    banned_move: Option<R::Move>,
    history: Vec<Action<R::Move>>,
}

impl Game {
    /// Creates a game from the standard starting position.
    #[must_use]
    pub fn starting(config: Config) -> Self {
        Self::new(ShakmatyRules, config, Chess::default())
    }

    /// Creates a game from a position in FEN. The first ply is a ban of the
    /// moves of the side to move in the FEN.
    ///
    /// # Errors
    ///
    /// Fails when the FEN is malformed or describes an illegal position.
    pub fn from_fen(config: Config, fen: &str) -> anyhow::Result<Self> {
        Ok(Self::new(
            ShakmatyRules,
            config,
            ShakmatyRules::position_from_fen(fen)?,
        ))
    }
}

impl<R: Rules> Game<R> {
    /// Starts a game at ply 1 with no active ban.
    #[must_use]
    pub fn new(rules: R, config: Config, position: R::Position) -> Self {
        let side_to_move = rules.side_to_move(&position);
        Self {
            rules,
            config,
            position,
            side_to_move,
            ply: FIRST_PLY,
            banned_move: None,
            history: Vec::new(),
        }
    }

    /// Current ply, starting from 1.
    #[must_use]
    pub const fn ply(&self) -> u32 {
        self.ply
    }

    /// Phase of the current ply. Derived from the ply counter parity in Ban
    /// Chess, always [`Phase::Move`] in standard chess.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.config.bans_enabled() {
            Phase::from_ply(self.ply)
        } else {
            Phase::Move
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_ban_phase(&self) -> bool {
        matches!(self.phase(), Phase::Ban)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_move_phase(&self) -> bool {
        matches!(self.phase(), Phase::Move)
    }

    /// The move forbidden for the current move phase, if any.
    #[must_use]
    pub const fn banned_move(&self) -> Option<&R::Move> {
        self.banned_move.as_ref()
    }

    /// Player to move under regular chess rules. Bans do not change it.
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Player who acts in the current ply: the banning player (opponent of the
    /// side to move) in a ban phase and the side to move in a move phase.
    #[must_use]
    pub fn actor(&self) -> Player {
        match self.phase() {
            Phase::Ban => !self.side_to_move,
            Phase::Move => self.side_to_move,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &R::Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rules(&self) -> &R {
        &self.rules
    }

    /// Successful actions since the start of the game, in order.
    #[must_use]
    pub fn history(&self) -> &[Action<R::Move>] {
        &self.history
    }

    /// Moves the acting player can choose from in the current ply.
    ///
    /// - Ban phase: the legal moves of the side about to move, i.e. the moves
    ///   the acting player may ban.
    /// - Move phase: the legal moves of the side to move without the banned
    ///   move.
    ///
    /// # Errors
    ///
    /// Propagates move generation failures of the rules implementation.
    pub fn legal_candidates(&self) -> anyhow::Result<MoveList<R::Move>> {
        let mut moves = self.rules.legal_moves(&self.position, self.side_to_move)?;
        if let Some(banned) = &self.banned_move {
            moves.retain(|candidate| candidate != banned);
        }
        Ok(moves)
    }

    /// Forbids `banned` for the upcoming move phase.
    ///
    /// # Errors
    ///
    /// [`BanError::InvalidPhase`] outside of a ban phase and
    /// [`BanError::IllegalBan`] if the side about to move can not play
    /// `banned` anyway.
    pub fn submit_ban(&mut self, banned: R::Move) -> Result<(), BanError> {
        if !self.is_ban_phase() {
            return Err(BanError::InvalidPhase);
        }
        let candidates = self.legal_candidates().map_err(BanError::Engine)?;
        if !candidates.contains(&banned) {
            return Err(BanError::IllegalBan(self.rules.move_to_uci(&banned)));
        }
        self.banned_move = Some(banned.clone());
        self.history.push(Action::Ban(banned));
        self.ply += 1;
        Ok(())
    }

    /// Plays `next_move` for the side to move and lifts the ban.
    ///
    /// # Errors
    ///
    /// [`MoveError::InvalidPhase`] outside of a move phase and
    /// [`MoveError::IllegalMove`] if the move is illegal or banned.
    pub fn submit_move(&mut self, next_move: R::Move) -> Result<(), MoveError> {
        if !self.is_move_phase() {
            return Err(MoveError::InvalidPhase);
        }
        let candidates = self.legal_candidates().map_err(MoveError::Engine)?;
        if !candidates.contains(&next_move) {
            return Err(MoveError::IllegalMove(self.rules.move_to_uci(&next_move)));
        }
        let (position, side_to_move) = self
            .rules
            .apply_move(&self.position, &next_move)
            .map_err(MoveError::Engine)?;
        self.position = position;
        self.side_to_move = side_to_move;
        self.banned_move = None;
        self.history.push(Action::Move(next_move));
        self.ply += 1;
        Ok(())
    }

    /// Dispatches to [`Game::submit_ban`] or [`Game::submit_move`].
    ///
    /// # Errors
    ///
    /// Forwards the rejection of the dispatched action.
    pub fn submit(&mut self, action: Action<R::Move>) -> anyhow::Result<()> {
        match action {
            Action::Ban(banned) => self.submit_ban(banned)?,
            Action::Move(next_move) => self.submit_move(next_move)?,
        }
        Ok(())
    }

    /// Parses a move in UCI notation and submits it as the action the current
    /// phase expects: a ban of the opponent's move or a move of the acting
    /// player.
    ///
    /// # Errors
    ///
    /// Fails when the input does not describe a legal move of the side to move
    /// or when the action is rejected.
    pub fn play_uci(&mut self, input: &str) -> anyhow::Result<Action<R::Move>> {
        let parsed = self
            .rules
            .parse_move(&self.position, self.side_to_move, input)?;
        let action = Action::for_phase(self.phase(), parsed);
        self.submit(action.clone())?;
        Ok(action)
    }

    /// Whether the game is over.
    ///
    /// In a move phase this is the regular test on the ban-filtered moves. In a
    /// ban phase the side about to move is judged on the current board ahead
    /// of the ban: no legal moves is checkmate or stalemate regardless of the
    /// ban, and a single legal move while in check is checkmate because the
    /// acting player will ban it.
    ///
    /// # Errors
    ///
    /// Propagates failures of the rules implementation.
    pub fn classify(&self) -> anyhow::Result<TerminalStatus> {
        let legal_moves = self.legal_candidates()?.len();
        let in_check = self.rules.in_check(&self.position, self.side_to_move)?;
        let status = match (self.phase(), legal_moves, in_check) {
            (_, 0, true) => TerminalStatus::Checkmate,
            (_, 0, false) => TerminalStatus::Stalemate,
            (Phase::Ban, 1, true) => TerminalStatus::Checkmate,
            _ => TerminalStatus::Ongoing,
        };
        Ok(status)
    }

    /// Whether [`Game::classify`] reports a finished game.
    ///
    /// # Errors
    ///
    /// Propagates failures of the rules implementation.
    pub fn is_over(&self) -> anyhow::Result<bool> {
        Ok(self.classify()? != TerminalStatus::Ongoing)
    }

    /// Serializes the underlying chess position in FEN.
    #[must_use]
    pub fn fen(&self) -> String {
        self.rules.fen(&self.position)
    }
}
