//! Sides, game status and the capability contract every game implements

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MoveError, ParseError};

// ============================================================================
// CORE TYPES
// ============================================================================

/// The two sides. HOME is the maximizing player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Status reached when this side wins
    pub fn win_status(self) -> Status {
        match self {
            Side::Home => Status::HomeWin,
            Side::Away => Status::AwayWin,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "HOME"),
            Side::Away => write!(f, "AWAY"),
        }
    }
}

/// Game status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    HomeWin,
    AwayWin,
    Draw,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            Status::HomeWin => Some(Side::Home),
            Status::AwayWin => Some(Side::Away),
            Status::InProgress | Status::Draw => None,
        }
    }
}

// ============================================================================
// CAPABILITY CONTRACT
// ============================================================================

/// A move value: copyable, printable and parseable from its text notation
pub trait GameMove:
    Copy + Eq + Debug + Display + FromStr<Err = ParseError> + Send + Sync + 'static
{
}

/// A two-player board game the search engine can drive.
///
/// `apply` and `undo` are the engine's unchecked mutate-in-place pair:
/// `undo(mv, prior)` must exactly reverse `apply(mv)` when `prior` is the
/// side that was to move before `apply`. `make_move` is the validated apply
/// used by a match harness on its authoritative board.
pub trait GameState: Clone + Debug + Send + Sync {
    type Move: GameMove;

    /// Side to move
    fn who(&self) -> Side;

    fn status(&self) -> Status;

    /// Number of moves applied so far
    fn num_moves(&self) -> u32;

    /// Legal moves for the side to move, in a fixed deterministic order
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn is_legal(&self, mv: &Self::Move) -> bool;

    fn apply(&mut self, mv: Self::Move);

    fn undo(&mut self, mv: Self::Move, prior: Side);

    /// Upper bound on the number of plies left in the game
    fn max_remaining_moves(&self) -> usize;

    /// Validated apply
    fn make_move(&mut self, mv: Self::Move) -> Result<(), MoveError> {
        if self.status().is_terminal() {
            return Err(MoveError::GameOver);
        }
        if !self.is_legal(&mv) {
            return Err(MoveError::Illegal(mv.to_string()));
        }
        self.apply(mv);
        Ok(())
    }
}

// ============================================================================
// SCORED MOVE
// ============================================================================

/// A move paired with a HOME-maximizing score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored<M> {
    /// `None` until a move has been recorded
    pub mv: Option<M>,
    pub score: f64,
}

impl<M> Scored<M> {
    pub fn new(mv: M, score: f64) -> Self {
        Self { mv: Some(mv), score }
    }

    /// No move yet, holding the given sentinel score
    pub fn sentinel(score: f64) -> Self {
        Self { mv: None, score }
    }
}

impl<M> Default for Scored<M> {
    fn default() -> Self {
        Self::sentinel(0.0)
    }
}

impl<M: Display> Display for Scored<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mv {
            Some(mv) => write!(f, "{} {}", mv, self.score),
            None => write!(f, "none {}", self.score),
        }
    }
}
