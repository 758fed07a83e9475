//! Game state capability contract.
//!
//! A [`GameState`] is an immutable value describing one position of a
//! two-player, perfect-information game. Applying a move produces a new
//! state; nothing is mutated in place. The search engine is written entirely
//! against this trait, so it never sees a concrete board representation.

use std::hash::Hash;

/// One of the two players. `First` moves first from the initial position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// Result of a game, or `InProgress` while moves remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    FirstWins,
    SecondWins,
    InProgress,
    Draw,
}

impl Outcome {
    /// Whether the game has ended.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    /// Terminal value of the position from `Player::First`'s perspective:
    /// 1.0 for a first-player win, 0.0 for a second-player win, 0.5 for a
    /// draw. `None` while the game is still in progress.
    ///
    /// The search stores every backed-up value in this convention and flips
    /// perspective only when scoring moves for the second player.
    #[inline]
    pub fn terminal_value(self) -> Option<f32> {
        match self {
            Outcome::FirstWins => Some(1.0),
            Outcome::SecondWins => Some(0.0),
            Outcome::Draw => Some(0.5),
            Outcome::InProgress => None,
        }
    }
}

/// A move outside the current legal set. Callers are expected to check
/// [`GameState::is_legal`] (or pick from [`GameState::legal_moves`]) first;
/// this error is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("move {mv} is not legal in the current position")]
pub struct IllegalMoveError {
    pub mv: usize,
}

/// Immutable-value game position.
///
/// Moves are indices into a fixed move space of size
/// [`move_space`](GameState::move_space); probability and prior vectors
/// produced anywhere in the workspace always have exactly that many entries,
/// regardless of how many moves are currently legal.
pub trait GameState: Clone + Send + Sync {
    /// Canonical identity for transposition lookup. Two states that are
    /// equivalent for move legality and search statistics must produce equal
    /// keys no matter which move order reached them.
    type Key: Eq + Hash + Clone + Send + Sync;

    /// Size of the fixed move-index space.
    fn move_space(&self) -> usize;

    /// Legal moves from this position, in ascending index order. Empty if
    /// and only if the game has ended.
    fn legal_moves(&self) -> &[usize];

    /// Membership test against [`legal_moves`](GameState::legal_moves).
    fn is_legal(&self, mv: usize) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Successor state after playing `mv`, or [`IllegalMoveError`] if `mv`
    /// is not currently legal.
    fn apply_move(&self, mv: usize) -> Result<Self, IllegalMoveError>;

    /// Outcome of the position.
    fn outcome(&self) -> Outcome;

    /// Player to move.
    fn next_player(&self) -> Player;

    /// Canonical key of this position.
    fn key(&self) -> Self::Key;

    /// Flat numeric encoding of the position, the input contract of the
    /// policy-value oracle.
    fn encode(&self) -> Vec<f32>;
}
