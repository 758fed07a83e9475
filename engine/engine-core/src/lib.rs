//! Core contracts for the game search engine
//!
//! This crate provides the two-player vocabulary and the narrow capability
//! contract the rest of the workspace is written against:
//! - [`GameState`]: an immutable-value game position that can enumerate and
//!   apply legal moves, report its outcome, and identify itself for
//!   transposition lookup
//! - [`Player`]/[`Outcome`]: shared player and result types, including the
//!   terminal-value convention the search backs up through its cache
//!
//! Game crates implement `GameState`; the `mcts` crate consumes it. Neither
//! side depends on the other's internals, so games and search policies can be
//! swapped independently.

pub mod state;

// Re-export main types for convenience
pub use state::{GameState, IllegalMoveError, Outcome, Player};
