//! Plain-text position persistence.
//!
//! A saved position is a whitespace-separated sequence of 92 integers: the
//! 81 cell values row-major (0 = X, 1 = O, 2 = empty), the 9 sub-board
//! statuses row-major (0 = X, 1 = O, 2 = open, 3 = tied), the previous move
//! index (−1 for none), and the player to move (0 = X, 1 = O). Whitespace
//! layout is free; [`State::save`] writes one board row per line for
//! readability.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use engine_core::Player;

use crate::{Slot, State, BOARD_SIDE, CELL_COUNT, SUB_COUNT, SUB_SIDE};

/// Failure to read or parse a saved position.
#[derive(Debug, thiserror::Error)]
pub enum StateFileError {
    #[error("could not access state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed state file: {0}")]
    Format(String),
}

impl State {
    /// Write this position to `path` in the persisted text format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StateFileError> {
        let mut text = String::new();
        for row in 0..BOARD_SIDE {
            for col in 0..BOARD_SIDE {
                let _ = write!(text, "{} ", self.cell(row * BOARD_SIDE + col) as u8);
            }
            text.push('\n');
        }
        for row in 0..SUB_SIDE {
            for col in 0..SUB_SIDE {
                let _ = write!(text, "{} ", self.sub_board(row * SUB_SIDE + col) as u8);
            }
            text.push('\n');
        }
        let prev = self.prev_move().map_or(-1, |mv| mv as i64);
        let player = match self.next_player() {
            Player::First => 0,
            Player::Second => 1,
        };
        let _ = writeln!(text, "{prev} {player}");

        fs::write(path, text)?;
        Ok(())
    }

    /// Read a position from `path`.
    ///
    /// Fails with [`StateFileError::Io`] when the file cannot be read and
    /// [`StateFileError::Format`] when fewer than 92 integers parse or a
    /// value is out of range. The outcome and legal-move set are re-derived
    /// from the loaded grids, so no partially constructed state can escape.
    pub fn load(path: impl AsRef<Path>) -> Result<State, StateFileError> {
        let text = fs::read_to_string(path)?;
        let mut fields = text.split_whitespace();
        let mut next = |what: &str| -> Result<i64, StateFileError> {
            let token = fields
                .next()
                .ok_or_else(|| StateFileError::Format(format!("missing {what}")))?;
            token
                .parse::<i64>()
                .map_err(|_| StateFileError::Format(format!("invalid {what}: {token:?}")))
        };

        let mut cells = [Slot::Open; CELL_COUNT];
        for cell in cells.iter_mut() {
            let value = next("board cell")?;
            *cell = Slot::from_cell_value(value)
                .ok_or_else(|| StateFileError::Format(format!("board cell out of range: {value}")))?;
        }

        let mut sub_boards = [Slot::Open; SUB_COUNT];
        for status in sub_boards.iter_mut() {
            let value = next("sub-board status")?;
            *status = Slot::from_status_value(value).ok_or_else(|| {
                StateFileError::Format(format!("sub-board status out of range: {value}"))
            })?;
        }

        let prev_move = match next("previous move")? {
            -1 => None,
            mv if (0..CELL_COUNT as i64).contains(&mv) => Some(mv as u8),
            mv => {
                return Err(StateFileError::Format(format!(
                    "previous move out of range: {mv}"
                )))
            }
        };

        let next_player = match next("next player")? {
            0 => Player::First,
            1 => Player::Second,
            value => {
                return Err(StateFileError::Format(format!(
                    "next player out of range: {value}"
                )))
            }
        };

        Ok(State::from_grids(cells, sub_boards, prev_move, next_player))
    }
}
