//! D4 symmetry expansion for training-data augmentation.
//!
//! The full board has the symmetry group of the square: four rotations, each
//! with an optional reflection. A position and its search-derived move
//! probabilities can be expanded into all eight equivalent pairs, multiplying
//! the training yield of every self-play game. The cell encoding and the
//! probability vector move through identical index maps, so a probability
//! entry always stays aligned with the cell it describes.

use crate::{State, BOARD_SIDE, CELL_COUNT};

/// A caller-supplied probability vector with fewer than one entry per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("probability vector has {actual} entries, expected at least {expected}")]
pub struct InvalidSizeError {
    pub expected: usize,
    pub actual: usize,
}

impl State {
    /// Expand this position and `probs` into the 8 symmetric (board
    /// encoding, probability vector) pairs: the identity, then each further
    /// 90° rotation, each immediately followed by its horizontal reflection.
    ///
    /// `probs` must have at least [`CELL_COUNT`] entries; entries beyond the
    /// board are carried through unchanged.
    pub fn symmetries(
        &self,
        probs: &[f32],
    ) -> Result<Vec<(Vec<f32>, Vec<f32>)>, InvalidSizeError> {
        if probs.len() < CELL_COUNT {
            return Err(InvalidSizeError {
                expected: CELL_COUNT,
                actual: probs.len(),
            });
        }

        let mut pairs = Vec::with_capacity(8);
        let mut board = self.encode();
        let mut probs = probs.to_vec();

        for step in 0..4 {
            if step != 0 {
                board = rotate(&board);
                probs = rotate(&probs);
            }
            pairs.push((board.clone(), probs.clone()));
            pairs.push((reflect(&board), reflect(&probs)));
        }

        Ok(pairs)
    }
}

/// Rotate the board-shaped prefix of `values` 90° clockwise:
/// `new[r][c] = old[c][SIDE-1-r]`.
pub(crate) fn rotate(values: &[f32]) -> Vec<f32> {
    let mut out = values.to_vec();
    for idx in 0..CELL_COUNT {
        let src = (idx % BOARD_SIDE) * BOARD_SIDE + (BOARD_SIDE - 1 - idx / BOARD_SIDE);
        out[idx] = values[src];
    }
    out
}

/// Mirror the board-shaped prefix of `values` across the vertical axis:
/// `new[r][SIDE-1-c] = old[r][c]`.
pub(crate) fn reflect(values: &[f32]) -> Vec<f32> {
    let mut out = values.to_vec();
    for idx in 0..CELL_COUNT {
        let dst = (idx / BOARD_SIDE) * BOARD_SIDE + (BOARD_SIDE - 1 - idx % BOARD_SIDE);
        out[dst] = values[idx];
    }
    out
}
