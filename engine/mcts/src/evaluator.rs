//! Policy-value oracle contract.
//!
//! The search consults an [`Evaluator`] exactly once per leaf expansion. The
//! oracle maps an encoded board to a prior score per move plus a scalar value
//! estimate; in production that is a neural network, while tests use the
//! [`UniformEvaluator`] stand-in. Masking the priors to the legal moves and
//! renormalizing is the search's job, not the oracle's.

use thiserror::Error;

/// Errors an oracle can report.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The encoded board does not match the size the oracle was built for.
    /// A configuration bug: fatal to the query that triggered it.
    #[error("encoded board has {actual} entries, evaluator expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The oracle's own inference failed.
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),
}

/// Result of evaluating one position.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Prior score per move over the full move-index space. The search masks
    /// these to the legal moves and renormalizes, so they only need to be
    /// meaningful relative to each other.
    pub priors: Vec<f32>,

    /// Value estimate in `[0, 1]` from the first player's perspective:
    /// 1.0 a certain first-player win, 0.0 a certain loss, 0.5 even.
    pub value: f32,
}

/// Policy-value oracle consumed by the search.
pub trait Evaluator: Send + Sync {
    /// Evaluate a single encoded board.
    fn predict(&self, board: &[f32]) -> Result<EvalResult, EvaluatorError>;

    /// Batch evaluation hook. The default loops over
    /// [`predict`](Evaluator::predict); implementations backed by batched
    /// inference can override it, but doing so must not change search
    /// semantics.
    fn predict_batch(&self, boards: &[&[f32]]) -> Result<Vec<EvalResult>, EvaluatorError> {
        boards.iter().map(|board| self.predict(board)).collect()
    }
}

/// Oracle stand-in returning a uniform prior and a neutral value.
///
/// Useful for exercising the search without a trained model; the search's
/// masking turns the uniform prior into a uniform distribution over the
/// legal moves.
#[derive(Debug, Clone)]
pub struct UniformEvaluator {
    board_size: usize,
    num_moves: usize,
}

impl UniformEvaluator {
    pub fn new(board_size: usize, num_moves: usize) -> Self {
        Self {
            board_size,
            num_moves,
        }
    }
}

impl Evaluator for UniformEvaluator {
    fn predict(&self, board: &[f32]) -> Result<EvalResult, EvaluatorError> {
        if board.len() != self.board_size {
            return Err(EvaluatorError::SizeMismatch {
                expected: self.board_size,
                actual: board.len(),
            });
        }

        Ok(EvalResult {
            priors: vec![1.0 / self.num_moves as f32; self.num_moves],
            value: 0.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_evaluator_shape() {
        let eval = UniformEvaluator::new(81, 81);
        let result = eval.predict(&vec![2.0; 81]).unwrap();

        assert_eq!(result.priors.len(), 81);
        let sum: f32 = result.priors.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!((result.value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_evaluator_rejects_wrong_board_size() {
        let eval = UniformEvaluator::new(81, 81);
        match eval.predict(&[0.0; 9]) {
            Err(EvaluatorError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 81);
                assert_eq!(actual, 9);
            }
            other => panic!("expected size mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_predict_batch_default_matches_predict() {
        let eval = UniformEvaluator::new(3, 4);
        let a = [0.0, 1.0, 2.0];
        let b = [2.0, 2.0, 2.0];
        let batch = eval.predict_batch(&[&a, &b]).unwrap();

        assert_eq!(batch.len(), 2);
        for result in batch {
            assert_eq!(result.priors, eval.predict(&a).unwrap().priors);
        }
    }
}
