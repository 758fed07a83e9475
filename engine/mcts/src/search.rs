//! Search implementation.
//!
//! One simulation walks the cached tree policy from the root, expands the
//! first never-evaluated position it reaches with a single oracle call, and
//! backs the resulting value up the path. Statistics live in a transposition
//! cache keyed by canonical position identity; recursion passes state values
//! and all mutation happens by key lookup after the recursive call returns,
//! so no references into the cache are held across a simulation.

use std::collections::HashMap;

use engine_core::{GameState, Player};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeRecord;

/// Keeps the prior term alive on the very first selection from a fresh
/// node, when the parent has no completed simulations yet.
const FRESH_NODE_EPSILON: f32 = 1e-8;

/// Errors that can surface from a search query.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("game error: {0}")]
    Game(#[from] engine_core::IllegalMoveError),

    #[error("evaluator returned {actual} priors for a move space of {expected}")]
    PriorSizeMismatch { expected: usize, actual: usize },

    #[error("no legal moves in a position reported as in progress")]
    NoLegalMoves,
}

/// Oracle-guided tree search over a transposition cache.
///
/// The cache maps canonical position keys to [`NodeRecord`]s and is owned
/// exclusively by this instance; independent searches (say, one per oracle
/// version) must use independent instances. All stored values are kept from
/// the first player's perspective and flipped only while scoring moves for
/// the second player.
pub struct MctsSearch<S: GameState, E: Evaluator> {
    cache: HashMap<S::Key, NodeRecord>,
    evaluator: E,
    config: MctsConfig,
}

impl<S: GameState, E: Evaluator> MctsSearch<S, E> {
    /// Create a search around an oracle.
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        Self {
            cache: HashMap::new(),
            evaluator,
            config,
        }
    }

    /// Set the simulation budget, clamped to at least 1.
    pub fn set_simulations(&mut self, n: u32) {
        self.config.num_simulations = n.max(1);
    }

    /// Drop every cached statistic. Call between unrelated searches (a new
    /// game, a swapped oracle) so stale values never leak into scoring.
    pub fn reset(&mut self) {
        debug!(entries = self.cache.len(), "clearing search cache");
        self.cache.clear();
    }

    /// Number of positions currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Cached statistics for a position, if any.
    pub fn record(&self, key: &S::Key) -> Option<&NodeRecord> {
        self.cache.get(key)
    }

    /// Run the budget from `root` and report, per move index, the fraction
    /// of the root's simulations that went through that move's child.
    ///
    /// The vector spans the full move space; illegal moves and never-visited
    /// children read 0. A terminal root yields an all-zero vector.
    pub fn move_probabilities(&mut self, root: &S) -> Result<Vec<f32>, SearchError> {
        self.run(root)?;

        let total = self
            .cache
            .get(&root.key())
            .map_or(1.0, |rec| rec.simulations as f32);

        let mut probs = vec![0.0; root.move_space()];
        for &mv in root.legal_moves() {
            let child = root.apply_move(mv)?;
            if let Some(rec) = self.cache.get(&child.key()) {
                probs[mv] = rec.visits as f32 / total;
            }
        }
        Ok(probs)
    }

    /// Run the budget from `root` and return a one-hot vector over the move
    /// space at the most-visited legal child (first found wins ties).
    ///
    /// All-zero when no legal child was ever cached, e.g. a terminal root.
    pub fn best_move(&mut self, root: &S) -> Result<Vec<f32>, SearchError> {
        self.run(root)?;

        let mut best: Option<usize> = None;
        let mut best_visits = -1i64;
        for &mv in root.legal_moves() {
            let child = root.apply_move(mv)?;
            if let Some(rec) = self.cache.get(&child.key()) {
                if i64::from(rec.visits) > best_visits {
                    best_visits = i64::from(rec.visits);
                    best = Some(mv);
                }
            }
        }

        let mut one_hot = vec![0.0; root.move_space()];
        if let Some(mv) = best {
            one_hot[mv] = 1.0;
        }
        Ok(one_hot)
    }

    /// Expand the root if it has never been expanded, then run the budget.
    ///
    /// The preliminary expansion sits outside the budget so that even a
    /// budget of 1 performs one real selection from an expanded root.
    fn run(&mut self, root: &S) -> Result<(), SearchError> {
        if !root.outcome().is_terminal()
            && !self.cache.get(&root.key()).is_some_and(NodeRecord::is_expanded)
        {
            self.simulate(root)?;
        }
        for _ in 0..self.config.num_simulations.max(1) {
            self.simulate(root)?;
        }
        Ok(())
    }

    /// One simulation: returns the value backed up through `state`, from the
    /// first player's perspective.
    fn simulate(&mut self, state: &S) -> Result<f32, SearchError> {
        // Terminal positions answer directly and never touch the cache.
        if let Some(value) = state.outcome().terminal_value() {
            return Ok(value);
        }

        let key = state.key();
        if !self.cache.get(&key).is_some_and(NodeRecord::is_expanded) {
            return self.expand(state, key);
        }

        // Interior node: score every legal move and descend into the best.
        let mover = state.next_player();
        let exploration = self.config.exploration;
        let parent = &self.cache[&key];
        let parent_sims = parent.simulations as f32;

        let mut best_score = f32::NEG_INFINITY;
        let mut chosen: Option<(usize, S, S::Key)> = None;
        for &mv in state.legal_moves() {
            let child = state.apply_move(mv)?;
            let child_key = child.key();
            let prior = parent.priors[mv];

            let score = match self.cache.get(&child_key) {
                Some(rec) if rec.visits > 0 => {
                    let mut value = rec.total_value / rec.visits as f32;
                    if mover == Player::Second {
                        value = 1.0 - value;
                    }
                    value + exploration * prior * parent_sims.sqrt() / (rec.visits as f32 + 1.0)
                }
                _ => 0.5 + exploration * prior * (parent_sims + FRESH_NODE_EPSILON).sqrt(),
            };

            // Strict comparison: ties fall to the lowest move index.
            if score > best_score {
                best_score = score;
                chosen = Some((mv, child, child_key));
            }
        }
        let (mv, child, child_key) = chosen.ok_or(SearchError::NoLegalMoves)?;

        let value = self.simulate(&child)?;

        // Credit the child, then the parent. The value itself propagates
        // unchanged: perspective flips happen only at selection time.
        match self.cache.get_mut(&child_key) {
            Some(rec) => {
                rec.total_value += value;
                rec.visits += 1;
            }
            None => {
                // Reached but never expanded (a terminal child): keep a
                // visit-only placeholder so its statistics still steer
                // selection.
                self.cache.insert(child_key, NodeRecord::placeholder(value));
            }
        }
        if let Some(rec) = self.cache.get_mut(&key) {
            rec.simulations += 1;
        }

        trace!(chosen = mv, value, "simulation backed up");
        Ok(value)
    }

    /// Leaf expansion: one oracle call supplies the priors and the value.
    ///
    /// Priors are masked to the legal moves and renormalized. A placeholder
    /// record keeps its visit history; the priors attached here are
    /// independent of it.
    fn expand(&mut self, state: &S, key: S::Key) -> Result<f32, SearchError> {
        let eval = self.evaluator.predict(&state.encode())?;

        let move_space = state.move_space();
        if eval.priors.len() != move_space {
            return Err(SearchError::PriorSizeMismatch {
                expected: move_space,
                actual: eval.priors.len(),
            });
        }

        let legal = state.legal_moves();
        let mass: f32 = legal.iter().map(|&mv| eval.priors[mv]).sum();

        let mut priors = vec![0.0; move_space];
        if mass > 0.0 {
            for &mv in legal {
                priors[mv] = eval.priors[mv] / mass;
            }
        } else {
            // The oracle put no mass on any legal move; fall back to
            // uniform so the masked priors still sum to 1.
            let uniform = 1.0 / legal.len() as f32;
            for &mv in legal {
                priors[mv] = uniform;
            }
        }

        self.cache.entry(key).or_default().priors = priors;

        trace!(legal = legal.len(), value = eval.value, "leaf expanded");
        Ok(eval.value)
    }
}
