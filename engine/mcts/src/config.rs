//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for an oracle-guided tree search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of simulations each query runs. Values below 1 are treated
    /// as 1 everywhere the budget is consumed.
    pub num_simulations: u32,

    /// Exploration constant weighting the prior term of the selection
    /// score. Larger values chase the oracle's priors longer before the
    /// observed values take over.
    pub exploration: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 800,
            exploration: 1.0,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            exploration: 1.0,
        }
    }

    /// Builder pattern: set the simulation budget, clamped to at least 1.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n.max(1);
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 800);
        assert!((config.exploration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_builder_clamps_budget() {
        let config = MctsConfig::default().with_simulations(0);
        assert_eq!(config.num_simulations, 1);

        let config = MctsConfig::default().with_simulations(200).with_exploration(2.0);
        assert_eq!(config.num_simulations, 200);
        assert!((config.exploration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: MctsConfig = serde_json::from_str("{\"num_simulations\": 25}").unwrap();
        assert_eq!(config.num_simulations, 25);
        assert!((config.exploration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = MctsConfig::for_testing().with_exploration(1.5);
        let text = serde_json::to_string(&config).unwrap();
        let back: MctsConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.num_simulations, config.num_simulations);
        assert!((back.exploration - config.exploration).abs() < 1e-6);
    }
}
