//! Game configuration.

use serde::{Deserialize, Serialize};

/// Default number of messages kept in the game log.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Configuration for a single game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Add the two jokers (Age toggles) to the deck.
    pub include_jokers: bool,

    /// Maximum messages kept in the log; the oldest are evicted first.
    pub log_capacity: usize,

    /// Seed for the shuffle and everything forked from it.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            include_jokers: true,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Include or leave out the jokers.
    #[must_use]
    pub fn with_jokers(mut self, include: bool) -> Self {
        self.include_jokers = include;
        self
    }

    /// Set the log capacity (at least 1).
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert!(config.include_jokers);
        assert_eq!(config.log_capacity, 50);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::new()
            .with_seed(7)
            .with_jokers(false)
            .with_log_capacity(0);

        assert_eq!(config.seed, 7);
        assert!(!config.include_jokers);
        assert_eq!(config.log_capacity, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"seed": 99}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert!(config.include_jokers);
    }
}
