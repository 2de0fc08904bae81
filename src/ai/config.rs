//! AI tuning parameters.

use serde::{Deserialize, Serialize};

/// Heuristic AI configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Half-width of the uniform noise added to every score (default: 3).
    pub variance: f64,

    /// Options within this many points of the best are treated as similar
    /// and picked between at random (default: 5).
    pub similar_threshold: f64,

    /// Draw options scoring below this are dropped (default: 6).
    pub draw_floor: f64,

    /// Score of the blind deck draw before noise (default: 10).
    pub deck_base_score: f64,

    /// Cosmetic pause before each decision, in milliseconds (default: 800).
    /// Simulations run with 0.
    pub thinking_delay_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            variance: 3.0,
            similar_threshold: 5.0,
            draw_floor: 6.0,
            deck_base_score: 10.0,
            thinking_delay_ms: 800,
        }
    }
}

impl AiConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score noise. Negative values are treated as 0.
    #[must_use]
    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance.max(0.0);
        self
    }

    /// Set the similarity band.
    #[must_use]
    pub fn with_similar_threshold(mut self, threshold: f64) -> Self {
        self.similar_threshold = threshold.max(0.0);
        self
    }

    /// Set the thinking delay.
    #[must_use]
    pub fn with_thinking_delay_ms(mut self, delay_ms: u64) -> Self {
        self.thinking_delay_ms = delay_ms;
        self
    }

    /// Fully greedy play: no noise and no similarity band.
    #[must_use]
    pub fn deterministic(self) -> Self {
        self.with_variance(0.0).with_similar_threshold(0.0)
    }
}
