//! Injectable thinking delay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the driver waits before each agent decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacer {
    /// Never wait. Batch simulations run like this.
    #[default]
    Instant,
    /// Block the thread for the requested delay.
    Sleep,
}

impl Pacer {
    /// `Sleep` when a non-zero delay is configured, `Instant` otherwise.
    #[must_use]
    pub fn for_delay_ms(delay_ms: u64) -> Self {
        if delay_ms == 0 {
            Pacer::Instant
        } else {
            Pacer::Sleep
        }
    }

    pub fn pause(self, delay: Duration) {
        if self == Pacer::Sleep && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
