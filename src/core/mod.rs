//! Core building blocks: seats, RNG, configuration, errors, and the message log.

pub mod config;
pub mod error;
pub mod log;
pub mod player;
pub mod rng;

pub use config::{GameConfig, DEFAULT_LOG_CAPACITY};
pub use error::{GameError, Result};
pub use log::{LogEntry, LogSink, MessageLog};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
