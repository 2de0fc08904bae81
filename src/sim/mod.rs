//! Headless simulation.
//!
//! ## Overview
//!
//! - **TurnDriver**: steps a game by asking the pending seat's `Agent` for one
//!   decision at a time, with a stuck-phase fallback and a step ceiling
//! - **Pacer**: the cosmetic thinking delay, collapsible to nothing
//! - **CaptureSink / GameRecord**: per-game log capture and statistics
//! - **Simulator**: batches of seeded games and their summary
//!
//! ## Usage
//!
//! ```no_run
//! use royal_family::sim::{SimulationConfig, Simulator};
//!
//! let config = SimulationConfig::new().with_games(100).with_seed_offset(1);
//! let report = Simulator::new(config).run();
//! println!("timeouts: {}", report.summary.timeouts);
//! report.write_json("results.json").unwrap();
//! ```

pub mod driver;
pub mod pacer;
pub mod record;
pub mod runner;

pub use driver::{DriveReport, StepOutcome, TurnDriver, DEFAULT_MAX_STEPS};
pub use pacer::Pacer;
pub use record::{
    CaptureSink, Decision, EventBuffer, GameRecord, LoggedEvent, MoodChange, PlayerStats,
    ScoredKind,
};
pub use runner::{
    AgentKind, SimError, SimResult, SimulationConfig, SimulationReport, SimulationSummary,
    Simulator,
};
