//! # royal-family
//!
//! Rule engine, heuristic AI, and headless simulator for *Royal Family*, a
//! two-player card game of castles, royals and assassins played with a
//! standard 54-card deck.
//!
//! ## Design Principles
//!
//! 1. **One owned state**: `GameState` is the single mutable aggregate of a
//!    game. Collaborators query it and drive it through phase-checked
//!    operations that return `Result`; a rejected call never mutates state.
//!
//! 2. **Derived numbers are never stored**: castle totals (damage,
//!    fortification strength, net persuasion) are recomputed from card lists.
//!
//! 3. **Deterministic by seed**: every random choice, including the AI's,
//!    flows through a forkable ChaCha8 `GameRng`.
//!
//! ## Modules
//!
//! - `core`: seats, RNG, configuration, errors, message log
//! - `cards`: card model and deck construction
//! - `realm`: castles and players
//! - `rules`: phases, actions, legal-move enumeration, the state machine
//! - `ai`: mood-driven heuristic AI and the `Agent` trait
//! - `sim`: turn driver, game records, batch simulation

pub mod ai;
pub mod cards;
pub mod core;
pub mod realm;
pub mod rules;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{GameConfig, GameError, GameRng, PlayerId, PlayerMap, Result};

pub use crate::cards::{Card, CardKind, Rank, RoyalTier, Suit};

pub use crate::realm::{Castle, CastleSlot, Player};

pub use crate::rules::{
    Action, ActionKind, ActionOption, Age, BoardSnapshot, GameState, Offer, Phase, RaidChoice,
    RoyalTarget,
};

pub use crate::ai::{Agent, AiConfig, AiPlayer, Mood, RandomAgent};

pub use crate::sim::{SimulationConfig, SimulationReport, Simulator, TurnDriver};
