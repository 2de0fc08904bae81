//! Heuristic AI.
//!
//! The AI scores every option it has with hand-tuned heuristics, nudges the
//! scores by its current mood and a little uniform noise, then picks among the
//! options close to the best (see `select`).
//!
//! ## Key Types
//!
//! - `AiPlayer`: the heuristic player for one seat
//! - `Agent`: phase-indexed decision trait used by the turn driver
//! - `RandomAgent`: uniform baseline for comparisons
//! - `Mood`: persistent bias over action scores

pub mod agent;
pub mod config;
pub mod evaluate;
pub mod mood;
pub mod player;
pub mod scoring;
pub mod select;

pub use agent::{Agent, RandomAgent};
pub use config::AiConfig;
pub use evaluate::CardEvaluator;
pub use mood::{roll_mood_shift, Mood, MoodContext, MoodTrigger, MOOD_TRIGGERS};
pub use player::AiPlayer;
pub use scoring::{score_offer, FieldSurvey};
pub use select::{pick_from_similar_options, Scored};
