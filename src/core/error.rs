//! Rejected game operations.
//!
//! The state machine never panics on an illegal call: it returns a
//! `GameError` and leaves the state untouched.

use thiserror::Error;

use crate::rules::{ActionKind, Phase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("operation requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("the game is over")]
    GameOver,

    #[error("field pile {0} does not exist")]
    PileOutOfRange(usize),

    #[error("field pile {0} is empty")]
    EmptyPile(usize),

    #[error("no cards left to draw")]
    DeckExhausted,

    #[error("no card is being held")]
    NoDrawnCard,

    #[error("{kind:?} is not available: {reason}")]
    ActionUnavailable { kind: ActionKind, reason: String },

    #[error("only a card drawn from the field can be returned")]
    NotCancellable,

    #[error("raid choice is not offered")]
    InvalidRaidChoice,

    #[error("no raid is pending")]
    NoPendingRaid,

    #[error("royal to sacrifice was not found")]
    RoyalNotFound,

    #[error("a royal must be sacrificed while any remain")]
    SacrificeRequired,
}

pub type Result<T> = std::result::Result<T, GameError>;
