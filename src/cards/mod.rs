//! Card model: identity, categories, and deck construction.
//!
//! ## Key Types
//!
//! - `Card`: immutable suited card or joker
//! - `CardKind`: what the card can be used for (soldier, royal, assassin, ...)
//! - `RoyalTier`: K > Q > J elimination order

pub mod card;
pub mod deck;

pub use card::{Card, CardKind, Color, Rank, RoyalTier, Suit};
pub use deck::{play_deck, shuffled_play_deck, standard_deck};
