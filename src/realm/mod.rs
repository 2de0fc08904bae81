//! Castles and players: the per-seat board state.

pub mod castle;
pub mod player;

pub use castle::{Castle, Discarded, ACTIVATION_THRESHOLD, DESTRUCTION_THRESHOLD};
pub use player::{CastleSlot, Player};
