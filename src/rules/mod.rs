//! The rule engine: phases, actions, and the game state machine.
//!
//! `GameState` is the single mutable aggregate of a game. Collaborators
//! query it (`available_actions`, `raid_options`, `own_royals`, snapshots)
//! and drive it through a small set of phase-checked operations:
//!
//! | Phase               | Operations                                      |
//! |---------------------|-------------------------------------------------|
//! | `Setup`             | `start_game`                                    |
//! | `Flop`              | `next_round`                                    |
//! | `Draw`              | `draw_from_deck`, `draw_from_field`             |
//! | `Action`            | `execute_action`, `begin_field_select`, `cancel_draw` |
//! | `FieldSelect`       | `execute_action(Action::Field { .. })`          |
//! | `RaidChoice`        | `execute_raid_choice`                           |
//! | `AssassinSurprise`  | `execute_assassin_surprise`                     |

pub mod action;
pub mod engine;
mod execute;
mod legal;
pub mod phase;
pub mod snapshot;

pub use action::{Action, ActionKind, ActionOption, ActionRecord, Offer, RaidChoice, RoyalTarget};
pub use engine::{
    first_player, DrawOutcome, DrawSource, DrawnCard, GameState, FIELD_PILES, TURNS_PER_ROUND,
};
pub use phase::{Age, Phase};
pub use snapshot::{BoardSnapshot, CastleSnapshot, PlayerSnapshot};
