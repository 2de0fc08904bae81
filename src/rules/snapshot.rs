//! Serializable board snapshots.
//!
//! A snapshot is a plain-data copy of everything visible on the table. The
//! simulator stores one next to each captured log message and one at the end
//! of every game.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::core::PlayerId;
use crate::realm::{Castle, Player};

use super::engine::{GameState, FIELD_PILES};
use super::phase::{Age, Phase};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastleSnapshot {
    pub suit: Suit,
    pub active: bool,
    pub destroyed: bool,
    pub royals: Vec<Card>,
    pub fortification: Option<Card>,
    pub fortification_strength: i32,
    pub fortification_damage: Vec<Card>,
    pub permanent_damage: Vec<Card>,
    pub total_damage: i32,
    pub persuasion: Vec<Card>,
    pub threats: Vec<Card>,
    pub net_persuasion: i32,
    pub prisoner: Option<Card>,
}

impl CastleSnapshot {
    #[must_use]
    pub fn capture(castle: &Castle) -> Self {
        Self {
            suit: castle.suit(),
            active: castle.is_active(),
            destroyed: castle.is_destroyed(),
            royals: castle.royals().to_vec(),
            fortification: castle.fortification(),
            fortification_strength: castle.fortification_strength(),
            fortification_damage: castle.fortification_damage().to_vec(),
            permanent_damage: castle.permanent_damage().to_vec(),
            total_damage: castle.total_damage(),
            persuasion: castle.persuasion_cards().to_vec(),
            threats: castle.threat_cards().to_vec(),
            net_persuasion: castle.net_persuasion(),
            prisoner: castle.prisoner(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub primary: CastleSnapshot,
    pub alliance: CastleSnapshot,
}

impl PlayerSnapshot {
    #[must_use]
    pub fn capture(player: &Player) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            primary: CastleSnapshot::capture(player.primary()),
            alliance: CastleSnapshot::capture(player.alliance()),
        }
    }
}

/// Full table state at one moment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub round: u32,
    pub turn: u32,
    pub turn_index: usize,
    pub phase: Phase,
    pub age: Age,
    pub current_player: PlayerId,
    pub deck_size: usize,
    pub discard_size: usize,
    /// Each pile bottom to top.
    pub field: [Vec<Card>; FIELD_PILES],
    pub drawn_card: Option<Card>,
    pub joker_in_play: bool,
    pub winner: Option<PlayerId>,
    pub players: [PlayerSnapshot; 2],
}

impl BoardSnapshot {
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            round: state.round(),
            turn: state.turn_number(),
            turn_index: state.turn_index(),
            phase: state.phase(),
            age: state.age(),
            current_player: state.current_player(),
            deck_size: state.deck().len(),
            discard_size: state.discard().len(),
            field: std::array::from_fn(|i| state.field_pile(i).to_vec()),
            drawn_card: state.drawn_card(),
            joker_in_play: state.joker_in_play(),
            winner: state.winner(),
            players: PlayerId::ALL.map(|id| PlayerSnapshot::capture(state.player(id))),
        }
    }

    /// Visible top card of each pile.
    #[must_use]
    pub fn field_tops(&self) -> [Option<Card>; FIELD_PILES] {
        std::array::from_fn(|i| self.field[i].last().copied())
    }
}
