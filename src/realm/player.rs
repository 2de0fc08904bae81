//! A seat's two castles and identity.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::core::PlayerId;

use super::castle::Castle;

/// Which of a player's two castles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSlot {
    /// Active from the start.
    Primary,
    /// Must be persuaded into the war.
    Alliance,
}

impl CastleSlot {
    pub const ALL: [CastleSlot; 2] = [CastleSlot::Primary, CastleSlot::Alliance];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    primary: Castle,
    alliance: Castle,
}

impl Player {
    /// Seat a player with their fixed suits: black plays spades (primary) and
    /// clubs (alliance), red plays hearts and diamonds.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        let (primary, alliance, name) = match id {
            PlayerId::One => (Suit::Spade, Suit::Club, "The Starless"),
            PlayerId::Two => (Suit::Heart, Suit::Diamond, "The Scarlett"),
        };
        Self {
            id,
            name: name.to_string(),
            primary: Castle::new(primary, true),
            alliance: Castle::new(alliance, false),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn primary_suit(&self) -> Suit {
        self.primary.suit()
    }

    #[must_use]
    pub fn alliance_suit(&self) -> Suit {
        self.alliance.suit()
    }

    #[must_use]
    pub fn castle(&self, slot: CastleSlot) -> &Castle {
        match slot {
            CastleSlot::Primary => &self.primary,
            CastleSlot::Alliance => &self.alliance,
        }
    }

    pub fn castle_mut(&mut self, slot: CastleSlot) -> &mut Castle {
        match slot {
            CastleSlot::Primary => &mut self.primary,
            CastleSlot::Alliance => &mut self.alliance,
        }
    }

    #[must_use]
    pub fn primary(&self) -> &Castle {
        &self.primary
    }

    #[must_use]
    pub fn alliance(&self) -> &Castle {
        &self.alliance
    }

    /// Both castles with their slots.
    pub fn castles(&self) -> impl Iterator<Item = (CastleSlot, &Castle)> {
        CastleSlot::ALL.into_iter().map(move |slot| (slot, self.castle(slot)))
    }

    /// Castles that are active and not destroyed.
    pub fn active_castles(&self) -> impl Iterator<Item = (CastleSlot, &Castle)> {
        self.castles().filter(|(_, c)| c.is_standing())
    }

    /// Castles that have not been destroyed.
    pub fn surviving_castles(&self) -> impl Iterator<Item = (CastleSlot, &Castle)> {
        self.castles().filter(|(_, c)| !c.is_destroyed())
    }

    /// Castles whose soldiers may fight: once a castle has joined the war its
    /// soldiers keep fighting even after the castle falls.
    pub fn castles_that_can_attack(&self) -> impl Iterator<Item = (CastleSlot, &Castle)> {
        self.castles().filter(|(_, c)| c.is_active())
    }

    #[must_use]
    pub fn slot_for_suit(&self, suit: Suit) -> Option<CastleSlot> {
        self.castles().find(|(_, c)| c.suit() == suit).map(|(slot, _)| slot)
    }

    #[must_use]
    pub fn castle_for_suit(&self, suit: Suit) -> Option<&Castle> {
        self.slot_for_suit(suit).map(|slot| self.castle(slot))
    }

    /// Whether the card is of one of this player's suits.
    #[must_use]
    pub fn owns_card(&self, card: Card) -> bool {
        card.suit().is_some_and(|s| self.slot_for_suit(s).is_some())
    }

    /// Royals residing in surviving castles.
    #[must_use]
    pub fn royal_count(&self) -> usize {
        self.surviving_castles().map(|(_, c)| c.royal_count()).sum()
    }

    #[must_use]
    pub fn has_active_castle(&self) -> bool {
        self.active_castles().next().is_some()
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        !self.has_active_castle()
    }
}
