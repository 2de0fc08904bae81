//! Castles: the suit-bound bases each player defends.
//!
//! A castle owns all the numeric bookkeeping of the game. Derived totals
//! (`fortification_strength`, `total_damage`, `net_persuasion`) are computed
//! from the stored card lists on every call, so they can never go stale.
//!
//! Operations that push cards out of play return them as `Discarded`; routing
//! them to the discard pile is the caller's job.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, Rank, Suit};

/// Permanent damage at which a castle is destroyed.
pub const DESTRUCTION_THRESHOLD: i32 = 20;

/// Net persuasion at which an alliance castle joins the war.
pub const ACTIVATION_THRESHOLD: i32 = 20;

/// Cards a castle operation pushed out of play.
pub type Discarded = SmallVec<[Card; 4]>;

fn sum(cards: &[Card]) -> i32 {
    cards.iter().map(|c| i32::from(c.value())).sum()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castle {
    suit: Suit,
    active: bool,
    destroyed: bool,
    marker: Card,
    royals: SmallVec<[Card; 3]>,
    fortification: Option<Card>,
    fortification_damage: Vec<Card>,
    permanent_damage: Vec<Card>,
    persuasion: Vec<Card>,
    threats: Vec<Card>,
    prisoner: Option<Card>,
}

impl Castle {
    /// Create a castle; its ace is the fixed castle marker.
    #[must_use]
    pub fn new(suit: Suit, active: bool) -> Self {
        Self {
            suit,
            active,
            destroyed: false,
            marker: Card::new(Rank::Ace, suit),
            royals: SmallVec::new(),
            fortification: None,
            fortification_damage: Vec::new(),
            permanent_damage: Vec::new(),
            persuasion: Vec::new(),
            threats: Vec::new(),
            prisoner: None,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Active and still standing.
    #[must_use]
    pub fn is_standing(&self) -> bool {
        self.active && !self.destroyed
    }

    #[must_use]
    pub fn marker(&self) -> Card {
        self.marker
    }

    /// Resident royals in arrival order.
    #[must_use]
    pub fn royals(&self) -> &[Card] {
        &self.royals
    }

    #[must_use]
    pub fn has_royals(&self) -> bool {
        !self.royals.is_empty()
    }

    #[must_use]
    pub fn royal_count(&self) -> usize {
        self.royals.len()
    }

    /// Highest-tier resident; the earliest arrival wins ties.
    #[must_use]
    pub fn highest_royal(&self) -> Option<Card> {
        self.royals
            .iter()
            .copied()
            .fold(None, |best: Option<Card>, card| match best {
                Some(b) if b.tier() >= card.tier() => Some(b),
                _ => Some(card),
            })
    }

    #[must_use]
    pub fn fortification(&self) -> Option<Card> {
        self.fortification
    }

    #[must_use]
    pub fn fortification_damage(&self) -> &[Card] {
        &self.fortification_damage
    }

    /// Fortification value minus accumulated damage; 0 when unfortified.
    #[must_use]
    pub fn fortification_strength(&self) -> i32 {
        self.fortification
            .map_or(0, |f| i32::from(f.value()) - sum(&self.fortification_damage))
    }

    #[must_use]
    pub fn permanent_damage(&self) -> &[Card] {
        &self.permanent_damage
    }

    #[must_use]
    pub fn total_damage(&self) -> i32 {
        sum(&self.permanent_damage)
    }

    #[must_use]
    pub fn persuasion_cards(&self) -> &[Card] {
        &self.persuasion
    }

    #[must_use]
    pub fn threat_cards(&self) -> &[Card] {
        &self.threats
    }

    #[must_use]
    pub fn total_persuasion(&self) -> i32 {
        sum(&self.persuasion)
    }

    #[must_use]
    pub fn total_threats(&self) -> i32 {
        sum(&self.threats)
    }

    #[must_use]
    pub fn net_persuasion(&self) -> i32 {
        self.total_persuasion() - self.total_threats()
    }

    #[must_use]
    pub fn prisoner(&self) -> Option<Card> {
        self.prisoner
    }

    // === Persuasion ===

    pub fn add_persuasion(&mut self, card: Card) -> Discarded {
        self.persuasion.push(card);
        self.square_up()
    }

    pub fn add_threat(&mut self, card: Card) -> Discarded {
        self.threats.push(card);
        self.square_up()
    }

    /// Threats that match or exceed persuasion cancel both piles out.
    fn square_up(&mut self) -> Discarded {
        if self.total_threats() >= self.total_persuasion() {
            self.drain_persuasion()
        } else {
            Discarded::new()
        }
    }

    fn drain_persuasion(&mut self) -> Discarded {
        self.persuasion.drain(..).chain(self.threats.drain(..)).collect()
    }

    /// Flip to active once net persuasion reaches the threshold.
    ///
    /// Returns the spent persuasion and threat cards if the castle activated.
    pub fn check_activation(&mut self) -> Option<Discarded> {
        if self.active || self.net_persuasion() < ACTIVATION_THRESHOLD {
            return None;
        }
        self.active = true;
        Some(self.drain_persuasion())
    }

    // === Fortification ===

    /// Install a new fortification, discarding the old one and its damage.
    pub fn add_fortification(&mut self, card: Card) -> Discarded {
        let mut discarded = Discarded::new();
        if let Some(old) = self.fortification.replace(card) {
            discarded.push(old);
            discarded.extend(self.fortification_damage.drain(..));
        }
        self.fortification_damage.clear();
        discarded
    }

    /// Chip the fortification. When strength drops to 0 or below, the
    /// fortification and every damage card on it are discarded.
    pub fn attack_fortification(&mut self, card: Card) -> Discarded {
        self.fortification_damage.push(card);
        if self.fortification_strength() > 0 {
            return Discarded::new();
        }

        let mut discarded = Discarded::new();
        discarded.extend(self.fortification.take());
        discarded.extend(self.fortification_damage.drain(..));
        discarded
    }

    // === Damage ===

    /// Add permanent damage. Returns true once the castle is destroyed.
    ///
    /// Destruction only flips the flag; emptying the castle is `raze`.
    pub fn add_permanent_damage(&mut self, card: Card) -> bool {
        self.permanent_damage.push(card);
        if self.total_damage() >= DESTRUCTION_THRESHOLD {
            self.destroyed = true;
        }
        self.destroyed
    }

    /// Empty a destroyed castle: marker, royals, damage, fortification,
    /// prisoner, and any leftover persuasion all go out of play.
    pub fn raze(&mut self) -> Vec<Card> {
        self.destroyed = true;
        let mut cards = vec![self.marker];
        cards.extend(self.royals.drain(..));
        cards.extend(self.permanent_damage.drain(..));
        cards.extend(self.fortification.take());
        cards.extend(self.fortification_damage.drain(..));
        cards.extend(self.prisoner.take());
        cards.extend(self.drain_persuasion());
        cards
    }

    // === Royals ===

    /// Seat a royal. Rejects non-royals, other suits, duplicates, and destroyed castles.
    pub fn add_royal(&mut self, card: Card) -> bool {
        let fits = card.is_royal()
            && card.suit() == Some(self.suit)
            && !self.destroyed
            && !self.royals.contains(&card);
        if fits {
            self.royals.push(card);
        }
        fits
    }

    /// Remove a royal if present; no-op otherwise.
    pub fn remove_royal(&mut self, card: Card) -> Option<Card> {
        let index = self.royals.iter().position(|&r| r == card)?;
        Some(self.royals.remove(index))
    }

    /// Take a royal prisoner, releasing any previous prisoner.
    pub fn kidnap(&mut self, royal: Card) -> Option<Card> {
        self.prisoner.replace(royal)
    }

    pub fn rescue_prisoner(&mut self) -> Option<Card> {
        self.prisoner.take()
    }
}
