//! Card valuation from both sides of the table.
//!
//! `value_to_me` asks "what could I do with this card right now?" and
//! `value_to_opponent` asks the same for the other seat. Draw choice and
//! field-pile choice are built on these two numbers.

use crate::cards::{Card, CardKind, Suit};
use crate::core::PlayerId;
use crate::realm::{Castle, CastleSlot, Player, ACTIVATION_THRESHOLD};
use crate::rules::GameState;

/// Score for a royal arriving in a castle with 0, 1, or 2+ residents.
fn royal_arrival_value(existing: usize) -> f64 {
    match existing {
        0 => 20.0,
        1 => 10.0,
        _ => 5.0,
    }
}

/// Assassin value by how many targets the opponent has.
fn assassin_value(enemy_royals: usize) -> f64 {
    match enemy_royals {
        0 => 1.0,
        1 => 35.0,
        2 => 28.0,
        _ => 22.0,
    }
}

/// Values cards for one seat of a game in progress.
#[derive(Clone, Copy)]
pub struct CardEvaluator<'a> {
    state: &'a GameState,
    me: PlayerId,
}

impl<'a> CardEvaluator<'a> {
    #[must_use]
    pub fn new(state: &'a GameState, me: PlayerId) -> Self {
        Self { state, me }
    }

    fn mine(&self) -> &'a Player {
        self.state.player(self.me)
    }

    fn theirs(&self) -> &'a Player {
        self.state.player(self.me.opponent())
    }

    /// How useful the card is to me this turn.
    #[must_use]
    pub fn value_to_me(&self, card: Card) -> f64 {
        match card.kind() {
            CardKind::Joker | CardKind::CastleMarker => 0.0,
            CardKind::Assassin => assassin_value(self.theirs().royal_count()),
            CardKind::Royal(_) => match self.usable_castle(self.mine(), card) {
                Some(castle) => royal_arrival_value(castle.royal_count()),
                None => 2.0,
            },
            CardKind::Soldier => self.soldier_value(card).max(1.0),
        }
    }

    /// How useful the card would be to my opponent.
    #[must_use]
    pub fn value_to_opponent(&self, card: Card) -> f64 {
        let opponent = self.theirs();
        match card.kind() {
            CardKind::Joker | CardKind::CastleMarker => 0.0,
            CardKind::Assassin => {
                let mine = self.mine().royal_count();
                if mine > 0 {
                    20.0 + 5.0 * mine as f64
                } else {
                    1.0
                }
            }
            CardKind::Royal(_) => {
                if self.usable_castle(opponent, card).is_some() {
                    15.0
                } else {
                    2.0
                }
            }
            CardKind::Soldier => {
                let Some(suit) = card.suit() else {
                    return 1.0;
                };
                let value = f64::from(card.value());
                let alliance = opponent.alliance();
                let score = if suit == opponent.alliance_suit() && !alliance.is_active() {
                    if alliance.net_persuasion() + i32::from(card.value()) >= ACTIVATION_THRESHOLD
                    {
                        25.0
                    } else {
                        value + 10.0
                    }
                } else if suit == opponent.primary_suit() {
                    value + 6.0
                } else if suit == opponent.alliance_suit() {
                    value + 4.0
                } else {
                    0.0
                };
                score.max(1.0)
            }
        }
    }

    /// The owner's active, standing castle of the card's suit.
    fn usable_castle(&self, owner: &'a Player, card: Card) -> Option<&'a Castle> {
        card.suit()
            .and_then(|suit| owner.castle_for_suit(suit))
            .filter(|castle| castle.is_standing())
    }

    fn soldier_value(&self, card: Card) -> f64 {
        let Some(suit) = card.suit() else {
            return 0.0;
        };
        let me = self.mine();
        let value = f64::from(card.value());
        let mut best = 0.0_f64;

        if let Some(slot) = me.slot_for_suit(suit) {
            let castle = me.castle(slot);
            if castle.is_standing() && castle.has_royals() {
                if castle.fortification().is_none() {
                    best = best.max(25.0 + 0.3 * value);
                } else if !castle.fortification_damage().is_empty() {
                    best = best.max(24.0);
                }
            }

            if slot == CastleSlot::Alliance && !castle.is_active() && !castle.is_destroyed() {
                let reaches = castle.net_persuasion() + i32::from(card.value())
                    >= ACTIVATION_THRESHOLD;
                best = best.max(if reaches { 30.0 } else { 14.0 + 0.5 * value });
            }

            if castle.is_standing() && !castle.has_royals() {
                best = best.max(11.0 + 0.3 * value);
            }
        }

        best.max(self.attack_value(suit, card.value()))
    }

    /// Best attack this soldier enables against a standing enemy castle.
    fn attack_value(&self, suit: Suit, value: u8) -> f64 {
        let Some(attacker) = self
            .mine()
            .castles_that_can_attack()
            .find(|(_, c)| c.suit() == suit)
            .map(|(_, c)| c)
        else {
            return 0.0;
        };

        self.theirs()
            .active_castles()
            .map(|(_, target)| {
                if target.fortification().is_some() {
                    if i32::from(value) >= target.fortification_strength() {
                        18.0
                    } else {
                        6.0
                    }
                } else if attacker.has_royals() {
                    if target.has_royals() {
                        28.0
                    } else {
                        26.0
                    }
                } else {
                    12.0
                }
            })
            .fold(0.0, f64::max)
    }
}
