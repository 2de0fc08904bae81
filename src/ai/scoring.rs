//! Base action scores.
//!
//! Each offer is scored on its own, before mood and noise. Scores are on a
//! loose 0..50 scale; anything at or below zero is never worth playing over
//! fielding the card.

use crate::cards::Card;
use crate::core::PlayerId;
use crate::realm::{CastleSlot, ACTIVATION_THRESHOLD};
use crate::rules::{GameState, Offer, FIELD_PILES};

use super::evaluate::CardEvaluator;

/// What the visible field tops mean to one seat.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSurvey {
    /// Highest opponent value among the tops.
    pub best_cover_value: f64,
    /// Last pile whose top is an assassin.
    pub assassin_pile: Option<usize>,
    /// Some top is a royal for one of my standing castles.
    pub desirable_royal: bool,
}

impl FieldSurvey {
    #[must_use]
    pub fn take(state: &GameState, me: PlayerId) -> Self {
        let eval = CardEvaluator::new(state, me);
        let player = state.player(me);
        let mut survey = Self::default();
        for pile in 0..FIELD_PILES {
            let Some(top) = state.field_top(pile) else {
                continue;
            };
            survey.best_cover_value = survey.best_cover_value.max(eval.value_to_opponent(top));
            if top.is_assassin() {
                survey.assassin_pile = Some(pile);
            }
            if top.is_royal()
                && top
                    .suit()
                    .and_then(|suit| player.castle_for_suit(suit))
                    .is_some_and(|castle| castle.is_standing())
            {
                survey.desirable_royal = true;
            }
        }
        survey
    }

    /// Covering the assassin now makes the royal safe to take next turn.
    #[must_use]
    pub fn assassin_guards_royal(&self) -> bool {
        self.desirable_royal && self.assassin_pile.is_some()
    }
}

/// Score an offer for the current player holding `card`.
#[must_use]
pub fn score_offer(state: &GameState, card: Card, offer: &Offer) -> f64 {
    let me = state.current_player();
    let mine = state.player(me);
    let theirs = state.player(me.opponent());
    let value = f64::from(card.value());

    match offer {
        Offer::Field => {
            let survey = FieldSurvey::take(state, me);
            let mut score = 1.0 + survey.best_cover_value * 0.3;
            if survey.assassin_guards_royal() {
                score += 12.0;
            }
            if state.is_last_turn_of_round() {
                score *= 0.1;
            }
            score.min(20.0)
        }
        Offer::BringToPower { castle } => {
            let castle = mine.castle(*castle);
            let mut score = match castle.royal_count() {
                0 => 22.0,
                1 => 12.0,
                _ => 6.0,
            };
            if castle.fortification().is_some() {
                score += 8.0;
            } else if state.field_tops().iter().flatten().any(|c| c.is_assassin()) {
                score -= 18.0;
            }
            score
        }
        Offer::Assassinate { .. } => match theirs.royal_count() {
            1 => 50.0,
            2 => 35.0,
            _ => 28.0,
        },
        Offer::Persuade => {
            let net = mine.castle(CastleSlot::Alliance).net_persuasion();
            if net + i32::from(card.value()) >= ACTIVATION_THRESHOLD {
                40.0
            } else {
                14.0 + value * 0.5
            }
        }
        Offer::Threaten => {
            let net = theirs.castle(CastleSlot::Alliance).net_persuasion();
            if net >= 15 {
                20.0
            } else if net >= 10 {
                12.0
            } else {
                5.0
            }
        }
        Offer::Fortify { castle } => {
            if mine.castle(*castle).has_royals() {
                25.0 + value * 0.3
            } else {
                10.0 + value * 0.2
            }
        }
        Offer::UpgradeFortification { castle } => {
            if mine.castle(*castle).has_royals() {
                18.0 + value * 0.2
            } else {
                8.0
            }
        }
        Offer::RepairFortification { castle } => {
            let castle = mine.castle(*castle);
            let damage = castle.fortification_damage().len();
            if castle.has_royals() && damage > 0 {
                26.0 + 2.0 * damage as f64
            } else {
                10.0
            }
        }
        Offer::Battle { target } => {
            let target = theirs.castle(*target);
            let breaks = i32::from(card.value()) >= target.fortification_strength();
            match (breaks, target.has_royals()) {
                (true, true) => 24.0,
                (true, false) => 18.0,
                (false, _) => 6.0,
            }
        }
        Offer::Raid { target, attacker } => {
            let mut score = 30.0;
            if theirs.castle(*target).has_royals() {
                score += 8.0;
            }
            if mine.castle(*attacker).royal_count() == 1 {
                score -= 5.0;
            }
            score
        }
        Offer::RaidNoDamage { .. } => -10.0,
    }
}
