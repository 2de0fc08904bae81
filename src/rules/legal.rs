//! Legal-move enumeration.
//!
//! Disabled moves are reported with the reason they are disabled rather
//! than left out, so a front end can show them greyed out.

use crate::cards::{Card, CardKind};
use crate::core::PlayerId;
use crate::realm::CastleSlot;

use super::action::{ActionKind, ActionOption, Offer, RaidChoice, RoyalTarget};
use super::engine::GameState;
use super::phase::Phase;

impl GameState {
    /// Everything the current player could do with the held card.
    ///
    /// Empty outside the action phase. `Field` always comes first.
    #[must_use]
    pub fn available_actions(&self) -> Vec<ActionOption> {
        if self.phase != Phase::Action {
            return Vec::new();
        }
        let Some(card) = self.drawn_card() else {
            return Vec::new();
        };

        let mut options = vec![ActionOption::Available(Offer::Field)];
        match card.kind() {
            CardKind::Assassin => self.assassin_options(&mut options),
            CardKind::Soldier => self.soldier_options(card, &mut options),
            CardKind::Royal(_) => self.royal_options(card, &mut options),
            CardKind::Joker | CardKind::CastleMarker => {}
        }
        options
    }

    /// Offers only, dropping the disabled entries.
    #[must_use]
    pub fn available_offers(&self) -> Vec<Offer> {
        self.available_actions()
            .into_iter()
            .filter_map(|option| match option {
                ActionOption::Available(offer) => Some(offer),
                ActionOption::Unavailable { .. } => None,
            })
            .collect()
    }

    fn assassin_options(&self, options: &mut Vec<ActionOption>) {
        let targets = self.enemy_royals();
        if targets.is_empty() {
            options.push(ActionOption::unavailable(
                ActionKind::Assassinate,
                "No enemy royals in play to assassinate",
            ));
        } else {
            options.push(ActionOption::Available(Offer::Assassinate { targets }));
        }
    }

    fn soldier_options(&self, card: Card, options: &mut Vec<ActionOption>) {
        let Some(suit) = card.suit() else {
            return;
        };
        let me = self.player(self.current_player);
        let them = self.player(self.opponent());

        let alliance = me.alliance();
        if !alliance.is_active() && !alliance.is_destroyed() {
            if suit == alliance.suit() {
                options.push(ActionOption::Available(Offer::Persuade));
            } else {
                options.push(ActionOption::unavailable(
                    ActionKind::Persuade,
                    format!("Requires {} card (your alliance suit)", alliance.suit().name()),
                ));
            }
        }

        let enemy_alliance = them.alliance();
        if !enemy_alliance.is_active() && !enemy_alliance.is_destroyed() {
            if suit == me.primary_suit() {
                options.push(ActionOption::Available(Offer::Threaten));
            } else {
                options.push(ActionOption::unavailable(
                    ActionKind::Threaten,
                    format!("Requires {} card (your primary suit)", me.primary_suit().name()),
                ));
            }
        }

        for (slot, castle) in me.active_castles().filter(|(_, c)| c.suit() == suit) {
            let option = match castle.fortification() {
                None => ActionOption::Available(Offer::Fortify { castle: slot }),
                Some(current) if card.value() > current.value() => {
                    ActionOption::Available(Offer::UpgradeFortification { castle: slot })
                }
                Some(_) if !castle.fortification_damage().is_empty() => {
                    ActionOption::Available(Offer::RepairFortification { castle: slot })
                }
                Some(current) => ActionOption::unavailable(
                    ActionKind::Fortify,
                    format!("Current fortification ({}) is equal or stronger", current.value()),
                ),
            };
            options.push(option);
        }

        let attacker = me
            .castles_that_can_attack()
            .find(|(_, c)| c.suit() == suit);
        let inactive_match = me
            .surviving_castles()
            .any(|(_, c)| c.suit() == suit && !c.is_active());

        for (target, enemy) in them.active_castles() {
            match attacker {
                Some((attacker_slot, own)) => {
                    let offer = if enemy.fortification().is_some() {
                        Offer::Battle { target }
                    } else if own.has_royals() {
                        Offer::Raid {
                            target,
                            attacker: attacker_slot,
                        }
                    } else {
                        Offer::RaidNoDamage { target }
                    };
                    options.push(ActionOption::Available(offer));
                }
                None if inactive_match => {
                    options.push(ActionOption::unavailable(
                        ActionKind::Battle,
                        format!(
                            "You must first persuade {} castle to join your war",
                            suit.name()
                        ),
                    ));
                }
                None => {}
            }
        }
    }

    fn royal_options(&self, card: Card, options: &mut Vec<ActionOption>) {
        let Some(suit) = card.suit() else {
            return;
        };
        let me = self.player(self.current_player);

        let option = match me.slot_for_suit(suit) {
            None => ActionOption::unavailable(
                ActionKind::BringToPower,
                format!("This {} royal belongs to your enemy", suit.name()),
            ),
            Some(slot) => {
                let castle = me.castle(slot);
                if castle.is_destroyed() {
                    ActionOption::unavailable(
                        ActionKind::BringToPower,
                        format!("{} castle has been destroyed", suit.name()),
                    )
                } else if !castle.is_active() {
                    ActionOption::unavailable(
                        ActionKind::BringToPower,
                        format!(
                            "You must first persuade {} castle to join your war (20 persuasion needed)",
                            suit.name()
                        ),
                    )
                } else {
                    ActionOption::Available(Offer::BringToPower { castle: slot })
                }
            }
        };
        options.push(option);
    }

    /// Royals in the given player's surviving castles.
    #[must_use]
    pub fn royals_of(&self, player: PlayerId) -> Vec<RoyalTarget> {
        self.player(player)
            .surviving_castles()
            .flat_map(|(slot, castle)| {
                castle
                    .royals()
                    .iter()
                    .map(move |&royal| RoyalTarget { slot, royal })
            })
            .collect()
    }

    /// The current player's royals, the candidates for an assassin surprise.
    #[must_use]
    pub fn own_royals(&self) -> Vec<RoyalTarget> {
        self.royals_of(self.current_player)
    }

    /// The opponent's royals, the candidates for an assassination.
    #[must_use]
    pub fn enemy_royals(&self) -> Vec<RoyalTarget> {
        self.royals_of(self.opponent())
    }

    /// Follow-ups for the pending raid: always `Skip`, `Rescue` when the
    /// raided castle holds one of the raider's royals prisoner, and `Kill`
    /// plus `Kidnap` for every resident the attacking castle's highest royal
    /// outranks.
    #[must_use]
    pub fn raid_options(&self) -> Vec<RaidChoice> {
        let (Phase::RaidChoice, Some(raid)) = (self.phase, self.pending_raid) else {
            return Vec::new();
        };
        let me = self.player(self.current_player);
        let raided = self.player(self.opponent()).castle(raid.target);

        let mut choices = vec![RaidChoice::Skip];
        if raided.prisoner().is_some_and(|p| me.owns_card(p)) {
            choices.push(RaidChoice::Rescue);
        }
        if let Some(highest) = me.castle(raid.attacker).highest_royal() {
            for &royal in raided.royals() {
                if highest.can_outrank(royal) {
                    choices.push(RaidChoice::Kill(royal));
                    choices.push(RaidChoice::Kidnap(royal));
                }
            }
        }
        choices
    }

    /// The castle being raided and the castle raiding it, while a raid
    /// follow-up is pending.
    #[must_use]
    pub fn pending_raid(&self) -> Option<(CastleSlot, CastleSlot)> {
        self.pending_raid.map(|raid| (raid.target, raid.attacker))
    }
}
