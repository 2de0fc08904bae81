//! Action execution: the only way castles change during play.

use tracing::trace;

use crate::cards::Card;
use crate::core::{GameError, PlayerId, Result};
use crate::realm::{CastleSlot, ACTIVATION_THRESHOLD, DESTRUCTION_THRESHOLD};

use super::action::{Action, ActionKind, ActionOption, RaidChoice, RoyalTarget};
use super::engine::{GameState, PendingRaid, FIELD_PILES};
use super::phase::Phase;

impl GameState {
    /// Move to choosing a field pile for the held card.
    pub fn begin_field_select(&mut self) -> Result<()> {
        self.require_phase(Phase::Action)?;
        self.drawn.ok_or(GameError::NoDrawnCard)?;
        self.phase = Phase::FieldSelect;
        self.touch();
        Ok(())
    }

    /// Play the held card.
    ///
    /// The action must be one of the offers from `available_actions`. A raid
    /// that leaves its target standing opens the raid-choice phase; every
    /// other action ends the turn.
    pub fn execute_action(&mut self, action: Action) -> Result<()> {
        match (self.phase, action) {
            (Phase::GameOver, _) => return Err(GameError::GameOver),
            (Phase::Action, _) | (Phase::FieldSelect, Action::Field { .. }) => {}
            (Phase::FieldSelect, _) => {
                return Err(GameError::ActionUnavailable {
                    kind: action.kind(),
                    reason: "a field pile must be chosen".to_string(),
                })
            }
            (actual, _) => {
                return Err(GameError::WrongPhase {
                    expected: Phase::Action,
                    actual,
                })
            }
        }
        let card = self.drawn_card().ok_or(GameError::NoDrawnCard)?;
        self.check_offered(action)?;
        trace!(player = %self.current_player, %card, ?action, "executing action");

        let actor = self.current_player;
        let enemy = actor.opponent();
        let name = self.player_name(actor);
        let value = i32::from(card.value());

        match action {
            Action::Field { pile } => {
                let covered = self.field[pile].last().copied();
                self.field[pile].push(card);
                match covered {
                    Some(under) => self.log_message(format!("{name} fielded {card} (covered {under})")),
                    None => self.log_message(format!("{name} fielded {card}")),
                }
            }

            Action::Persuade => {
                let castle = self.players[actor].castle_mut(CastleSlot::Alliance);
                let squared = castle.add_persuasion(card);
                let total = castle.net_persuasion();
                let activated = castle.check_activation();
                self.discard.extend(squared);
                self.log_message(format!(
                    "{name} persuaded alliance (+{value}, total: {total}/{ACTIVATION_THRESHOLD})"
                ));
                if let Some(spent) = activated {
                    self.discard.extend(spent);
                    self.log_message(format!("🏰 {name}'s alliance castle is now ACTIVE!"));
                }
            }

            Action::Threaten => {
                let squared = self.players[enemy]
                    .castle_mut(CastleSlot::Alliance)
                    .add_threat(card);
                self.log_message(format!("{name} threatened enemy alliance (+{value} threat)"));
                if !squared.is_empty() {
                    self.discard.extend(squared);
                    let enemy_name = self.player_name(enemy);
                    self.log_message(format!(
                        "{enemy_name}'s alliance persuasion was squared up"
                    ));
                }
            }

            Action::Fortify { castle }
            | Action::UpgradeFortification { castle }
            | Action::RepairFortification { castle } => {
                let target = self.players[actor].castle_mut(castle);
                let suit = target.suit();
                let replaced = target.add_fortification(card);
                self.discard.extend(replaced);
                self.log_message(format!(
                    "{name} fortified {} castle (strength: {value})",
                    suit.name()
                ));
            }

            Action::Battle { target } => {
                let castle = self.players[enemy].castle_mut(target);
                let suit = castle.suit();
                let broken = castle.attack_fortification(card);
                let remaining = castle.fortification_strength();
                if broken.is_empty() {
                    self.log_message(format!(
                        "{name} attacked {} fortification (remaining: {remaining})",
                        suit.name()
                    ));
                } else {
                    self.discard.extend(broken);
                    self.log_message(format!("{name} destroyed {} fortification!", suit.name()));
                }
            }

            Action::Raid { target, attacker } => {
                let castle = self.players[enemy].castle_mut(target);
                let suit = castle.suit();
                let destroyed = castle.add_permanent_damage(card);
                let total = castle.total_damage();
                self.log_message(format!(
                    "{name} raided {} castle (+{value} damage, total: {total}/{DESTRUCTION_THRESHOLD})",
                    suit.name()
                ));
                self.drawn = None;
                self.record_action(ActionKind::Raid);

                if destroyed {
                    self.destroy_castle(enemy, target);
                } else {
                    self.pending_raid = Some(PendingRaid { target, attacker });
                    self.phase = Phase::RaidChoice;
                    self.touch();
                    return Ok(());
                }
                self.touch();
                self.end_turn();
                return Ok(());
            }

            Action::RaidNoDamage { target } => {
                let suit = self.players[enemy].castle(target).suit();
                self.discard.push(card);
                self.log_message(format!(
                    "{name} raided {} castle (no damage - no royal in attacking castle)",
                    suit.name()
                ));
            }

            Action::BringToPower { castle } => {
                self.players[actor].castle_mut(castle).add_royal(card);
                self.log_message(format!("{name} brought {card} to power!"));
            }

            Action::Assassinate { target } => {
                let killed = self.players[enemy]
                    .castle_mut(target.slot)
                    .remove_royal(target.royal)
                    .ok_or(GameError::RoyalNotFound)?;
                self.discard.push(killed);
                self.discard.push(card);
                self.log_message(format!("{name} assassinated {killed}!"));
            }
        }

        self.drawn = None;
        self.record_action(action.kind());
        self.touch();
        self.end_turn();
        Ok(())
    }

    /// Reject anything that is not among the current offers, carrying the
    /// disabled reason when the kind was listed as unavailable.
    fn check_offered(&self, action: Action) -> Result<()> {
        if let Action::Field { pile } = action {
            return if pile < FIELD_PILES {
                Ok(())
            } else {
                Err(GameError::PileOutOfRange(pile))
            };
        }

        let options = self.available_actions();
        let offered = options
            .iter()
            .filter_map(ActionOption::offer)
            .any(|offer| action.fulfils(offer));
        if offered {
            return Ok(());
        }

        let reason = options
            .iter()
            .find(|option| option.kind() == action.kind())
            .and_then(ActionOption::reason)
            .unwrap_or("not offered for the held card");
        Err(GameError::ActionUnavailable {
            kind: action.kind(),
            reason: reason.to_string(),
        })
    }

    /// Resolve the follow-up to a raid, then end the turn.
    pub fn execute_raid_choice(&mut self, choice: RaidChoice) -> Result<()> {
        self.require_phase(Phase::RaidChoice)?;
        let raid = self.pending_raid.ok_or(GameError::NoPendingRaid)?;
        if !self.raid_options().contains(&choice) {
            return Err(GameError::InvalidRaidChoice);
        }

        let actor = self.current_player;
        let enemy = actor.opponent();
        let name = self.player_name(actor);

        match choice {
            RaidChoice::Skip => {
                self.log_message(format!("{name} chose not to take additional raid action."));
            }

            RaidChoice::Kill(royal) => {
                if let Some(killed) = self.players[enemy].castle_mut(raid.target).remove_royal(royal) {
                    self.discard.push(killed);
                    self.log_message(format!("{name} killed {killed}!"));
                }
            }

            RaidChoice::Kidnap(royal) => {
                if let Some(taken) = self.players[enemy].castle_mut(raid.target).remove_royal(royal) {
                    let released = self.players[actor].castle_mut(raid.attacker).kidnap(taken);
                    match released {
                        Some(freed) => {
                            self.field[0].push(freed);
                            self.log_message(format!(
                                "{name} kidnapped {taken}, releasing {freed}!"
                            ));
                        }
                        None => self.log_message(format!("{name} kidnapped {taken}!")),
                    }
                }
            }

            RaidChoice::Rescue => {
                if let Some(rescued) = self.players[enemy].castle_mut(raid.target).rescue_prisoner() {
                    self.return_home(actor, rescued, &name);
                }
            }
        }

        self.pending_raid = None;
        self.touch();
        self.end_turn();
        Ok(())
    }

    /// Seat a rescued royal back in its castle, or discard it if that castle
    /// has fallen in the meantime.
    fn return_home(&mut self, owner: PlayerId, royal: Card, name: &str) {
        let home = royal
            .suit()
            .and_then(|suit| self.players[owner].slot_for_suit(suit));
        let seated = home.is_some_and(|slot| self.players[owner].castle_mut(slot).add_royal(royal));
        if seated {
            self.log_message(format!("{name} rescued {royal}!"));
        } else {
            self.discard.push(royal);
            self.log_message(format!("{name} rescued {royal}, but its castle has fallen."));
        }
    }

    /// Resolve an assassin drawn from the deck: the drawer gives up one of
    /// their own royals. `None` is only accepted when they have none.
    pub fn execute_assassin_surprise(&mut self, target: Option<RoyalTarget>) -> Result<()> {
        self.require_phase(Phase::AssassinSurprise)?;
        let assassin = self.drawn_card().ok_or(GameError::NoDrawnCard)?;
        let royals = self.own_royals();

        match target {
            Some(target) => {
                if !royals.contains(&target) {
                    return Err(GameError::RoyalNotFound);
                }
                let killed = self.players[self.current_player]
                    .castle_mut(target.slot)
                    .remove_royal(target.royal)
                    .ok_or(GameError::RoyalNotFound)?;
                self.discard.push(killed);
                self.discard.push(assassin);
                self.log_message(format!("Assassin killed {killed}!"));
            }
            None if !royals.is_empty() => return Err(GameError::SacrificeRequired),
            None => {
                self.discard.push(assassin);
                self.log_message("Assassin found no royals to kill.");
            }
        }

        self.drawn = None;
        self.touch();
        self.end_turn();
        Ok(())
    }

    /// Raze a castle that reached the damage threshold and check for victory.
    fn destroy_castle(&mut self, owner: PlayerId, slot: CastleSlot) {
        let castle = self.players[owner].castle_mut(slot);
        let suit = castle.suit();
        let cards = castle.raze();
        self.discard.extend(cards);
        self.log_message(format!(
            "💀 {} CASTLE DESTROYED!",
            suit.name().to_uppercase()
        ));

        if self.players[owner].is_defeated() {
            self.phase = Phase::GameOver;
            self.winner = Some(self.current_player);
            self.drawn = None;
            self.pending_raid = None;
            let name = self.player_name(self.current_player);
            self.log_message(format!("🏆 {name} WINS!"));
        }
    }
}
