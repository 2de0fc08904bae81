//! Action descriptors.
//!
//! Legal-move enumeration produces `ActionOption`s: either an `Offer` the
//! player may take, or the kind of action with the reason it is unavailable
//! (kept so a UI can show disabled buttons). Executing a move takes an
//! `Action`, which carries the concrete choice (pile index, assassination
//! target) where the offer left one open.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::PlayerId;
use crate::realm::CastleSlot;

/// Action type, independent of targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Field,
    Assassinate,
    Persuade,
    Threaten,
    Fortify,
    UpgradeFortification,
    RepairFortification,
    Battle,
    Raid,
    RaidNoDamage,
    BringToPower,
}

impl ActionKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Field => "field",
            ActionKind::Assassinate => "assassinate",
            ActionKind::Persuade => "persuade",
            ActionKind::Threaten => "threaten",
            ActionKind::Fortify => "fortify",
            ActionKind::UpgradeFortification => "upgrade-fortification",
            ActionKind::RepairFortification => "repair-fortification",
            ActionKind::Battle => "battle",
            ActionKind::Raid => "raid",
            ActionKind::RaidNoDamage => "raid-no-damage",
            ActionKind::BringToPower => "bring-to-power",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A royal sitting in a specific castle. Whose castle depends on context:
/// the opponent's for assassinations, the actor's own for a sacrifice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoyalTarget {
    pub slot: CastleSlot,
    pub royal: Card,
}

/// An enabled move. Castle slots in `Fortify*`/`BringToPower`/`attacker`
/// refer to the actor's castles; `target` refers to the opponent's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offer {
    /// Place the card face-up on any field pile.
    Field,
    Assassinate { targets: Vec<RoyalTarget> },
    Persuade,
    Threaten,
    Fortify { castle: CastleSlot },
    UpgradeFortification { castle: CastleSlot },
    RepairFortification { castle: CastleSlot },
    Battle { target: CastleSlot },
    Raid { target: CastleSlot, attacker: CastleSlot },
    RaidNoDamage { target: CastleSlot },
    BringToPower { castle: CastleSlot },
}

impl Offer {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Offer::Field => ActionKind::Field,
            Offer::Assassinate { .. } => ActionKind::Assassinate,
            Offer::Persuade => ActionKind::Persuade,
            Offer::Threaten => ActionKind::Threaten,
            Offer::Fortify { .. } => ActionKind::Fortify,
            Offer::UpgradeFortification { .. } => ActionKind::UpgradeFortification,
            Offer::RepairFortification { .. } => ActionKind::RepairFortification,
            Offer::Battle { .. } => ActionKind::Battle,
            Offer::Raid { .. } => ActionKind::Raid,
            Offer::RaidNoDamage { .. } => ActionKind::RaidNoDamage,
            Offer::BringToPower { .. } => ActionKind::BringToPower,
        }
    }

    /// The command for this offer when it leaves nothing to choose.
    ///
    /// `Field` still needs a pile and `Assassinate` a target, so both return `None`.
    #[must_use]
    pub fn to_action(&self) -> Option<Action> {
        match *self {
            Offer::Field | Offer::Assassinate { .. } => None,
            Offer::Persuade => Some(Action::Persuade),
            Offer::Threaten => Some(Action::Threaten),
            Offer::Fortify { castle } => Some(Action::Fortify { castle }),
            Offer::UpgradeFortification { castle } => Some(Action::UpgradeFortification { castle }),
            Offer::RepairFortification { castle } => Some(Action::RepairFortification { castle }),
            Offer::Battle { target } => Some(Action::Battle { target }),
            Offer::Raid { target, attacker } => Some(Action::Raid { target, attacker }),
            Offer::RaidNoDamage { target } => Some(Action::RaidNoDamage { target }),
            Offer::BringToPower { castle } => Some(Action::BringToPower { castle }),
        }
    }
}

/// One entry of the legal-action enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOption {
    Available(Offer),
    Unavailable { kind: ActionKind, reason: String },
}

impl ActionOption {
    pub(crate) fn unavailable(kind: ActionKind, reason: impl Into<String>) -> Self {
        ActionOption::Unavailable {
            kind,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionOption::Available(offer) => offer.kind(),
            ActionOption::Unavailable { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, ActionOption::Available(_))
    }

    #[must_use]
    pub fn offer(&self) -> Option<&Offer> {
        match self {
            ActionOption::Available(offer) => Some(offer),
            ActionOption::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            ActionOption::Available(_) => None,
            ActionOption::Unavailable { reason, .. } => Some(reason),
        }
    }
}

/// A move to execute with the held card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Field { pile: usize },
    Assassinate { target: RoyalTarget },
    Persuade,
    Threaten,
    Fortify { castle: CastleSlot },
    UpgradeFortification { castle: CastleSlot },
    RepairFortification { castle: CastleSlot },
    Battle { target: CastleSlot },
    Raid { target: CastleSlot, attacker: CastleSlot },
    RaidNoDamage { target: CastleSlot },
    BringToPower { castle: CastleSlot },
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Field { .. } => ActionKind::Field,
            Action::Assassinate { .. } => ActionKind::Assassinate,
            Action::Persuade => ActionKind::Persuade,
            Action::Threaten => ActionKind::Threaten,
            Action::Fortify { .. } => ActionKind::Fortify,
            Action::UpgradeFortification { .. } => ActionKind::UpgradeFortification,
            Action::RepairFortification { .. } => ActionKind::RepairFortification,
            Action::Battle { .. } => ActionKind::Battle,
            Action::Raid { .. } => ActionKind::Raid,
            Action::RaidNoDamage { .. } => ActionKind::RaidNoDamage,
            Action::BringToPower { .. } => ActionKind::BringToPower,
        }
    }

    /// Whether this command is one of the choices the offer allows.
    #[must_use]
    pub fn fulfils(&self, offer: &Offer) -> bool {
        match (self, offer) {
            (Action::Field { .. }, Offer::Field) => true,
            (Action::Assassinate { target }, Offer::Assassinate { targets }) => {
                targets.contains(target)
            }
            _ => offer.to_action().as_ref() == Some(self),
        }
    }
}

/// Follow-up after a raid that left the target standing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaidChoice {
    Skip,
    /// Free the actor's royal held prisoner in the raided castle.
    Rescue,
    Kill(Card),
    Kidnap(Card),
}

/// History entry for an executed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub kind: ActionKind,
    pub round: u32,
    pub turn: u32,
}
