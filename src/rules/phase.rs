//! Turn phases and the global Age.

use serde::{Deserialize, Serialize};

/// State-machine phase.
///
/// `Setup → Flop → Draw → Action → {FieldSelect | RaidChoice |
/// AssassinSurprise} → Draw (next turn) → … → GameOver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Setup,
    Flop,
    Draw,
    Action,
    FieldSelect,
    RaidChoice,
    AssassinSurprise,
    GameOver,
}

impl Phase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Flop => "flop",
            Phase::Draw => "draw",
            Phase::Action => "action",
            Phase::FieldSelect => "field-select",
            Phase::RaidChoice => "raid-choice",
            Phase::AssassinSurprise => "assassin-surprise",
            Phase::GameOver => "game-over",
        }
    }

    /// Phases in which the current player must decide something.
    #[must_use]
    pub const fn awaits_player(self) -> bool {
        matches!(
            self,
            Phase::Draw
                | Phase::Action
                | Phase::FieldSelect
                | Phase::RaidChoice
                | Phase::AssassinSurprise
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The Age flips while a joker is in play and decides who moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Age {
    /// No joker in play: fewer visible cards of your color means you go first.
    Uprising,
    /// A joker in play: more visible cards of your color means you go first.
    Oppression,
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Uprising => f.write_str("Uprising"),
            Age::Oppression => f.write_str("Oppression"),
        }
    }
}
