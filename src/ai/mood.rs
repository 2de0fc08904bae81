//! AI mood: a persistent bias over action scores.
//!
//! The mood shifts at the start of the AI's own turns through an ordered
//! cascade of triggers. Each trigger whose condition holds rolls its own
//! probability; the first roll that succeeds decides the new mood and the
//! rest are skipped. Defensive triggers come before aggressive ones.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::rules::ActionKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Favors attacks.
    Aggressive,
    /// Favors protecting royals.
    Defensive,
    /// No bias.
    Opportunistic,
    /// Favors building power.
    Ambitious,
}

impl Mood {
    pub const ALL: [Mood; 4] = [
        Mood::Aggressive,
        Mood::Defensive,
        Mood::Opportunistic,
        Mood::Ambitious,
    ];

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Mood::Aggressive => "🔥",
            Mood::Defensive => "🛡️",
            Mood::Opportunistic => "🎯",
            Mood::Ambitious => "👑",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mood::Aggressive => "aggressive",
            Mood::Defensive => "defensive",
            Mood::Opportunistic => "opportunistic",
            Mood::Ambitious => "ambitious",
        }
    }

    /// Pick a starting mood uniformly.
    pub fn random(rng: &mut GameRng) -> Self {
        Self::ALL[rng.gen_range_usize(0..Self::ALL.len())]
    }

    /// Score adjustment this mood applies to an action kind.
    #[must_use]
    pub fn modifier(self, kind: ActionKind) -> f64 {
        use ActionKind as K;
        match (self, kind) {
            (Mood::Aggressive, K::Raid | K::Battle | K::Assassinate | K::Threaten) => 6.0,
            (Mood::Aggressive, K::Fortify | K::RepairFortification) => -3.0,
            (
                Mood::Defensive,
                K::Fortify | K::RepairFortification | K::UpgradeFortification,
            ) => 6.0,
            (Mood::Defensive, K::Raid | K::Battle) => -4.0,
            (Mood::Ambitious, K::BringToPower | K::Persuade) => 5.0,
            (Mood::Ambitious, K::Field) => -2.0,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the AI knows about the board when its mood is re-rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoodContext {
    pub my_royals: usize,
    pub enemy_royals: usize,
    /// Worst permanent damage on one of my surviving castles.
    pub my_damage: i32,
    /// Worst permanent damage on one of the enemy's surviving castles.
    pub enemy_damage: i32,
    /// One of my castles holds royals without a fortification.
    pub unprotected_royals: bool,
    pub alliance_persuasion: i32,
    pub alliance_active: bool,
    pub turns_since_attack: u32,
    pub turns_since_mood_change: u32,
    /// My own most recent action.
    pub last_action: Option<ActionKind>,
}

/// One rung of the cascade.
#[derive(Clone, Copy, Debug)]
pub struct MoodTrigger {
    pub applies: fn(&MoodContext, Mood) -> bool,
    pub probability: f64,
    pub mood: Mood,
    pub reason: &'static str,
}

/// Triggers in priority order.
pub const MOOD_TRIGGERS: [MoodTrigger; 9] = [
    MoodTrigger {
        applies: |ctx, mood| ctx.unprotected_royals && ctx.my_royals > 0 && mood != Mood::Defensive,
        probability: 0.7,
        mood: Mood::Defensive,
        reason: "royals exposed",
    },
    MoodTrigger {
        applies: |ctx, _| ctx.my_damage >= 15,
        probability: 0.8,
        mood: Mood::Defensive,
        reason: "castle critical",
    },
    MoodTrigger {
        applies: |ctx, mood| ctx.enemy_damage >= 12 && mood != Mood::Aggressive,
        probability: 0.6,
        mood: Mood::Aggressive,
        reason: "enemy weakened",
    },
    MoodTrigger {
        applies: |ctx, _| ctx.turns_since_attack >= 3 && ctx.my_royals > 0,
        probability: 0.5,
        mood: Mood::Aggressive,
        reason: "antsy",
    },
    MoodTrigger {
        applies: |ctx, _| ctx.alliance_persuasion >= 12 && !ctx.alliance_active,
        probability: 0.6,
        mood: Mood::Ambitious,
        reason: "alliance close",
    },
    MoodTrigger {
        applies: |ctx, _| ctx.my_royals == 0 && ctx.enemy_royals > 0,
        probability: 0.5,
        mood: Mood::Ambitious,
        reason: "need royals",
    },
    MoodTrigger {
        applies: |ctx, _| ctx.turns_since_mood_change >= 4,
        probability: 0.3,
        mood: Mood::Opportunistic,
        reason: "reassessing",
    },
    MoodTrigger {
        applies: |ctx, _| {
            matches!(
                ctx.last_action,
                Some(ActionKind::Fortify | ActionKind::RepairFortification)
            )
        },
        probability: 0.4,
        mood: Mood::Aggressive,
        reason: "feeling secure",
    },
    MoodTrigger {
        applies: |ctx, _| {
            matches!(
                ctx.last_action,
                Some(ActionKind::Raid | ActionKind::Battle | ActionKind::Assassinate)
            )
        },
        probability: 0.3,
        mood: Mood::Opportunistic,
        reason: "satisfied",
    },
];

/// Walk the cascade and return the first trigger that fires, if any.
///
/// A fired trigger may name the current mood; the caller then keeps it.
pub fn roll_mood_shift(
    ctx: &MoodContext,
    current: Mood,
    rng: &mut GameRng,
) -> Option<&'static MoodTrigger> {
    MOOD_TRIGGERS
        .iter()
        .filter(|trigger| (trigger.applies)(ctx, current))
        .find(|trigger| rng.gen_bool(trigger.probability))
}
