//! Per-game records and the log capture sink.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ai::Mood;
use crate::cards::Card;
use crate::core::{LogEntry, LogSink, PlayerId, PlayerMap};
use crate::rules::{ActionKind, ActionRecord, BoardSnapshot, GameState};

/// One captured log message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub round: u32,
    pub turn: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<BoardSnapshot>,
}

/// Shared list of captured events. The game owns the sink; the simulator
/// keeps this handle to read the events back afterwards.
#[derive(Clone, Debug, Default)]
pub struct EventBuffer(Rc<RefCell<Vec<LoggedEvent>>>);

impl EventBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every captured event out of the buffer.
    #[must_use]
    pub fn take(&self) -> Vec<LoggedEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// `LogSink` that keeps every message, unbounded, optionally with a board
/// snapshot.
#[derive(Debug)]
pub struct CaptureSink {
    events: EventBuffer,
    snapshots: bool,
}

impl CaptureSink {
    /// Create a sink and the handle to read it from.
    #[must_use]
    pub fn new(snapshots: bool) -> (Self, EventBuffer) {
        let events = EventBuffer::default();
        let sink = Self {
            events: events.clone(),
            snapshots,
        };
        (sink, events)
    }
}

impl LogSink for CaptureSink {
    fn wants_snapshot(&self) -> bool {
        self.snapshots
    }

    fn record(&mut self, entry: &LogEntry, snapshot: Option<BoardSnapshot>) {
        self.events.0.borrow_mut().push(LoggedEvent {
            round: entry.round,
            turn: entry.turn,
            message: entry.text.clone(),
            snapshot,
        });
    }

    fn retract(&mut self) {
        self.events.0.borrow_mut().pop();
    }
}

/// Base score of one offered action at a decision point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredKind {
    pub kind: ActionKind,
    pub score: f64,
}

/// What an agent was looking at when it chose an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub player: PlayerId,
    pub round: u32,
    pub turn: u32,
    pub mood: Option<Mood>,
    pub card: Card,
    /// Offers sorted best first, before mood and noise.
    pub options: Vec<ScoredKind>,
}

/// A mood observed at a decision, recorded whenever it differs from the
/// previous one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodChange {
    pub turn: u32,
    pub mood: Mood,
}

/// Per-seat tallies for one game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub royals_placed: u32,
    pub royals_killed: u32,
    pub royals_kidnapped: u32,
    pub raids: u32,
    pub damage_dealt: u32,
    pub fortifications: u32,
    pub action_counts: FxHashMap<ActionKind, u32>,
    pub mood_changes: Vec<MoodChange>,
}

/// Damage figure from a message like `"... (+7 damage, total: 12/20)"`.
fn raid_damage(message: &str) -> Option<u32> {
    let (_, rest) = message.split_once("(+")?;
    let (number, _) = rest.split_once(" damage")?;
    number.parse().ok()
}

impl PlayerStats {
    /// Tally one seat's game from the action history, the messages it
    /// authored, and its decisions.
    #[must_use]
    pub fn tally(
        seat: PlayerId,
        name: &str,
        history: &[ActionRecord],
        events: &[LoggedEvent],
        decisions: &[Decision],
    ) -> Self {
        let mut stats = Self::default();
        for record in history.iter().filter(|r| r.player == seat) {
            *stats.action_counts.entry(record.kind).or_insert(0) += 1;
            match record.kind {
                ActionKind::BringToPower => stats.royals_placed += 1,
                ActionKind::Raid | ActionKind::RaidNoDamage => stats.raids += 1,
                ActionKind::Fortify
                | ActionKind::UpgradeFortification
                | ActionKind::RepairFortification => stats.fortifications += 1,
                _ => {}
            }
        }

        let prefix = format!("{name} ");
        for event in events.iter().filter(|e| e.message.starts_with(&prefix)) {
            let message = &event.message;
            if message.contains(" killed ") {
                stats.royals_killed += 1;
            }
            if message.contains(" kidnapped ") {
                stats.royals_kidnapped += 1;
            }
            if message.contains(" raided ") {
                stats.damage_dealt += raid_damage(message).unwrap_or(0);
            }
        }

        let mut last = None;
        for decision in decisions.iter().filter(|d| d.player == seat) {
            if let Some(mood) = decision.mood {
                if last != Some(mood) {
                    stats.mood_changes.push(MoodChange {
                        turn: decision.turn,
                        mood,
                    });
                    last = Some(mood);
                }
            }
        }
        stats
    }
}

/// Everything kept about one simulated game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub winner: Option<PlayerId>,
    pub winner_name: Option<String>,
    pub rounds: u32,
    pub turns: u32,
    pub steps: usize,
    /// Hit the step ceiling or stalled without a winner.
    pub timed_out: bool,
    /// Times the driver had to force a stuck phase forward.
    pub recoveries: u32,
    pub final_moods: PlayerMap<Option<Mood>>,
    pub stats: PlayerMap<PlayerStats>,
    pub log: Vec<LoggedEvent>,
    pub decisions: Vec<Decision>,
    pub final_state: BoardSnapshot,
}

impl GameRecord {
    /// Human-readable one-line result.
    #[must_use]
    pub fn outcome(&self) -> String {
        match &self.winner_name {
            Some(name) => format!("{name} wins"),
            None => "Draw/Timeout".to_string(),
        }
    }

    /// Winner name as the game state knows it.
    pub(crate) fn winner_name_of(state: &GameState) -> Option<String> {
        state.winner().map(|w| state.player(w).name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_raid_damage_parse() {
        assert_eq!(
            raid_damage("Ann raided heart castle (+7 damage, total: 12/20)"),
            Some(7)
        );
        assert_eq!(raid_damage("Ann fortified spade castle (strength: 9)"), None);
    }

    #[test]
    fn test_capture_sink_records_and_retracts() {
        let mut state = GameState::new(GameConfig::new().with_seed(3));
        let (sink, events) = CaptureSink::new(true);
        state.set_sink(Box::new(sink));
        state.start_game().unwrap();

        let captured = events.len();
        assert!(captured >= 3);

        let pile = (0..3).find(|&p| state.field_top(p).is_some_and(|c| !c.is_joker()));
        if let Some(pile) = pile {
            state.draw_from_field(pile).unwrap();
            if state.can_cancel_draw() {
                state.cancel_draw().unwrap();
                assert_eq!(events.len(), captured);
            }
        }

        let taken = events.take();
        assert!(taken.iter().all(|e| e.snapshot.is_some()));
        assert!(taken[0].message.contains("Game Started"));
        assert!(events.is_empty());
    }

    #[test]
    fn test_tally_counts_authored_messages() {
        let events = vec![
            LoggedEvent {
                round: 1,
                turn: 1,
                message: "Ann raided heart castle (+7 damage, total: 7/20)".into(),
                snapshot: None,
            },
            LoggedEvent {
                round: 1,
                turn: 1,
                message: "Ann killed J♥!".into(),
                snapshot: None,
            },
            LoggedEvent {
                round: 1,
                turn: 2,
                message: "Bob raided spade castle (+3 damage, total: 3/20)".into(),
                snapshot: None,
            },
        ];
        let history = vec![ActionRecord {
            player: PlayerId::One,
            kind: ActionKind::Raid,
            round: 1,
            turn: 1,
        }];
        let stats = PlayerStats::tally(PlayerId::One, "Ann", &history, &events, &[]);
        assert_eq!(stats.raids, 1);
        assert_eq!(stats.damage_dealt, 7);
        assert_eq!(stats.royals_killed, 1);
        assert_eq!(stats.action_counts[&ActionKind::Raid], 1);
    }
}
