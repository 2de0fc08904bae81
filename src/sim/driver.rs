//! Turn driver.
//!
//! A plain synchronous step function: look at the phase, let the agent whose
//! decision is pending make exactly one call, repeat. Flops are dealt by the
//! driver itself. If a step leaves the game untouched the driver forces the
//! phase forward, and a hard step ceiling keeps a broken game from running
//! forever.

use tracing::{debug, warn};

use crate::ai::{score_offer, Agent};
use crate::core::{GameError, PlayerMap, Result};
use crate::rules::{Action, GameState, Phase, RaidChoice, FIELD_PILES};

use super::pacer::Pacer;
use super::record::{Decision, ScoredKind};

/// Default step ceiling per game.
pub const DEFAULT_MAX_STEPS: usize = 5000;

/// What a single step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A decision or a flop advanced the game.
    Advanced,
    /// The decision left the game untouched and the driver forced it forward.
    Recovered,
    /// Nothing could move the game forward.
    Stalled,
    /// The game is already over.
    Finished,
}

/// Summary of one driven game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveReport {
    pub steps: usize,
    pub recoveries: u32,
    /// The step ceiling was hit or the game stalled.
    pub timed_out: bool,
}

/// Runs two agents against each other on one game.
pub struct TurnDriver {
    agents: PlayerMap<Box<dyn Agent>>,
    pacer: Pacer,
    max_steps: usize,
    record_decisions: bool,
    decisions: Vec<Decision>,
}

impl TurnDriver {
    pub fn new(agents: PlayerMap<Box<dyn Agent>>) -> Self {
        Self {
            agents,
            pacer: Pacer::Instant,
            max_steps: DEFAULT_MAX_STEPS,
            record_decisions: false,
            decisions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Keep a `Decision` for every action-phase choice.
    #[must_use]
    pub fn with_decisions(mut self, record: bool) -> Self {
        self.record_decisions = record;
        self
    }

    #[must_use]
    pub fn agents(&self) -> &PlayerMap<Box<dyn Agent>> {
        &self.agents
    }

    /// Decisions recorded so far.
    pub fn take_decisions(&mut self) -> Vec<Decision> {
        std::mem::take(&mut self.decisions)
    }

    /// Advance the game by one decision.
    pub fn step(&mut self, state: &mut GameState) -> StepOutcome {
        let phase = state.phase();
        match phase {
            Phase::GameOver => return StepOutcome::Finished,
            Phase::Setup => {
                return match state.start_game() {
                    Ok(()) => StepOutcome::Advanced,
                    Err(_) => StepOutcome::Stalled,
                }
            }
            Phase::Flop => {
                return match state.next_round() {
                    Ok(()) => StepOutcome::Advanced,
                    Err(_) => StepOutcome::Stalled,
                }
            }
            _ => {}
        }

        if phase == Phase::Action && self.record_decisions {
            self.record_decision(state);
        }

        let revision = state.revision();
        let agent = self.agents.get_mut(state.current_player());
        self.pacer.pause(agent.thinking_delay(phase));
        let result = agent.act(state);

        match result {
            Ok(()) if state.revision() != revision => StepOutcome::Advanced,
            Ok(()) => Self::recover(state, None),
            Err(err) => Self::recover(state, Some(err)),
        }
    }

    /// Play until the game ends or the step ceiling is hit.
    pub fn run(&mut self, state: &mut GameState) -> DriveReport {
        let mut report = DriveReport::default();
        while report.steps < self.max_steps {
            match self.step(state) {
                StepOutcome::Finished => return report,
                StepOutcome::Advanced => {}
                StepOutcome::Recovered => report.recoveries += 1,
                StepOutcome::Stalled => {
                    report.steps += 1;
                    report.timed_out = true;
                    return report;
                }
            }
            report.steps += 1;
        }
        report.timed_out = !state.is_over();
        report
    }

    fn record_decision(&mut self, state: &GameState) {
        let Some(card) = state.drawn_card() else {
            return;
        };
        let player = state.current_player();
        let mut options: Vec<ScoredKind> = state
            .available_offers()
            .iter()
            .map(|offer| ScoredKind {
                kind: offer.kind(),
                score: score_offer(state, card, offer),
            })
            .collect();
        options.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.decisions.push(Decision {
            player,
            round: state.round(),
            turn: state.turn_number(),
            mood: self.agents[player].mood(),
            card,
            options,
        });
    }

    /// Force a stuck phase forward: field the held card, draw from the deck
    /// (or any pile when the deck is spent), skip the raid follow-up, or give
    /// up a royal to the assassin.
    fn recover(state: &mut GameState, cause: Option<GameError>) -> StepOutcome {
        let phase = state.phase();
        if state.is_over() {
            return StepOutcome::Finished;
        }
        warn!(%phase, cause = ?cause, "phase stuck, forcing advance");
        state.log_message(format!("Phase stuck at {phase}, forcing advance"));

        let forced: Result<()> = match phase {
            Phase::Action | Phase::FieldSelect if state.drawn_card().is_some() => {
                let field = if phase == Phase::Action {
                    state.begin_field_select()
                } else {
                    Ok(())
                };
                field.and_then(|()| state.execute_action(Action::Field { pile: 0 }))
            }
            Phase::Draw => state.draw_from_deck().map(|_| ()).or_else(|err| {
                (0..FIELD_PILES)
                    .find(|&pile| state.field_top(pile).is_some())
                    .ok_or(err)
                    .and_then(|pile| state.draw_from_field(pile).map(|_| ()))
            }),
            Phase::RaidChoice => state.execute_raid_choice(RaidChoice::Skip),
            Phase::AssassinSurprise => {
                let target = state.own_royals().first().copied();
                state.execute_assassin_surprise(target)
            }
            _ => Err(GameError::WrongPhase {
                expected: Phase::Draw,
                actual: phase,
            }),
        };

        match forced {
            Ok(()) => StepOutcome::Recovered,
            Err(err) => {
                debug!(%phase, error = %err, "recovery failed");
                StepOutcome::Stalled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiConfig, AiPlayer, RandomAgent};
    use crate::core::{GameConfig, PlayerId};

    /// Agent that never does anything.
    struct Idle(PlayerId);

    impl Agent for Idle {
        fn seat(&self) -> PlayerId {
            self.0
        }
        fn decide_draw(&mut self, _: &mut GameState) -> Result<()> {
            Ok(())
        }
        fn decide_action(&mut self, _: &mut GameState) -> Result<()> {
            Ok(())
        }
        fn decide_field_pile(&mut self, _: &mut GameState) -> Result<()> {
            Ok(())
        }
        fn decide_raid_choice(&mut self, _: &mut GameState) -> Result<()> {
            Ok(())
        }
        fn decide_assassin_surprise(&mut self, _: &mut GameState) -> Result<()> {
            Ok(())
        }
    }

    fn ai_driver(state: &mut GameState) -> TurnDriver {
        let config = AiConfig::new().with_thinking_delay_ms(0);
        let one = AiPlayer::for_game(PlayerId::One, config.clone(), state);
        let two = AiPlayer::for_game(PlayerId::Two, config, state);
        TurnDriver::new(PlayerMap::new(|id| -> Box<dyn Agent> {
            match id {
                PlayerId::One => Box::new(one.clone()),
                PlayerId::Two => Box::new(two.clone()),
            }
        }))
    }

    #[test]
    fn test_idle_agents_are_forced_forward() {
        let mut state = GameState::new(GameConfig::new().with_seed(12));
        let mut driver =
            TurnDriver::new(PlayerMap::new(|id| -> Box<dyn Agent> { Box::new(Idle(id)) }))
                .with_max_steps(40);
        let report = driver.run(&mut state);
        assert!(report.recoveries > 0);
        assert!(state.round() > 1);
        assert!(state.log().texts().any(|t| t.starts_with("Phase stuck at")));
    }

    #[test]
    fn test_step_ceiling_times_out() {
        let mut state = GameState::new(GameConfig::new().with_seed(12));
        let mut driver =
            TurnDriver::new(PlayerMap::new(|id| -> Box<dyn Agent> { Box::new(Idle(id)) }))
                .with_max_steps(5);
        let report = driver.run(&mut state);
        assert_eq!(report.steps, 5);
        assert!(report.timed_out);
    }

    #[test]
    fn test_ai_game_runs_to_completion() {
        let mut state = GameState::new(GameConfig::new().with_seed(2024));
        let mut driver = ai_driver(&mut state).with_decisions(true);
        let report = driver.run(&mut state);
        if !report.timed_out {
            assert!(state.is_over());
            assert!(state.winner().is_some());
        }
        let decisions = driver.take_decisions();
        assert!(!decisions.is_empty());
        assert!(decisions.iter().all(|d| d.mood.is_some()));
        for decision in &decisions {
            assert!(decision
                .options
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score));
        }
    }

    #[test]
    fn test_random_game_never_needs_recovery() {
        let mut state = GameState::new(GameConfig::new().with_seed(77));
        let one = RandomAgent::for_game(PlayerId::One, &mut state);
        let two = RandomAgent::for_game(PlayerId::Two, &mut state);
        let mut driver = TurnDriver::new(PlayerMap::new(|id| -> Box<dyn Agent> {
            match id {
                PlayerId::One => Box::new(one.clone()),
                PlayerId::Two => Box::new(two.clone()),
            }
        }))
        .with_max_steps(60);
        let report = driver.run(&mut state);
        assert_eq!(report.recoveries, 0);
    }
}
