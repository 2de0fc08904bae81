//! Phase-indexed agents.
//!
//! An `Agent` answers for one seat. The driver never inspects what kind of
//! agent it holds: it asks whose decision is pending and calls `act`, which
//! dispatches on the phase to exactly one `decide_*` method.

use std::time::Duration;

use crate::core::{GameError, GameRng, PlayerId, Result};
use crate::rules::{Action, GameState, Offer, Phase, FIELD_PILES};

use super::mood::Mood;
use super::player::AiPlayer;

/// A decision maker for one seat.
pub trait Agent: Send {
    /// The seat this agent plays.
    fn seat(&self) -> PlayerId;

    /// Resolve the draw phase.
    fn decide_draw(&mut self, state: &mut GameState) -> Result<()>;

    /// Resolve the action phase, possibly only as far as pile selection.
    fn decide_action(&mut self, state: &mut GameState) -> Result<()>;

    /// Resolve pile selection.
    fn decide_field_pile(&mut self, state: &mut GameState) -> Result<()>;

    fn decide_raid_choice(&mut self, state: &mut GameState) -> Result<()>;

    fn decide_assassin_surprise(&mut self, state: &mut GameState) -> Result<()>;

    /// Current mood, for agents that have one.
    fn mood(&self) -> Option<Mood> {
        None
    }

    /// Cosmetic pause before deciding in `phase`.
    fn thinking_delay(&self, _phase: Phase) -> Duration {
        Duration::ZERO
    }

    /// Make the one decision the current phase asks for.
    fn act(&mut self, state: &mut GameState) -> Result<()> {
        match state.phase() {
            Phase::Draw => self.decide_draw(state),
            Phase::Action => self.decide_action(state),
            Phase::FieldSelect => self.decide_field_pile(state),
            Phase::RaidChoice => self.decide_raid_choice(state),
            Phase::AssassinSurprise => self.decide_assassin_surprise(state),
            Phase::GameOver => Err(GameError::GameOver),
            phase @ (Phase::Setup | Phase::Flop) => Err(GameError::WrongPhase {
                expected: Phase::Draw,
                actual: phase,
            }),
        }
    }
}

impl Agent for AiPlayer {
    fn seat(&self) -> PlayerId {
        AiPlayer::seat(self)
    }

    fn decide_draw(&mut self, state: &mut GameState) -> Result<()> {
        AiPlayer::decide_draw(self, state).map(|_| ())
    }

    fn decide_action(&mut self, state: &mut GameState) -> Result<()> {
        AiPlayer::decide_action(self, state)
    }

    fn decide_field_pile(&mut self, state: &mut GameState) -> Result<()> {
        AiPlayer::decide_field_pile(self, state)
    }

    fn decide_raid_choice(&mut self, state: &mut GameState) -> Result<()> {
        AiPlayer::decide_raid_choice(self, state)
    }

    fn decide_assassin_surprise(&mut self, state: &mut GameState) -> Result<()> {
        AiPlayer::decide_assassin_surprise(self, state)
    }

    fn mood(&self) -> Option<Mood> {
        Some(AiPlayer::mood(self))
    }

    fn thinking_delay(&self, phase: Phase) -> Duration {
        AiPlayer::thinking_delay(self, phase)
    }
}

/// Baseline agent that picks uniformly among legal moves.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    seat: PlayerId,
    rng: GameRng,
}

impl RandomAgent {
    pub fn new(seat: PlayerId, rng: GameRng) -> Self {
        Self { seat, rng }
    }

    pub fn for_game(seat: PlayerId, state: &mut GameState) -> Self {
        Self::new(seat, state.fork_rng())
    }

    fn random_pile(&mut self) -> usize {
        self.rng.gen_range_usize(0..FIELD_PILES)
    }
}

impl Agent for RandomAgent {
    fn seat(&self) -> PlayerId {
        self.seat
    }

    fn decide_draw(&mut self, state: &mut GameState) -> Result<()> {
        let piles: Vec<usize> = (0..FIELD_PILES)
            .filter(|&pile| state.field_top(pile).is_some())
            .collect();
        // One extra slot stands for the deck.
        let pick = self.rng.gen_range_usize(0..piles.len() + 1);
        match piles.get(pick) {
            Some(&pile) => state.draw_from_field(pile).map(|_| ()),
            None => state.draw_from_deck().map(|_| ()),
        }
    }

    fn decide_action(&mut self, state: &mut GameState) -> Result<()> {
        let offers = state.available_offers();
        let Some(offer) = self.rng.choose(&offers).cloned() else {
            return state.begin_field_select();
        };
        match offer {
            Offer::Field => state.begin_field_select(),
            Offer::Assassinate { targets } => match self.rng.choose(&targets) {
                Some(&target) => state.execute_action(Action::Assassinate { target }),
                None => state.begin_field_select(),
            },
            other => match other.to_action() {
                Some(action) => state.execute_action(action),
                None => state.begin_field_select(),
            },
        }
    }

    fn decide_field_pile(&mut self, state: &mut GameState) -> Result<()> {
        if state.phase() == Phase::Action {
            state.begin_field_select()?;
        }
        let pile = self.random_pile();
        state.execute_action(Action::Field { pile })
    }

    fn decide_raid_choice(&mut self, state: &mut GameState) -> Result<()> {
        let options = state.raid_options();
        let choice = self.rng.choose(&options).copied().ok_or(GameError::NoPendingRaid)?;
        state.execute_raid_choice(choice)
    }

    fn decide_assassin_surprise(&mut self, state: &mut GameState) -> Result<()> {
        let royals = state.own_royals();
        let target = self.rng.choose(&royals).copied();
        state.execute_assassin_surprise(target)
    }
}
