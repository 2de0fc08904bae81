//! Batch AI-vs-AI simulation.
//!
//! Game `i` of a batch is seeded with `seed_offset + i`, so any single game
//! can be replayed on its own.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::ai::{Agent, AiConfig, AiPlayer, RandomAgent};
use crate::core::{GameConfig, PlayerId, PlayerMap};
use crate::rules::{BoardSnapshot, GameState};

use super::driver::{TurnDriver, DEFAULT_MAX_STEPS};
use super::pacer::Pacer;
use super::record::{CaptureSink, GameRecord, PlayerStats};

/// Errors writing simulation results.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type SimResult<T> = std::result::Result<T, SimError>;

/// Which agent plays a seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Heuristic,
    Random,
}

impl AgentKind {
    fn build(self, seat: PlayerId, ai: &AiConfig, state: &mut GameState) -> Box<dyn Agent> {
        match self {
            AgentKind::Heuristic => Box::new(AiPlayer::for_game(seat, ai.clone(), state)),
            AgentKind::Random => Box::new(RandomAgent::for_game(seat, state)),
        }
    }
}

/// Configuration for a batch of games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: usize,

    /// Step ceiling per game; hitting it counts as a timeout.
    pub max_steps: usize,

    /// Seed of game 0; game `i` uses `seed_offset + i`.
    pub seed_offset: u64,

    /// Store a board snapshot next to every captured log message.
    pub capture_state: bool,

    /// Store the scored options of every action decision.
    pub record_decisions: bool,

    /// Real pause before each decision, in milliseconds.
    pub thinking_delay_ms: u64,

    pub include_jokers: bool,

    pub agents: PlayerMap<AgentKind>,

    pub ai: AiConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_steps: DEFAULT_MAX_STEPS,
            seed_offset: 0,
            capture_state: false,
            record_decisions: false,
            thinking_delay_ms: 0,
            include_jokers: true,
            agents: PlayerMap::with_value(AgentKind::Heuristic),
            ai: AiConfig::default().with_thinking_delay_ms(0),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn with_capture_state(mut self, capture: bool) -> Self {
        self.capture_state = capture;
        self
    }

    pub fn with_decisions(mut self, record: bool) -> Self {
        self.record_decisions = record;
        self
    }

    pub fn with_thinking_delay_ms(mut self, delay_ms: u64) -> Self {
        self.thinking_delay_ms = delay_ms;
        self
    }

    pub fn with_agent(mut self, seat: PlayerId, kind: AgentKind) -> Self {
        self.agents[seat] = kind;
        self
    }

    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    /// Seed of the `index`-th game.
    pub fn seed_for(&self, index: usize) -> u64 {
        self.seed_offset.wrapping_add(index as u64)
    }
}

/// Aggregate statistics of a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub wins: PlayerMap<usize>,
    /// Games without a winner.
    pub timeouts: usize,
    /// Round statistics over completed games only.
    pub min_rounds: Option<u32>,
    pub median_rounds: Option<f64>,
    pub max_rounds: Option<u32>,
    pub avg_rounds: Option<f64>,
    pub avg_turns: f64,
}

impl SimulationSummary {
    #[must_use]
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut summary = Self {
            games: records.len(),
            ..Self::default()
        };
        let mut rounds = Vec::new();
        for record in records {
            match record.winner {
                Some(winner) => {
                    summary.wins[winner] += 1;
                    rounds.push(record.rounds);
                }
                None => summary.timeouts += 1,
            }
        }
        if !records.is_empty() {
            let turns: u32 = records.iter().map(|r| r.turns).sum();
            summary.avg_turns = f64::from(turns) / records.len() as f64;
        }

        rounds.sort_unstable();
        summary.min_rounds = rounds.first().copied();
        summary.max_rounds = rounds.last().copied();
        if !rounds.is_empty() {
            let n = rounds.len();
            let total: u32 = rounds.iter().sum();
            summary.avg_rounds = Some(f64::from(total) / n as f64);
            summary.median_rounds = Some(if n % 2 == 0 {
                f64::from(rounds[n / 2 - 1] + rounds[n / 2]) / 2.0
            } else {
                f64::from(rounds[n / 2])
            });
        }
        summary
    }

    /// Win rate of a seat over all games, in percent.
    #[must_use]
    pub fn win_rate(&self, seat: PlayerId) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[seat] as f64 * 100.0 / self.games as f64
        }
    }
}

/// Records of a batch plus its summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub summary: SimulationSummary,
    pub games: Vec<GameRecord>,
}

impl SimulationReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_bincode(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Plays batches of games.
#[derive(Clone, Debug, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play one game with the given seed.
    pub fn run_game(&self, seed: u64) -> GameRecord {
        let game_config = GameConfig::new()
            .with_seed(seed)
            .with_jokers(self.config.include_jokers);
        let mut state = GameState::new(game_config);
        let (sink, events) = CaptureSink::new(self.config.capture_state);
        state.set_sink(Box::new(sink));

        let ai = &self.config.ai;
        let one = self.config.agents[PlayerId::One].build(PlayerId::One, ai, &mut state);
        let two = self.config.agents[PlayerId::Two].build(PlayerId::Two, ai, &mut state);
        let mut driver = TurnDriver::new(PlayerMap::from_pair(one, two))
            .with_pacer(Pacer::for_delay_ms(self.config.thinking_delay_ms))
            .with_max_steps(self.config.max_steps)
            .with_decisions(self.config.record_decisions);

        let report = driver.run(&mut state);
        let decisions = driver.take_decisions();
        let log = events.take();
        let final_moods = PlayerMap::new(|id| driver.agents()[id].mood());
        let stats = PlayerMap::new(|id| {
            PlayerStats::tally(
                id,
                state.player(id).name(),
                state.history(),
                &log,
                &decisions,
            )
        });

        info!(
            seed,
            winner = ?state.winner(),
            rounds = state.round(),
            steps = report.steps,
            timed_out = report.timed_out,
            "game finished"
        );

        GameRecord {
            seed,
            winner: state.winner(),
            winner_name: GameRecord::winner_name_of(&state),
            rounds: state.round(),
            turns: state.turn_number(),
            steps: report.steps,
            timed_out: report.timed_out,
            recoveries: report.recoveries,
            final_moods,
            stats,
            log,
            decisions,
            final_state: BoardSnapshot::capture(&state),
        }
    }

    /// Play the whole batch.
    pub fn run(&self) -> SimulationReport {
        let games: Vec<GameRecord> = (0..self.config.games)
            .map(|i| self.run_game(self.config.seed_for(i)))
            .collect();
        let summary = SimulationSummary::from_records(&games);
        info!(
            games = summary.games,
            p1_wins = summary.wins[PlayerId::One],
            p2_wins = summary.wins[PlayerId::Two],
            timeouts = summary.timeouts,
            "simulation finished"
        );
        SimulationReport {
            config: self.config.clone(),
            summary,
            games,
        }
    }
}
