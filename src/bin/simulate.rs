//! Headless Royal Family simulator
//!
//! Plays AI vs AI games and writes the records as JSON or bincode.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use royal_family::ai::AiConfig;
use royal_family::core::PlayerId;
use royal_family::sim::{AgentKind, SimulationConfig, SimulationReport, Simulator};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Seat {
    /// Mood-driven heuristic AI
    Heuristic,
    /// Uniformly random legal moves
    Random,
}

impl From<Seat> for AgentKind {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::Heuristic => AgentKind::Heuristic,
            Seat::Random => AgentKind::Random,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Bincode,
}

/// Royal Family simulator - AI vs AI games for balance analysis
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run headless AI vs AI games of Royal Family")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 10)]
    games: usize,

    /// Seed of the first game; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Step ceiling per game before it counts as a timeout
    #[arg(long, default_value_t = royal_family::sim::DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Agent for player 1 (black)
    #[arg(long, value_enum, default_value = "heuristic")]
    p1: Seat,

    /// Agent for player 2 (red)
    #[arg(long, value_enum, default_value = "heuristic")]
    p2: Seat,

    /// AI tuning file (JSON, missing fields take defaults)
    #[arg(long)]
    ai_config: Option<PathBuf>,

    /// Store a board snapshot with every log message
    #[arg(long)]
    capture_state: bool,

    /// Store the scored options of every action decision
    #[arg(long)]
    decisions: bool,

    /// Leave the jokers out of the deck
    #[arg(long)]
    no_jokers: bool,

    /// Pause before each decision, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Where to write the results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
}

fn load_ai_config(path: Option<&PathBuf>) -> Result<AiConfig, String> {
    let Some(path) = path else {
        return Ok(AiConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid AI config {}: {e}", path.display()))
}

fn print_summary(report: &SimulationReport) {
    let summary = &report.summary;
    println!("{}", "=".repeat(60));
    println!("OVERALL STATISTICS ({} games)", summary.games);
    println!("{}", "=".repeat(60));
    println!(
        "Player 1 (Black) Wins: {} ({:.1}%)",
        summary.wins[PlayerId::One],
        summary.win_rate(PlayerId::One)
    );
    println!(
        "Player 2 (Red) Wins: {} ({:.1}%)",
        summary.wins[PlayerId::Two],
        summary.win_rate(PlayerId::Two)
    );
    println!("Draws/Timeouts: {}", summary.timeouts);
    if let (Some(min), Some(median), Some(max), Some(avg)) = (
        summary.min_rounds,
        summary.median_rounds,
        summary.max_rounds,
        summary.avg_rounds,
    ) {
        println!("Rounds: min {min}, median {median:.1}, max {max}, avg {avg:.1}");
    }
    println!("Average turns: {:.1}", summary.avg_turns);
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let ai = match load_ai_config(args.ai_config.as_ref()) {
        Ok(ai) => ai.with_thinking_delay_ms(args.delay_ms),
        Err(message) => {
            tracing::error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = SimulationConfig::new()
        .with_games(args.games)
        .with_seed_offset(args.seed)
        .with_max_steps(args.max_steps)
        .with_capture_state(args.capture_state)
        .with_decisions(args.decisions)
        .with_thinking_delay_ms(args.delay_ms)
        .with_agent(PlayerId::One, args.p1.into())
        .with_agent(PlayerId::Two, args.p2.into())
        .with_ai(ai);
    config.include_jokers = !args.no_jokers;

    tracing::info!(games = config.games, seed = config.seed_offset, "starting simulation");
    let report = Simulator::new(config).run();

    for (i, game) in report.games.iter().enumerate() {
        println!(
            "Game {}: {} (seed {}, {} rounds, {} turns)",
            i + 1,
            game.outcome(),
            game.seed,
            game.rounds,
            game.turns
        );
    }
    print_summary(&report);

    if let Some(path) = &args.output {
        let written = match args.format {
            Format::Json => report.write_json(path),
            Format::Bincode => report.write_bincode(path),
        };
        if let Err(err) = written {
            tracing::error!("failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
        tracing::info!("results written to {}", path.display());
    }

    ExitCode::SUCCESS
}
