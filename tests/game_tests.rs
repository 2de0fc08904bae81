//! Whole-game tests: AI and random agents driven to completion, card
//! conservation at every step, and seed determinism.

use royal_family::ai::{Agent, AiConfig, AiPlayer, RandomAgent};
use royal_family::cards::Card;
use royal_family::core::{GameConfig, PlayerId, PlayerMap};
use royal_family::realm::Castle;
use royal_family::rules::{GameState, Phase, FIELD_PILES};
use royal_family::sim::{AgentKind, SimulationConfig, Simulator, StepOutcome, TurnDriver};

const FULL_DECK: usize = 54;

fn castle_cards(castle: &Castle) -> usize {
    let marker = usize::from(!castle.is_destroyed());
    marker
        + castle.royals().len()
        + usize::from(castle.fortification().is_some())
        + castle.fortification_damage().len()
        + castle.permanent_damage().len()
        + castle.persuasion_cards().len()
        + castle.threat_cards().len()
        + usize::from(castle.prisoner().is_some())
}

/// Every card of the standard deck, wherever it currently sits.
fn cards_in_play(state: &GameState) -> usize {
    let field: usize = (0..FIELD_PILES).map(|i| state.field_pile(i).len()).sum();
    let castles: usize = PlayerId::ALL
        .iter()
        .flat_map(|&id| state.player(id).castles().map(|(_, c)| castle_cards(c)))
        .sum();
    state.deck().len()
        + field
        + state.discard().len()
        + state.set_aside().len()
        + usize::from(state.joker_in_play())
        + usize::from(state.drawn_card().is_some())
        + castles
}

fn ai_agents(state: &mut GameState) -> PlayerMap<Box<dyn Agent>> {
    let config = AiConfig::new().with_thinking_delay_ms(0);
    let one: Box<dyn Agent> = Box::new(AiPlayer::for_game(PlayerId::One, config.clone(), state));
    let two: Box<dyn Agent> = Box::new(AiPlayer::for_game(PlayerId::Two, config, state));
    PlayerMap::from_pair(one, two)
}

fn random_agents(state: &mut GameState) -> PlayerMap<Box<dyn Agent>> {
    let one: Box<dyn Agent> = Box::new(RandomAgent::for_game(PlayerId::One, state));
    let two: Box<dyn Agent> = Box::new(RandomAgent::for_game(PlayerId::Two, state));
    PlayerMap::from_pair(one, two)
}

/// Step a game to the end, checking conservation after every step.
fn play_checked(
    seed: u64,
    agents: fn(&mut GameState) -> PlayerMap<Box<dyn Agent>>,
    max_steps: usize,
) -> GameState {
    let mut state = GameState::new(GameConfig::new().with_seed(seed));
    let mut driver = TurnDriver::new(agents(&mut state));
    assert_eq!(cards_in_play(&state), FULL_DECK);

    for _ in 0..max_steps {
        match driver.step(&mut state) {
            StepOutcome::Finished | StepOutcome::Stalled => break,
            StepOutcome::Advanced | StepOutcome::Recovered => {}
        }
        assert_eq!(
            cards_in_play(&state),
            FULL_DECK,
            "seed {seed}: cards lost at round {} in {}",
            state.round(),
            state.phase()
        );
    }
    state
}

// === Conservation ===

#[test]
fn test_ai_games_conserve_cards() {
    for seed in 0..6 {
        let state = play_checked(seed, ai_agents, 3000);
        if state.is_over() {
            let winner = state.winner().expect("finished game has a winner");
            assert!(state.player(winner.opponent()).is_defeated());
            assert!(!state.player(winner).is_defeated());
        }
    }
}

#[test]
fn test_random_games_conserve_cards() {
    for seed in 100..104 {
        play_checked(seed, random_agents, 400);
    }
}

// === Structure ===

#[test]
fn test_turn_order_pattern_every_round() {
    let mut state = GameState::new(GameConfig::new().with_seed(31));
    let mut driver = TurnDriver::new(ai_agents(&mut state));
    let mut rounds_seen = 0;

    for _ in 0..1500 {
        if state.phase() == Phase::Draw && state.is_first_turn_of_round() {
            let order = state.turn_order();
            assert_eq!(order[0], order[2]);
            assert_eq!(order[1], order[0].opponent());
            assert_eq!(state.current_player(), order[0]);
            rounds_seen += 1;
        }
        if driver.step(&mut state) == StepOutcome::Finished {
            break;
        }
    }
    assert!(rounds_seen > 0);
}

#[test]
fn test_destroyed_castles_are_empty() {
    for seed in 10..14 {
        let state = play_checked(seed, ai_agents, 3000);
        for id in PlayerId::ALL {
            for (_, castle) in state.player(id).castles() {
                if castle.is_destroyed() {
                    assert_eq!(castle_cards(castle), 0);
                }
            }
        }
    }
}

// === Determinism ===

#[test]
fn test_same_seed_same_game() {
    let simulator = Simulator::new(SimulationConfig::new().with_decisions(true));
    let first = simulator.run_game(4242);
    let second = simulator.run_game(4242);

    assert_eq!(first.winner, second.winner);
    assert_eq!(first.turns, second.turns);
    assert_eq!(first.log, second.log);
    assert_eq!(first.decisions, second.decisions);
    assert_eq!(first.final_state, second.final_state);
}

#[test]
fn test_different_seeds_diverge() {
    let simulator = Simulator::new(SimulationConfig::new());
    let logs: Vec<_> = (0..4).map(|seed| simulator.run_game(seed).log).collect();
    assert!(logs.windows(2).any(|pair| pair[0] != pair[1]));
}

// === Simulator ===

#[test]
fn test_simulation_batch_summary() {
    let config = SimulationConfig::new()
        .with_games(4)
        .with_seed_offset(500)
        .with_agent(PlayerId::Two, AgentKind::Random);
    let report = Simulator::new(config).run();

    assert_eq!(report.games.len(), 4);
    assert_eq!(report.summary.games, 4);
    let decided: usize = PlayerId::ALL.iter().map(|&id| report.summary.wins[id]).sum();
    assert_eq!(decided + report.summary.timeouts, 4);
    for (i, game) in report.games.iter().enumerate() {
        assert_eq!(game.seed, 500 + i as u64);
        assert!(game.final_moods[PlayerId::One].is_some());
        assert!(game.final_moods[PlayerId::Two].is_none());
        assert!(game.log[0].message.contains("Game Started"));
    }
}

#[test]
fn test_winner_log_line_matches_record() {
    let simulator = Simulator::new(SimulationConfig::new());
    for seed in 0..5 {
        let record = simulator.run_game(seed);
        if let Some(name) = &record.winner_name {
            let line = format!("🏆 {name} WINS!");
            assert_eq!(record.log.last().map(|e| e.message.as_str()), Some(line.as_str()));
            assert_eq!(record.outcome(), format!("{name} wins"));
        } else {
            assert_eq!(record.outcome(), "Draw/Timeout");
        }
    }
}

#[test]
fn test_no_jokers_game_never_enters_oppression() {
    let config = SimulationConfig {
        include_jokers: false,
        ..SimulationConfig::new()
    };
    let record = Simulator::new(config).run_game(9);
    assert!(!record.log.iter().any(|e| e.message.contains("Joker")));
    assert!(record
        .final_state
        .field_tops()
        .iter()
        .flatten()
        .all(|card: &Card| !card.is_joker()));
}
