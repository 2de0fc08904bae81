//! End-to-end rule scenarios.
//!
//! Each test builds a position through the public API, drives the state
//! machine one operation at a time, and checks phases, castles and the log.

use royal_family::cards::{Card, Rank, Suit};
use royal_family::core::{GameConfig, GameError, PlayerId};
use royal_family::realm::{Castle, CastleSlot};
use royal_family::rules::{
    Action, ActionKind, DrawOutcome, GameState, Offer, Phase, RaidChoice,
};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

/// A game where The Starless holds `held` at the start of a round.
fn holding(held: Card) -> GameState {
    let mut state = GameState::new(GameConfig::new().with_seed(7));
    state.arrange_turn(PlayerId::One, held);
    state
}

fn seat_royal(state: &mut GameState, player: PlayerId, slot: CastleSlot, royal: Card) {
    assert!(state.player_mut(player).castle_mut(slot).add_royal(royal));
}

// === Drawing ===

#[test]
fn test_known_deck_draw_reaches_action() {
    let mut state = GameState::new(GameConfig::new().with_seed(1));
    let expected = card(Rank::Nine, Suit::Heart);
    // Bottom to top: the flop takes the last three, then a joker sits on top.
    state.set_deck(vec![
        card(Rank::Four, Suit::Diamond),
        expected,
        Card::Joker,
        card(Rank::Three, Suit::Club),
        card(Rank::Seven, Suit::Heart),
        card(Rank::Eight, Suit::Spade),
    ]);
    state.start_game().unwrap();
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.deck().len(), 3);

    let player = state.current_player();
    assert_eq!(state.draw_from_deck().unwrap(), DrawOutcome::Joker);
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.current_player(), player);
    assert!(state.joker_in_play());

    assert_eq!(state.draw_from_deck().unwrap(), DrawOutcome::Held(expected));
    assert_eq!(state.phase(), Phase::Action);
    assert_eq!(state.drawn_card(), Some(expected));
    assert_eq!(state.deck(), &[card(Rank::Four, Suit::Diamond)]);
}

#[test]
fn test_same_seed_same_flop() {
    let mut a = GameState::new(GameConfig::new().with_seed(99));
    let mut b = GameState::new(GameConfig::new().with_seed(99));
    a.start_game().unwrap();
    b.start_game().unwrap();

    assert_eq!(a.deck(), b.deck());
    assert_eq!(a.field_tops(), b.field_tops());
    assert_eq!(a.turn_order(), b.turn_order());
}

#[test]
fn test_cancel_field_draw_restores_pile_and_log() {
    let mut state = GameState::new(GameConfig::new().with_seed(4));
    state.start_game().unwrap();
    state
        .set_field_pile(2, vec![card(Rank::Five, Suit::Club), card(Rank::Jack, Suit::Heart)])
        .unwrap();
    let log_len = state.log().len();

    assert_eq!(
        state.draw_from_field(2).unwrap(),
        DrawOutcome::Held(card(Rank::Jack, Suit::Heart))
    );
    assert_eq!(state.field_top(2), Some(card(Rank::Five, Suit::Club)));
    assert_eq!(state.log().len(), log_len + 1);

    state.cancel_draw().unwrap();
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.field_top(2), Some(card(Rank::Jack, Suit::Heart)));
    assert_eq!(state.log().len(), log_len);
    assert_eq!(state.cancel_draw(), Err(GameError::WrongPhase {
        expected: Phase::Action,
        actual: Phase::Draw,
    }));
}

// === Castle thresholds ===

#[test]
fn test_damage_destroys_only_castle_and_wins() {
    let mut state = holding(card(Rank::Three, Suit::Spade));
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::Queen, Suit::Spade));
    {
        let enemy = state.player_mut(PlayerId::Two).castle_mut(CastleSlot::Primary);
        assert!(!enemy.add_permanent_damage(card(Rank::Ten, Suit::Spade)));
        assert!(!enemy.add_permanent_damage(card(Rank::Eight, Suit::Club)));
        assert_eq!(enemy.total_damage(), 18);
    }

    state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap();

    let enemy = state.player(PlayerId::Two);
    assert!(enemy.primary().is_destroyed());
    assert!(enemy.is_defeated());
    assert_eq!(state.phase(), Phase::GameOver);
    assert_eq!(state.winner(), Some(PlayerId::One));
    assert_eq!(state.draw_from_deck(), Err(GameError::GameOver));
}

#[test]
fn test_destroying_one_of_two_active_castles_continues() {
    let mut state = holding(card(Rank::Four, Suit::Spade));
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::King, Suit::Spade));
    {
        let alliance = state.player_mut(PlayerId::Two).castle_mut(CastleSlot::Alliance);
        alliance.add_persuasion(card(Rank::Ten, Suit::Spade));
        alliance.add_persuasion(card(Rank::Ten, Suit::Club));
        assert!(alliance.check_activation().is_some());
    }
    state
        .player_mut(PlayerId::Two)
        .castle_mut(CastleSlot::Primary)
        .add_permanent_damage(card(Rank::Nine, Suit::Diamond));
    state
        .player_mut(PlayerId::Two)
        .castle_mut(CastleSlot::Primary)
        .add_permanent_damage(card(Rank::Seven, Suit::Club));

    state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap();

    assert!(state.player(PlayerId::Two).primary().is_destroyed());
    assert_eq!(state.winner(), None);
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.current_player(), PlayerId::Two);
}

#[test]
fn test_destroyed_castle_is_never_targeted_again() {
    let mut state = holding(card(Rank::Four, Suit::Spade));
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::King, Suit::Spade));
    {
        let alliance = state.player_mut(PlayerId::Two).castle_mut(CastleSlot::Alliance);
        alliance.add_persuasion(card(Rank::Ten, Suit::Spade));
        alliance.add_persuasion(card(Rank::Ten, Suit::Club));
        assert!(alliance.check_activation().is_some());
    }
    {
        let primary = state.player_mut(PlayerId::Two).castle_mut(CastleSlot::Primary);
        primary.add_permanent_damage(card(Rank::Nine, Suit::Diamond));
        primary.add_permanent_damage(card(Rank::Seven, Suit::Club));
    }
    state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap();
    assert!(state.player(PlayerId::Two).primary().is_destroyed());

    state.arrange_turn(PlayerId::One, card(Rank::Six, Suit::Spade));
    let offers = state.available_offers();
    assert!(!offers.iter().any(|offer| matches!(
        offer,
        Offer::Battle { target: CastleSlot::Primary }
            | Offer::Raid { target: CastleSlot::Primary, .. }
            | Offer::RaidNoDamage { target: CastleSlot::Primary }
    )));
    assert!(offers.iter().any(|offer| matches!(
        offer,
        Offer::Raid { target: CastleSlot::Alliance, .. }
    )));

    let err = state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap_err();
    assert!(matches!(err, GameError::ActionUnavailable { kind: ActionKind::Raid, .. }));
    assert_eq!(state.phase(), Phase::Action);
    assert_eq!(state.drawn_card(), Some(card(Rank::Six, Suit::Spade)));
}

#[test]
fn test_threats_square_up_only_when_they_match_persuasion() {
    let mut alliance = Castle::new(Suit::Club, false);
    alliance.add_persuasion(card(Rank::Ten, Suit::Club));
    alliance.add_persuasion(card(Rank::Eight, Suit::Club));
    assert_eq!(alliance.total_persuasion(), 18);

    assert!(alliance.add_threat(card(Rank::Five, Suit::Spade)).is_empty());
    assert_eq!(alliance.net_persuasion(), 13);

    assert!(alliance.add_threat(card(Rank::Ten, Suit::Spade)).is_empty());
    assert_eq!(alliance.net_persuasion(), 3);

    let squared = alliance.add_threat(card(Rank::Three, Suit::Spade));
    assert_eq!(squared.len(), 5);
    assert!(alliance.persuasion_cards().is_empty());
    assert!(alliance.threat_cards().is_empty());
    assert!(!alliance.is_active());
    assert_eq!(alliance.check_activation(), None);
}

#[test]
fn test_threaten_through_engine_discards_squared_cards() {
    let mut state = holding(card(Rank::Six, Suit::Spade));
    state
        .player_mut(PlayerId::Two)
        .castle_mut(CastleSlot::Alliance)
        .add_persuasion(card(Rank::Five, Suit::Diamond));

    state.execute_action(Action::Threaten).unwrap();

    let alliance = state.player(PlayerId::Two).alliance();
    assert!(alliance.persuasion_cards().is_empty());
    assert!(alliance.threat_cards().is_empty());
    assert!(!alliance.is_active());
    assert_eq!(state.discard().len(), 2);
    assert!(state
        .log()
        .texts()
        .any(|t| t == "The Scarlett's alliance persuasion was squared up"));
}

// === Raids ===

#[test]
fn test_king_raid_offers_kill_and_kidnap_of_jack() {
    let mut state = holding(card(Rank::Seven, Suit::Spade));
    let jack = card(Rank::Jack, Suit::Heart);
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::King, Suit::Spade));
    seat_royal(&mut state, PlayerId::Two, CastleSlot::Primary, jack);

    let offers = state.available_offers();
    assert!(offers.contains(&Offer::Raid {
        target: CastleSlot::Primary,
        attacker: CastleSlot::Primary,
    }));

    state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap();
    assert_eq!(state.phase(), Phase::RaidChoice);

    let options = state.raid_options();
    assert!(options.contains(&RaidChoice::Skip));
    assert!(options.contains(&RaidChoice::Kill(jack)));
    assert!(options.contains(&RaidChoice::Kidnap(jack)));
    assert!(!options.contains(&RaidChoice::Rescue));

    state.execute_raid_choice(RaidChoice::Kill(jack)).unwrap();
    assert!(state.discard().contains(&jack));
    assert!(!state.player(PlayerId::Two).primary().has_royals());
    assert_eq!(state.phase(), Phase::Draw);
    assert_eq!(state.current_player(), PlayerId::Two);
    assert_eq!(state.turn_number(), 1);
}

#[test]
fn test_lower_rank_cannot_kill_or_kidnap() {
    let mut state = holding(card(Rank::Seven, Suit::Spade));
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::Jack, Suit::Spade));
    let queen = card(Rank::Queen, Suit::Heart);
    let jack = card(Rank::Jack, Suit::Heart);
    seat_royal(&mut state, PlayerId::Two, CastleSlot::Primary, queen);
    seat_royal(&mut state, PlayerId::Two, CastleSlot::Primary, jack);

    state
        .execute_action(Action::Raid {
            target: CastleSlot::Primary,
            attacker: CastleSlot::Primary,
        })
        .unwrap();
    assert_eq!(
        state.raid_options(),
        vec![RaidChoice::Skip, RaidChoice::Kill(jack), RaidChoice::Kidnap(jack)]
    );
    assert_eq!(
        state.execute_raid_choice(RaidChoice::Kidnap(queen)),
        Err(GameError::InvalidRaidChoice)
    );

    state.execute_raid_choice(RaidChoice::Kidnap(jack)).unwrap();
    assert_eq!(state.player(PlayerId::One).primary().prisoner(), Some(jack));
    assert_eq!(state.player(PlayerId::Two).primary().royals(), &[queen]);
}

#[test]
fn test_raid_without_royal_deals_no_damage() {
    let mut state = holding(card(Rank::Seven, Suit::Spade));

    let offers = state.available_offers();
    assert!(offers.contains(&Offer::RaidNoDamage {
        target: CastleSlot::Primary
    }));
    assert!(!offers.iter().any(|o| o.kind() == ActionKind::Raid));

    state
        .execute_action(Action::RaidNoDamage {
            target: CastleSlot::Primary,
        })
        .unwrap();
    assert_eq!(state.player(PlayerId::Two).primary().total_damage(), 0);
    assert_eq!(state.discard(), &[card(Rank::Seven, Suit::Spade)]);
}

#[test]
fn test_fortified_target_is_battled_not_raided() {
    let mut state = holding(card(Rank::Eight, Suit::Spade));
    seat_royal(&mut state, PlayerId::One, CastleSlot::Primary, card(Rank::King, Suit::Spade));
    state
        .player_mut(PlayerId::Two)
        .castle_mut(CastleSlot::Primary)
        .add_fortification(card(Rank::Ten, Suit::Heart));

    let offers = state.available_offers();
    assert!(offers.contains(&Offer::Battle {
        target: CastleSlot::Primary
    }));
    assert!(!offers.iter().any(|o| matches!(o, Offer::Raid { .. })));

    state
        .execute_action(Action::Battle {
            target: CastleSlot::Primary,
        })
        .unwrap();
    let enemy = state.player(PlayerId::Two).primary();
    assert_eq!(enemy.fortification_strength(), 2);
    assert_eq!(enemy.total_damage(), 0);
}

#[test]
fn test_inactive_alliance_suit_cannot_attack() {
    let mut state = holding(card(Rank::Eight, Suit::Club));
    let options = state.available_actions();
    let battle = options
        .iter()
        .find(|o| o.kind() == ActionKind::Battle)
        .expect("disabled battle entry");
    assert!(!battle.is_available());
    assert_eq!(
        battle.reason(),
        Some("You must first persuade club castle to join your war")
    );
    assert!(matches!(
        state.execute_action(Action::Battle {
            target: CastleSlot::Primary
        }),
        Err(GameError::ActionUnavailable { .. })
    ));
}

#[test]
fn test_fallen_active_castle_soldiers_still_fight() {
    let mut state = holding(card(Rank::Six, Suit::Club));
    {
        let me = state.player_mut(PlayerId::One);
        let alliance = me.castle_mut(CastleSlot::Alliance);
        alliance.add_persuasion(card(Rank::Ten, Suit::Club));
        alliance.add_persuasion(card(Rank::Ten, Suit::Club));
        assert!(alliance.check_activation().is_some());
        alliance.add_permanent_damage(card(Rank::Ten, Suit::Heart));
        alliance.add_permanent_damage(card(Rank::Ten, Suit::Diamond));
        alliance.raze();
        assert!(alliance.is_destroyed());
    }

    let offers = state.available_offers();
    // The fallen castle has no royals left, so its raids never deal damage.
    assert!(offers.contains(&Offer::RaidNoDamage {
        target: CastleSlot::Primary
    }));
    assert!(!offers.iter().any(|o| matches!(o, Offer::Fortify { .. })));
    assert!(!offers.contains(&Offer::Persuade));

    state
        .player_mut(PlayerId::Two)
        .castle_mut(CastleSlot::Primary)
        .add_fortification(card(Rank::Five, Suit::Heart));
    let offers = state.available_offers();
    assert!(offers.contains(&Offer::Battle {
        target: CastleSlot::Primary
    }));

    state
        .execute_action(Action::Battle {
            target: CastleSlot::Primary,
        })
        .unwrap();
    assert!(state.player(PlayerId::Two).primary().fortification().is_none());
}

// === Royals and assassins ===

#[test]
fn test_enemy_royal_cannot_be_brought_to_power() {
    let mut state = holding(card(Rank::King, Suit::Heart));
    let options = state.available_actions();
    let power = options
        .iter()
        .find(|o| o.kind() == ActionKind::BringToPower)
        .expect("disabled entry");
    assert_eq!(power.reason(), Some("This heart royal belongs to your enemy"));
    assert!(state
        .execute_action(Action::BringToPower {
            castle: CastleSlot::Primary
        })
        .is_err());
    state.execute_action(Action::Field { pile: 1 }).unwrap();
    assert_eq!(state.field_top(1), Some(card(Rank::King, Suit::Heart)));
}

#[test]
fn test_bring_royal_to_power() {
    let mut state = holding(card(Rank::Queen, Suit::Spade));
    state
        .execute_action(Action::BringToPower {
            castle: CastleSlot::Primary,
        })
        .unwrap();
    assert_eq!(
        state.player(PlayerId::One).primary().royals(),
        &[card(Rank::Queen, Suit::Spade)]
    );
    assert!(state
        .log()
        .texts()
        .any(|t| t == "The Starless brought Q♠ to power!"));
}

#[test]
fn test_deck_assassin_forces_own_sacrifice() {
    let mut state = GameState::new(GameConfig::new().with_seed(8).with_jokers(false));
    state.start_game().unwrap();
    let player = state.current_player();
    let slot = CastleSlot::Primary;
    let royal = Card::new(Rank::Jack, state.player(player).primary_suit());
    seat_royal(&mut state, player, slot, royal);

    let mut deck = state.deck().to_vec();
    deck.push(card(Rank::Two, Suit::Heart));
    state.set_deck(deck);

    assert!(matches!(
        state.draw_from_deck().unwrap(),
        DrawOutcome::AssassinSurprise(_)
    ));
    assert_eq!(state.own_royals().len(), 1);
    assert_eq!(
        state.execute_assassin_surprise(None),
        Err(GameError::SacrificeRequired)
    );
    let target = state.own_royals()[0];
    state.execute_assassin_surprise(Some(target)).unwrap();

    assert!(!state.player(player).primary().has_royals());
    assert!(state.discard().contains(&royal));
    assert_eq!(state.current_player(), player.opponent());
}
