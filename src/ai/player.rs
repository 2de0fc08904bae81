//! The heuristic AI player.
//!
//! `AiPlayer` owns its mood, counters and random stream; the game is passed
//! in by reference on every call. Each `decide_*` method resolves exactly one
//! pending decision by calling the matching `GameState` operation.

use std::time::Duration;

use tracing::{debug, trace};

use crate::cards::Card;
use crate::core::{GameRng, PlayerId, Result};
use crate::realm::Player;
use crate::rules::{
    Action, ActionKind, DrawOutcome, DrawSource, GameState, Offer, Phase, RaidChoice,
    RoyalTarget, FIELD_PILES,
};

use super::config::AiConfig;
use super::evaluate::CardEvaluator;
use super::mood::{roll_mood_shift, Mood, MoodContext};
use super::scoring::{score_offer, FieldSurvey};
use super::select::{pick_from_similar_options, Scored};

/// Heuristic AI for one seat.
#[derive(Clone, Debug)]
pub struct AiPlayer {
    seat: PlayerId,
    config: AiConfig,
    mood: Mood,
    turns_since_mood_change: u32,
    turns_since_attack: u32,
    last_action: Option<ActionKind>,
    /// Turn number of the last mood update, so joker redraws don't re-roll.
    mood_turn: Option<u32>,
    rng: GameRng,
}

impl AiPlayer {
    /// Create an AI with its own random stream and a random starting mood.
    pub fn new(seat: PlayerId, config: AiConfig, mut rng: GameRng) -> Self {
        let mood = Mood::random(&mut rng);
        Self {
            seat,
            config,
            mood,
            turns_since_mood_change: 0,
            turns_since_attack: 0,
            last_action: None,
            mood_turn: None,
            rng,
        }
    }

    /// Create an AI whose stream is forked from the game's, so a seeded
    /// game replays identically.
    pub fn for_game(seat: PlayerId, config: AiConfig, state: &mut GameState) -> Self {
        let rng = state.fork_rng();
        Self::new(seat, config, rng)
    }

    // === Queries ===

    #[must_use]
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    #[must_use]
    pub fn turns_since_attack(&self) -> u32 {
        self.turns_since_attack
    }

    #[must_use]
    pub fn last_action(&self) -> Option<ActionKind> {
        self.last_action
    }

    /// Cosmetic pause before deciding in `phase`: the full delay for a draw,
    /// half for follow-up decisions.
    #[must_use]
    pub fn thinking_delay(&self, phase: Phase) -> Duration {
        let ms = match phase {
            Phase::Draw => self.config.thinking_delay_ms,
            _ => self.config.thinking_delay_ms / 2,
        };
        Duration::from_millis(ms)
    }

    fn variance(&mut self) -> f64 {
        self.rng.gen_spread(self.config.variance)
    }

    // === Mood ===

    fn mood_context(&self, state: &GameState) -> MoodContext {
        let me = state.player(self.seat);
        let enemy = state.player(self.seat.opponent());
        let worst_damage = |player: &Player| {
            player
                .surviving_castles()
                .map(|(_, c)| c.total_damage())
                .max()
                .unwrap_or(0)
        };
        MoodContext {
            my_royals: me.royal_count(),
            enemy_royals: enemy.royal_count(),
            my_damage: worst_damage(me),
            enemy_damage: worst_damage(enemy),
            unprotected_royals: me
                .surviving_castles()
                .any(|(_, c)| c.has_royals() && c.fortification().is_none()),
            alliance_persuasion: me.alliance().net_persuasion(),
            alliance_active: me.alliance().is_active(),
            turns_since_attack: self.turns_since_attack,
            turns_since_mood_change: self.turns_since_mood_change,
            last_action: self.last_action,
        }
    }

    /// Re-roll the mood at the start of one of this seat's turns.
    ///
    /// Runs at most once per turn; later calls in the same turn are ignored.
    pub fn update_mood(&mut self, state: &mut GameState) {
        let turn = state.turn_number();
        if self.mood_turn == Some(turn) {
            return;
        }
        self.mood_turn = Some(turn);
        self.turns_since_mood_change += 1;

        let ctx = self.mood_context(state);
        let Some(trigger) = roll_mood_shift(&ctx, self.mood, &mut self.rng) else {
            return;
        };
        if trigger.mood == self.mood {
            return;
        }

        let old = self.mood;
        self.mood = trigger.mood;
        self.turns_since_mood_change = 0;
        debug!(seat = %self.seat, from = %old, to = %trigger.mood, reason = trigger.reason, "mood shift");
        let name = state.player(self.seat).name().to_string();
        state.log_message(format!(
            "{name}'s mood shifts: {} → {} ({})",
            old.emoji(),
            trigger.mood.emoji(),
            trigger.reason
        ));
    }

    // === Draw ===

    fn score_field_draw(&mut self, state: &GameState, pile: usize, top: Card) -> f64 {
        let eval = CardEvaluator::new(state, self.seat);
        let mut score = eval.value_to_me(top);

        let denial = eval.value_to_opponent(top);
        if denial >= 15.0 {
            score += denial * 0.5;
        }

        if let Some(beneath) = state.field_beneath(pile) {
            let first_turn = state.turn_index() == 0;
            let for_them = eval.value_to_opponent(beneath);
            if for_them >= 12.0 {
                score -= for_them * 0.4 * if first_turn { 0.5 } else { 0.2 };
            }
            let for_me = eval.value_to_me(beneath);
            if for_me >= 15.0 {
                score += for_me * if first_turn { 0.4 } else { 0.1 };
            }
        }

        score + self.variance()
    }

    /// Pick a draw source for the current field.
    pub fn choose_draw(&mut self, state: &GameState) -> DrawSource {
        let mut options = Vec::with_capacity(FIELD_PILES + 1);
        for pile in 0..FIELD_PILES {
            if let Some(top) = state.field_top(pile) {
                let score = self.score_field_draw(state, pile, top);
                options.push(Scored::new(DrawSource::Field(pile), score));
            }
        }
        let deck = self.config.deck_base_score + self.variance();
        options.push(Scored::new(DrawSource::Deck, deck));

        options.retain(|o| o.score >= self.config.draw_floor);
        trace!(seat = %self.seat, options = ?options, "draw options");
        pick_from_similar_options(options, self.config.similar_threshold, &mut self.rng)
            .map_or(DrawSource::Deck, |chosen| chosen.option)
    }

    /// Resolve the draw phase.
    pub fn decide_draw(&mut self, state: &mut GameState) -> Result<DrawOutcome> {
        self.update_mood(state);
        match self.choose_draw(state) {
            DrawSource::Deck => state.draw_from_deck(),
            DrawSource::Field(pile) => state.draw_from_field(pile),
        }
    }

    // === Action ===

    /// Score every offer for the held card, mood and noise included.
    pub fn score_offers(&mut self, state: &GameState) -> Vec<Scored<Offer>> {
        let Some(card) = state.drawn_card() else {
            return Vec::new();
        };
        let offers = state.available_offers();
        let mut scored = Vec::with_capacity(offers.len());
        for offer in offers {
            let score =
                score_offer(state, card, &offer) + self.mood.modifier(offer.kind()) + self.variance();
            scored.push(Scored::new(offer, score));
        }
        scored
    }

    /// Resolve the action phase. Choosing to field the card moves the game
    /// to pile selection; `decide_field_pile` finishes it.
    pub fn decide_action(&mut self, state: &mut GameState) -> Result<()> {
        let scored = self.score_offers(state);
        trace!(seat = %self.seat, mood = %self.mood, options = ?scored, "action options");
        let chosen = pick_from_similar_options(scored, self.config.similar_threshold, &mut self.rng)
            .filter(|chosen| chosen.score > 0.0);

        let Some(Scored { option: offer, .. }) = chosen else {
            return state.begin_field_select();
        };

        let kind = offer.kind();
        self.last_action = Some(kind);
        if matches!(
            kind,
            ActionKind::Raid | ActionKind::Battle | ActionKind::Assassinate
        ) {
            self.turns_since_attack = 0;
        } else {
            self.turns_since_attack += 1;
        }

        match offer {
            Offer::Field => state.begin_field_select(),
            Offer::Assassinate { targets } => {
                let target = targets
                    .into_iter()
                    .reduce(|best, t| if t.royal.tier() > best.royal.tier() { t } else { best });
                match target {
                    Some(target) => state.execute_action(Action::Assassinate { target }),
                    None => state.begin_field_select(),
                }
            }
            other => match other.to_action() {
                Some(action) => state.execute_action(action),
                None => state.begin_field_select(),
            },
        }
    }

    /// Pick the pile to cover with the held card.
    #[must_use]
    pub fn choose_field_pile(&self, state: &GameState) -> usize {
        let last_turn = state.is_last_turn_of_round();
        let survey = FieldSurvey::take(state, self.seat);
        if let (true, Some(pile), false) = (survey.desirable_royal, survey.assassin_pile, last_turn)
        {
            return pile;
        }

        let eval = CardEvaluator::new(state, self.seat);
        let mut piles: Vec<(usize, f64, usize)> = (0..FIELD_PILES)
            .map(|pile| {
                let mut cover = state
                    .field_top(pile)
                    .map_or(0.0, |top| eval.value_to_opponent(top));
                if last_turn {
                    cover *= 0.1;
                }
                (pile, cover, state.field_pile(pile).len())
            })
            .collect();
        piles.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.cmp(&a.2)));
        piles.first().map_or(0, |&(pile, _, _)| pile)
    }

    /// Resolve pile selection.
    pub fn decide_field_pile(&mut self, state: &mut GameState) -> Result<()> {
        if state.phase() == Phase::Action {
            state.begin_field_select()?;
        }
        let pile = self.choose_field_pile(state);
        state.execute_action(Action::Field { pile })
    }

    // === Follow-ups ===

    /// Kill the highest royal, else rescue, else kidnap the highest, else skip.
    #[must_use]
    pub fn choose_raid_choice(&self, options: &[RaidChoice]) -> RaidChoice {
        let highest = |pick: fn(&RaidChoice) -> Option<Card>| {
            options.iter().filter_map(pick).max_by_key(|royal| royal.tier())
        };
        if let Some(royal) = highest(|c| match c {
            RaidChoice::Kill(royal) => Some(*royal),
            _ => None,
        }) {
            return RaidChoice::Kill(royal);
        }
        if options.contains(&RaidChoice::Rescue) {
            return RaidChoice::Rescue;
        }
        if let Some(royal) = highest(|c| match c {
            RaidChoice::Kidnap(royal) => Some(*royal),
            _ => None,
        }) {
            return RaidChoice::Kidnap(royal);
        }
        RaidChoice::Skip
    }

    pub fn decide_raid_choice(&mut self, state: &mut GameState) -> Result<()> {
        let choice = self.choose_raid_choice(&state.raid_options());
        state.execute_raid_choice(choice)
    }

    /// The lowest royal to give up, if any.
    #[must_use]
    pub fn choose_sacrifice(&self, royals: &[RoyalTarget]) -> Option<RoyalTarget> {
        royals
            .iter()
            .copied()
            .reduce(|low, r| if r.royal.tier() <= low.royal.tier() { r } else { low })
    }

    pub fn decide_assassin_surprise(&mut self, state: &mut GameState) -> Result<()> {
        let target = self.choose_sacrifice(&state.own_royals());
        state.execute_assassin_surprise(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use crate::core::GameConfig;
    use crate::realm::CastleSlot;

    fn ai(seat: PlayerId) -> AiPlayer {
        AiPlayer::new(seat, AiConfig::new().deterministic(), GameRng::new(17))
    }

    fn empty_field_state() -> GameState {
        let mut state = GameState::new(GameConfig::new().with_seed(2).with_jokers(false));
        for pile in 0..FIELD_PILES {
            state.set_field_pile(pile, Vec::new()).unwrap();
        }
        state
    }

    fn royal(rank: Rank, suit: Suit, slot: CastleSlot) -> RoyalTarget {
        RoyalTarget {
            slot,
            royal: Card::new(rank, suit),
        }
    }

    #[test]
    fn test_raid_choice_priority() {
        let ai = ai(PlayerId::One);
        let jack = Card::new(Rank::Jack, Suit::Heart);
        let queen = Card::new(Rank::Queen, Suit::Heart);
        let options = vec![
            RaidChoice::Skip,
            RaidChoice::Rescue,
            RaidChoice::Kill(jack),
            RaidChoice::Kidnap(jack),
            RaidChoice::Kill(queen),
            RaidChoice::Kidnap(queen),
        ];
        assert_eq!(ai.choose_raid_choice(&options), RaidChoice::Kill(queen));
        assert_eq!(
            ai.choose_raid_choice(&[RaidChoice::Skip, RaidChoice::Rescue]),
            RaidChoice::Rescue
        );
        assert_eq!(
            ai.choose_raid_choice(&[RaidChoice::Skip, RaidChoice::Kidnap(jack)]),
            RaidChoice::Kidnap(jack)
        );
        assert_eq!(ai.choose_raid_choice(&[RaidChoice::Skip]), RaidChoice::Skip);
    }

    #[test]
    fn test_sacrifice_lowest() {
        let ai = ai(PlayerId::One);
        let royals = [
            royal(Rank::King, Suit::Spade, CastleSlot::Primary),
            royal(Rank::Jack, Suit::Spade, CastleSlot::Primary),
            royal(Rank::Queen, Suit::Club, CastleSlot::Alliance),
        ];
        assert_eq!(ai.choose_sacrifice(&royals), Some(royals[1]));
        assert_eq!(ai.choose_sacrifice(&[]), None);
    }

    #[test]
    fn test_field_pile_covers_assassin_guarding_royal() {
        let mut state = empty_field_state();
        state
            .set_field_pile(0, vec![Card::new(Rank::King, Suit::Heart)])
            .unwrap();
        state
            .set_field_pile(1, vec![Card::new(Rank::Queen, Suit::Spade)])
            .unwrap();
        state
            .set_field_pile(2, vec![Card::new(Rank::Two, Suit::Club)])
            .unwrap();
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        assert_eq!(ai(PlayerId::One).choose_field_pile(&state), 2);
    }

    #[test]
    fn test_field_pile_covers_most_dangerous() {
        let mut state = empty_field_state();
        state
            .set_field_pile(0, vec![Card::new(Rank::Three, Suit::Club)])
            .unwrap();
        state
            .set_field_pile(1, vec![Card::new(Rank::King, Suit::Heart)])
            .unwrap();
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        assert_eq!(ai(PlayerId::One).choose_field_pile(&state), 1);
    }

    #[test]
    fn test_field_pile_prefers_taller_on_tie() {
        let mut state = empty_field_state();
        state
            .set_field_pile(2, vec![Card::Joker, Card::Joker])
            .unwrap();
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        // Every top is worth 0 to the opponent; the two-card pile wins.
        assert_eq!(ai(PlayerId::One).choose_field_pile(&state), 2);
    }

    #[test]
    fn test_draw_prefers_valuable_field_card() {
        let mut state = empty_field_state();
        state
            .set_field_pile(1, vec![Card::new(Rank::King, Suit::Spade)])
            .unwrap();
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        let mut ai = ai(PlayerId::One);
        // King for an empty primary castle (20) beats the blind deck (10).
        assert_eq!(ai.choose_draw(&state), DrawSource::Field(1));
    }

    #[test]
    fn test_draw_defaults_to_deck() {
        let state = empty_field_state();
        let mut ai = ai(PlayerId::One);
        assert_eq!(ai.choose_draw(&state), DrawSource::Deck);
    }

    #[test]
    fn test_decide_action_raids_with_royals() {
        let mut state = empty_field_state();
        state
            .player_mut(PlayerId::One)
            .castle_mut(CastleSlot::Primary)
            .add_royal(Card::new(Rank::King, Suit::Spade));
        state
            .player_mut(PlayerId::One)
            .castle_mut(CastleSlot::Primary)
            .add_fortification(Card::new(Rank::Ten, Suit::Spade));
        state.arrange_turn(PlayerId::One, Card::new(Rank::Nine, Suit::Spade));

        let mut ai = ai(PlayerId::One);
        ai.set_mood(Mood::Opportunistic);
        ai.decide_action(&mut state).unwrap();

        assert_eq!(ai.last_action(), Some(ActionKind::Raid));
        assert_eq!(ai.turns_since_attack(), 0);
        assert_eq!(state.phase(), Phase::RaidChoice);
        assert_eq!(state.player(PlayerId::Two).primary().total_damage(), 9);
    }

    #[test]
    fn test_decide_action_fields_when_nothing_scores() {
        let mut state = empty_field_state();
        // A heart is useless to player one beyond fielding.
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        let mut ai = ai(PlayerId::One);
        ai.set_mood(Mood::Opportunistic);
        ai.decide_action(&mut state).unwrap();
        assert_eq!(state.phase(), Phase::FieldSelect);

        ai.decide_field_pile(&mut state).unwrap();
        let fielded: usize = (0..FIELD_PILES).map(|p| state.field_pile(p).len()).sum();
        assert_eq!(fielded, 1);
    }

    #[test]
    fn test_mood_updates_once_per_turn() {
        let mut state = empty_field_state();
        state.arrange_turn(PlayerId::One, Card::new(Rank::Three, Suit::Heart));
        let mut ai = ai(PlayerId::One);
        ai.update_mood(&mut state);
        let counter = ai.turns_since_mood_change;
        ai.update_mood(&mut state);
        assert_eq!(ai.turns_since_mood_change, counter);
    }

    #[test]
    fn test_thinking_delay_halves_for_follow_ups() {
        let ai = AiPlayer::new(PlayerId::Two, AiConfig::new(), GameRng::new(1));
        assert_eq!(ai.thinking_delay(Phase::Draw), Duration::from_millis(800));
        assert_eq!(ai.thinking_delay(Phase::RaidChoice), Duration::from_millis(400));
    }
}
