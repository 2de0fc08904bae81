//! The game state machine.
//!
//! `GameState` owns every card on the table: the deck, the three field
//! piles, the discard pile, both players' castles and the card in hand. It
//! is an explicitly passed value; AI players and drivers borrow it mutably
//! for one decision at a time.
//!
//! ## Round structure
//!
//! Each round deals one card onto each field pile (the flop), computes a
//! turn order `[first, second, first]` from the colors of the visible tops,
//! then runs three turns of `Draw → Action (→ sub-phase) → end of turn`.
//!
//! ## Errors
//!
//! Every mutating method checks the phase first and returns a `GameError`
//! without touching state when the call is illegal.
//!
//! Legal-move enumeration lives in `legal.rs`, action execution in
//! `execute.rs`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{shuffled_play_deck, Card, Color};
use crate::core::{
    GameConfig, GameError, GameRng, LogEntry, LogSink, MessageLog, PlayerId, PlayerMap, Result,
};
use crate::realm::{CastleSlot, Player};

use super::action::{ActionKind, ActionRecord};
use super::phase::{Age, Phase};
use super::snapshot::BoardSnapshot;

/// Number of shared field piles.
pub const FIELD_PILES: usize = 3;

/// Turns in each round.
pub const TURNS_PER_ROUND: usize = 3;

/// Where the held card came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    Deck,
    Field(usize),
}

/// The card the current player is holding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub card: Card,
    pub source: DrawSource,
}

/// Result of a successful draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A joker changed the Age; the player must draw again.
    Joker,
    /// The card is held and the game is in the action phase.
    Held(Card),
    /// An assassin came off the deck; one of the drawer's royals must die.
    AssassinSurprise(Card),
}

/// The raid awaiting its follow-up choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingRaid {
    pub target: CastleSlot,
    pub attacker: CastleSlot,
}

/// Who goes first given the visible colors and the Age. Ties favor player 1.
///
/// ```
/// use royal_family::core::PlayerId;
/// use royal_family::rules::{first_player, Age};
///
/// // Uprising: fewer of your color showing means you go first.
/// assert_eq!(first_player(Age::Uprising, 2, 1), PlayerId::Two);
/// // Oppression: more of your color showing means you go first.
/// assert_eq!(first_player(Age::Oppression, 2, 1), PlayerId::One);
/// ```
#[must_use]
pub fn first_player(age: Age, black: usize, red: usize) -> PlayerId {
    let black_first = match age {
        Age::Uprising => black <= red,
        Age::Oppression => black >= red,
    };
    if black_first {
        PlayerId::One
    } else {
        PlayerId::Two
    }
}

/// Complete state of one game.
#[derive(Debug)]
pub struct GameState {
    pub(super) config: GameConfig,
    pub(super) players: PlayerMap<Player>,
    /// Top of the deck is the end of the vec.
    pub(super) deck: Vec<Card>,
    /// Each pile bottom to top.
    pub(super) field: [Vec<Card>; FIELD_PILES],
    pub(super) discard: Vec<Card>,
    /// Jokers pulled out of circulation by a reshuffle.
    pub(super) set_aside: Vec<Card>,
    pub(super) joker: Option<Card>,
    pub(super) turn_order: [PlayerId; TURNS_PER_ROUND],
    pub(super) turn_index: usize,
    pub(super) current_player: PlayerId,
    pub(super) round: u32,
    pub(super) turn: u32,
    pub(super) phase: Phase,
    pub(super) drawn: Option<DrawnCard>,
    pub(super) pending_raid: Option<PendingRaid>,
    pub(super) winner: Option<PlayerId>,
    pub(super) last_action: Option<ActionKind>,
    pub(super) history: Vec<ActionRecord>,
    pub(super) log: MessageLog,
    pub(super) sink: Option<Box<dyn LogSink>>,
    pub(super) rng: GameRng,
    pub(super) revision: u64,
}

impl GameState {
    /// Seat both players and shuffle a fresh deck. The game waits in
    /// `Setup` until `start_game`.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let deck = shuffled_play_deck(config.include_jokers, &mut rng);
        Self {
            players: PlayerMap::new(Player::new),
            deck,
            field: Default::default(),
            discard: Vec::new(),
            set_aside: Vec::new(),
            joker: None,
            turn_order: [PlayerId::One, PlayerId::Two, PlayerId::One],
            turn_index: 0,
            current_player: PlayerId::One,
            round: 0,
            turn: 0,
            phase: Phase::Setup,
            drawn: None,
            pending_raid: None,
            winner: None,
            last_action: None,
            history: Vec::new(),
            log: MessageLog::new(config.log_capacity),
            sink: None,
            rng,
            revision: 0,
            config,
        }
    }

    /// Start over with a new shuffle seeded from this game's stream.
    /// Player names and the log sink carry over.
    pub fn reset(&mut self) {
        let seed = self.rng.fork().seed();
        let mut fresh = Self::new(self.config.clone().with_seed(seed));
        for id in PlayerId::ALL {
            fresh.players[id].set_name(self.players[id].name());
        }
        fresh.sink = self.sink.take();
        fresh.revision = self.revision + 1;
        *self = fresh;
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn age(&self) -> Age {
        if self.joker.is_some() {
            Age::Oppression
        } else {
            Age::Uprising
        }
    }

    #[must_use]
    pub fn joker_in_play(&self) -> bool {
        self.joker.is_some()
    }

    /// Rounds dealt so far; 1 during the first round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Completed turns across the whole game.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    /// Position within the round's turn order, 0..3.
    #[must_use]
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    #[must_use]
    pub fn turn_order(&self) -> [PlayerId; TURNS_PER_ROUND] {
        self.turn_order
    }

    #[must_use]
    pub fn is_first_turn_of_round(&self) -> bool {
        self.turn_index == 0
    }

    /// The next flop will bury whatever gets fielded now.
    #[must_use]
    pub fn is_last_turn_of_round(&self) -> bool {
        self.turn_index + 1 >= TURNS_PER_ROUND
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.current_player.opponent()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Direct access for setting up positions. Normal play mutates castles
    /// only through the action methods.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// Remaining deck, top card last.
    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    /// A field pile bottom to top; empty for an out-of-range index.
    #[must_use]
    pub fn field_pile(&self, index: usize) -> &[Card] {
        self.field.get(index).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn field_top(&self, index: usize) -> Option<Card> {
        self.field_pile(index).last().copied()
    }

    /// The card directly under the top of a pile.
    #[must_use]
    pub fn field_beneath(&self, index: usize) -> Option<Card> {
        let pile = self.field_pile(index);
        pile.len().checked_sub(2).map(|i| pile[i])
    }

    #[must_use]
    pub fn field_tops(&self) -> [Option<Card>; FIELD_PILES] {
        std::array::from_fn(|i| self.field_top(i))
    }

    #[must_use]
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    /// Jokers removed from circulation by reshuffles.
    #[must_use]
    pub fn set_aside(&self) -> &[Card] {
        &self.set_aside
    }

    #[must_use]
    pub fn drawn(&self) -> Option<DrawnCard> {
        self.drawn
    }

    #[must_use]
    pub fn drawn_card(&self) -> Option<Card> {
        self.drawn.map(|d| d.card)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Kind of the most recent executed action, by either player.
    #[must_use]
    pub fn last_action(&self) -> Option<ActionKind> {
        self.last_action
    }

    #[must_use]
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Bumped by every successful state change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Visible tops counted by color, `(black, red)`.
    #[must_use]
    pub fn field_color_counts(&self) -> (usize, usize) {
        self.field_tops()
            .into_iter()
            .flatten()
            .fold((0, 0), |(black, red), card| match card.color() {
                Some(Color::Black) => (black + 1, red),
                Some(Color::Red) => (black, red + 1),
                None => (black, red),
            })
    }

    /// Derive an independent RNG stream, one per AI seat.
    pub fn fork_rng(&mut self) -> GameRng {
        self.rng.fork()
    }

    // === Log ===

    /// Install an observer for every subsequent log entry.
    pub fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = Some(sink);
    }

    /// Append a message to the game log and forward it to the sink.
    pub fn log_message(&mut self, text: impl Into<String>) {
        let entry = LogEntry {
            round: self.round,
            turn: self.turn,
            text: text.into(),
        };
        debug!(target: "royal_family::game", round = entry.round, turn = entry.turn, "{}", entry.text);

        let snapshot = self
            .sink
            .as_ref()
            .is_some_and(|sink| sink.wants_snapshot())
            .then(|| BoardSnapshot::capture(self));
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&entry, snapshot);
        }
        self.log.push(entry);
    }

    fn retract_message(&mut self) {
        self.log.pop();
        if let Some(sink) = self.sink.as_mut() {
            sink.retract();
        }
    }

    pub(super) fn player_name(&self, id: PlayerId) -> String {
        self.players[id].name().to_string()
    }

    pub(super) fn touch(&mut self) {
        self.revision += 1;
    }

    pub(super) fn require_phase(&self, expected: Phase) -> Result<()> {
        match self.phase {
            Phase::GameOver => Err(GameError::GameOver),
            actual if actual == expected => Ok(()),
            actual => Err(GameError::WrongPhase { expected, actual }),
        }
    }

    // === Rounds ===

    /// Leave setup and deal the first flop.
    pub fn start_game(&mut self) -> Result<()> {
        self.require_phase(Phase::Setup)?;
        self.log_message("⚔️ Royal Family - Game Started! ⚔️");
        let banner = format!(
            "{} (Black) vs {} (Red)",
            self.players[PlayerId::One].name(),
            self.players[PlayerId::Two].name()
        );
        self.log_message(banner);
        self.deal_flop();
        self.touch();
        Ok(())
    }

    /// Deal the next round's flop.
    pub fn next_round(&mut self) -> Result<()> {
        self.require_phase(Phase::Flop)?;
        self.deal_flop();
        self.touch();
        Ok(())
    }

    fn deal_flop(&mut self) {
        self.round += 1;
        self.log_message(format!("═══ Round {} ═══", self.round));

        if self.deck.len() < FIELD_PILES {
            self.reshuffle();
        }

        // Deal into a buffer so a reshuffle mid-deal cannot sweep up this
        // round's cards.
        let mut dealt = [None; FIELD_PILES];
        for slot in &mut dealt {
            *slot = self.pop_non_joker();
        }
        for (pile, card) in self.field.iter_mut().zip(dealt) {
            pile.extend(card);
        }

        self.log_message(format!("Age of {}", self.age()));
        self.determine_turn_order();
        self.phase = Phase::Draw;
    }

    fn determine_turn_order(&mut self) {
        let (black, red) = self.field_color_counts();
        let first = first_player(self.age(), black, red);
        let second = first.opponent();

        self.turn_order = [first, second, first];
        self.turn_index = 0;
        self.current_player = first;

        let first_name = self.player_name(first);
        let second_name = self.player_name(second);
        self.log_message(format!(
            "Turn order: {first_name} → {second_name} → {first_name}"
        ));
    }

    /// Toggle the Age. A second joker retires both.
    fn handle_joker(&mut self, joker: Card) {
        match self.joker.take() {
            Some(first) => {
                self.log_message("Second Joker appears! Both Jokers discarded. Age of Uprising returns!");
                self.discard.push(first);
                self.discard.push(joker);
            }
            None => {
                self.log_message("Joker appears! Age of Oppression begins!");
                self.joker = Some(joker);
            }
        }
    }

    /// Gather discard and field piles (and whatever is left of the deck) into
    /// a fresh deck. Jokers are set aside rather than shuffled back in.
    fn reshuffle(&mut self) {
        let mut cards = std::mem::take(&mut self.discard);
        for pile in &mut self.field {
            cards.append(pile);
        }
        cards.append(&mut self.deck);

        let (jokers, mut cards): (Vec<Card>, Vec<Card>) =
            cards.into_iter().partition(|card| card.is_joker());
        self.set_aside.extend(jokers);

        self.rng.shuffle(&mut cards);
        self.deck = cards;
        self.log_message("Deck reshuffled!");
    }

    /// Whether a draw could produce a card, reshuffling if needed.
    fn can_restock(&self) -> bool {
        !self.deck.is_empty()
            || self
                .discard
                .iter()
                .chain(self.field.iter().flatten())
                .any(|card| !card.is_joker())
    }

    fn pop_deck(&mut self) -> Option<Card> {
        if self.deck.is_empty() {
            self.reshuffle();
        }
        self.deck.pop()
    }

    /// Pop cards until a non-joker appears, resolving jokers on the way.
    fn pop_non_joker(&mut self) -> Option<Card> {
        loop {
            match self.pop_deck()? {
                Card::Joker => self.handle_joker(Card::Joker),
                card => return Some(card),
            }
        }
    }

    // === Drawing ===

    /// Draw the top card of the deck, reshuffling first if it is empty.
    pub fn draw_from_deck(&mut self) -> Result<DrawOutcome> {
        self.require_phase(Phase::Draw)?;
        if !self.can_restock() {
            return Err(GameError::DeckExhausted);
        }
        let card = self.pop_deck().ok_or(GameError::DeckExhausted)?;
        let name = self.player_name(self.current_player);

        let outcome = if card.is_joker() {
            self.handle_joker(card);
            self.log_message(format!("{name} drew a Joker! Draw again."));
            DrawOutcome::Joker
        } else if card.is_assassin() {
            self.drawn = Some(DrawnCard {
                card,
                source: DrawSource::Deck,
            });
            self.log_message(format!(
                "{name} drew an Assassin from the deck! SURPRISE! One of your royals must die."
            ));
            self.phase = Phase::AssassinSurprise;
            DrawOutcome::AssassinSurprise(card)
        } else {
            self.drawn = Some(DrawnCard {
                card,
                source: DrawSource::Deck,
            });
            self.log_message(format!("{name} drew from the deck"));
            self.phase = Phase::Action;
            DrawOutcome::Held(card)
        };

        self.touch();
        Ok(outcome)
    }

    /// Take the top card of a field pile.
    pub fn draw_from_field(&mut self, pile: usize) -> Result<DrawOutcome> {
        self.require_phase(Phase::Draw)?;
        let card = self
            .field
            .get_mut(pile)
            .ok_or(GameError::PileOutOfRange(pile))?
            .pop()
            .ok_or(GameError::EmptyPile(pile))?;
        let name = self.player_name(self.current_player);

        let outcome = if card.is_joker() {
            self.handle_joker(card);
            self.log_message(format!("{name} drew a Joker from the field! Draw again."));
            DrawOutcome::Joker
        } else {
            self.drawn = Some(DrawnCard {
                card,
                source: DrawSource::Field(pile),
            });
            if card.is_assassin() {
                self.log_message(format!(
                    "{name} drew an Assassin! Can assassinate an enemy royal."
                ));
            } else {
                self.log_message(format!("{name} drew {card}"));
            }
            self.phase = Phase::Action;
            DrawOutcome::Held(card)
        };

        self.touch();
        Ok(outcome)
    }

    /// Whether the held card can go back to the pile it came from.
    #[must_use]
    pub fn can_cancel_draw(&self) -> bool {
        self.phase == Phase::Action
            && matches!(
                self.drawn,
                Some(DrawnCard {
                    source: DrawSource::Field(_),
                    ..
                })
            )
    }

    /// Put a card drawn from the field back and return to the draw phase.
    /// The draw's log message is withdrawn.
    pub fn cancel_draw(&mut self) -> Result<()> {
        self.require_phase(Phase::Action)?;
        let drawn = self.drawn.ok_or(GameError::NoDrawnCard)?;
        let DrawSource::Field(pile) = drawn.source else {
            return Err(GameError::NotCancellable);
        };

        self.field[pile].push(drawn.card);
        self.drawn = None;
        self.phase = Phase::Draw;
        self.retract_message();
        self.touch();
        Ok(())
    }

    // === Turn flow ===

    pub(super) fn end_turn(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.drawn = None;
        self.pending_raid = None;
        self.turn += 1;
        self.turn_index += 1;

        if self.turn_index >= TURNS_PER_ROUND {
            self.phase = Phase::Flop;
        } else {
            self.current_player = self.turn_order[self.turn_index];
            self.phase = Phase::Draw;
            let name = self.player_name(self.current_player);
            self.log_message(format!("--- {name}'s turn ---"));
        }
    }

    pub(super) fn record_action(&mut self, kind: ActionKind) {
        self.last_action = Some(kind);
        self.history.push(ActionRecord {
            player: self.current_player,
            kind,
            round: self.round,
            turn: self.turn,
        });
    }

    // === Position setup ===

    /// Replace the deck. The last card is drawn first.
    pub fn set_deck(&mut self, cards: Vec<Card>) {
        self.deck = cards;
        self.touch();
    }

    /// Replace a field pile, bottom to top.
    pub fn set_field_pile(&mut self, pile: usize, cards: Vec<Card>) -> Result<()> {
        let slot = self
            .field
            .get_mut(pile)
            .ok_or(GameError::PileOutOfRange(pile))?;
        *slot = cards;
        self.touch();
        Ok(())
    }

    /// Jump to `player` holding `card` as their first turn of a round,
    /// as if it had just been drawn from the deck. An assassin lands in the
    /// surprise phase like a real deck draw would.
    pub fn arrange_turn(&mut self, player: PlayerId, card: Card) {
        self.round = self.round.max(1);
        self.turn_order = [player, player.opponent(), player];
        self.turn_index = 0;
        self.current_player = player;
        self.pending_raid = None;
        self.winner = None;
        self.drawn = Some(DrawnCard {
            card,
            source: DrawSource::Deck,
        });
        self.phase = if card.is_assassin() {
            Phase::AssassinSurprise
        } else {
            Phase::Action
        };
        self.touch();
    }
}
