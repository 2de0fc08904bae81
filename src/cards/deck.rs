//! Deck construction and shuffling.

use crate::core::GameRng;

use super::card::{Card, Rank, Suit};

/// Build the 52 standard cards (suit-major order), optionally plus two jokers.
#[must_use]
pub fn standard_deck(include_jokers: bool) -> Vec<Card> {
    let mut deck: Vec<Card> = Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
        .collect();

    if include_jokers {
        deck.push(Card::Joker);
        deck.push(Card::Joker);
    }

    deck
}

/// Build the draw deck: the standard deck minus the four aces, which stand on
/// the table as castle markers instead of being drawn.
#[must_use]
pub fn play_deck(include_jokers: bool) -> Vec<Card> {
    standard_deck(include_jokers)
        .into_iter()
        .filter(|card| !card.is_castle_marker())
        .collect()
}

/// Build and shuffle a play deck. The top of the deck is the end of the vec.
#[must_use]
pub fn shuffled_play_deck(include_jokers: bool, rng: &mut GameRng) -> Vec<Card> {
    let mut deck = play_deck(include_jokers);
    rng.shuffle(&mut deck);
    deck
}
