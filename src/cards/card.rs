//! Card identity: suits, ranks, categories, and royal tiers.
//!
//! A Royal Family deck is a standard 52-card deck plus two jokers. The rank
//! decides what a card can do:
//!
//! | Rank      | Category       |
//! |-----------|----------------|
//! | A         | castle marker  |
//! | 2         | assassin       |
//! | 3–10      | soldier        |
//! | J, Q, K   | royal          |

use serde::{Deserialize, Serialize};

/// Suit color. Player 1 plays black, player 2 plays red.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
}

/// The four suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Club => '♣',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
        }
    }

    /// Lowercase name used in log messages ("spade castle").
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Spade => "spade",
            Suit::Club => "club",
            Suit::Heart => "heart",
            Suit::Diamond => "diamond",
        }
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Spade | Suit::Club => Color::Black,
            Suit::Heart | Suit::Diamond => Color::Red,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The thirteen face ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks, ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric value, A=1 through K=13.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Elimination tier for royals, `None` for every other rank.
    #[must_use]
    pub const fn royal_tier(self) -> Option<RoyalTier> {
        match self {
            Rank::Jack => Some(RoyalTier::Jack),
            Rank::Queen => Some(RoyalTier::Queen),
            Rank::King => Some(RoyalTier::King),
            _ => None,
        }
    }
}

/// Royal elimination tier: K > Q > J.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoyalTier {
    Jack = 1,
    Queen = 2,
    King = 3,
}

/// What a card can be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Joker,
    CastleMarker,
    Assassin,
    Soldier,
    Royal(RoyalTier),
}

/// An immutable playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Standard { rank: Rank, suit: Suit },
    Joker,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Standard { rank, suit }
    }

    #[must_use]
    pub const fn rank(self) -> Option<Rank> {
        match self {
            Card::Standard { rank, .. } => Some(rank),
            Card::Joker => None,
        }
    }

    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        match self {
            Card::Standard { suit, .. } => Some(suit),
            Card::Joker => None,
        }
    }

    /// `None` for jokers, which are wild.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Card::Standard { suit, .. } => Some(suit.color()),
            Card::Joker => None,
        }
    }

    /// Numeric value (A=1..K=13); jokers are worth 0.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Card::Standard { rank, .. } => rank.value(),
            Card::Joker => 0,
        }
    }

    #[must_use]
    pub const fn kind(self) -> CardKind {
        match self {
            Card::Joker => CardKind::Joker,
            Card::Standard { rank, .. } => match rank {
                Rank::Ace => CardKind::CastleMarker,
                Rank::Two => CardKind::Assassin,
                Rank::Jack => CardKind::Royal(RoyalTier::Jack),
                Rank::Queen => CardKind::Royal(RoyalTier::Queen),
                Rank::King => CardKind::Royal(RoyalTier::King),
                _ => CardKind::Soldier,
            },
        }
    }

    #[must_use]
    pub const fn is_joker(self) -> bool {
        matches!(self, Card::Joker)
    }

    #[must_use]
    pub const fn is_royal(self) -> bool {
        matches!(self.kind(), CardKind::Royal(_))
    }

    #[must_use]
    pub const fn is_soldier(self) -> bool {
        matches!(self.kind(), CardKind::Soldier)
    }

    #[must_use]
    pub const fn is_assassin(self) -> bool {
        matches!(self.kind(), CardKind::Assassin)
    }

    #[must_use]
    pub const fn is_castle_marker(self) -> bool {
        matches!(self.kind(), CardKind::CastleMarker)
    }

    #[must_use]
    pub const fn tier(self) -> Option<RoyalTier> {
        match self.kind() {
            CardKind::Royal(tier) => Some(tier),
            _ => None,
        }
    }

    /// True iff both cards are royals and this one's tier is at least the target's.
    ///
    /// ```
    /// use royal_family::cards::{Card, Rank, Suit};
    ///
    /// let king = Card::new(Rank::King, Suit::Spade);
    /// let jack = Card::new(Rank::Jack, Suit::Heart);
    /// assert!(king.can_outrank(jack));
    /// assert!(!jack.can_outrank(king));
    /// assert!(jack.can_outrank(Card::new(Rank::Jack, Suit::Diamond)));
    /// ```
    #[must_use]
    pub fn can_outrank(self, target: Card) -> bool {
        match (self.tier(), target.tier()) {
            (Some(mine), Some(theirs)) => mine >= theirs,
            _ => false,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Card::Standard { rank, suit } => write!(f, "{}{}", rank.label(), suit.symbol()),
            Card::Joker => write!(f, "🃏"),
        }
    }
}
