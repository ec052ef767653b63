//! Card types and deck utilities.

use core::fmt;
use core::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseCardError;

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Spades.
    Spades,
    /// Clubs.
    Clubs,
}

impl Suit {
    /// All suits, in deck generation order.
    pub const ALL: [Self; 4] = [Self::Hearts, Self::Diamonds, Self::Spades, Self::Clubs];

    /// One-letter suit code used in card ids.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Hearts => 'H',
            Self::Diamonds => 'D',
            Self::Spades => 'S',
            Self::Clubs => 'C',
        }
    }

    const fn from_code(code: char) -> Option<Self> {
        match code {
            'H' => Some(Self::Hearts),
            'D' => Some(Self::Diamonds),
            'S' => Some(Self::Spades),
            'C' => Some(Self::Clubs),
            _ => None,
        }
    }
}

/// Card rank, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// 6.
    Six,
    /// 7.
    Seven,
    /// 8.
    Eight,
    /// 9.
    Nine,
    /// 10.
    Ten,
    /// Jack.
    Jack,
    /// Queen.
    Queen,
    /// King.
    King,
    /// Ace.
    Ace,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Self; 9] = [
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Rank label used in card ids.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rank| rank.label() == label)
    }
}

/// A playing card from the 36-card deck.
///
/// Cards print and parse as their id: the rank label followed by the suit
/// code, e.g. `"10H"` or `"AS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    /// The rank of the card.
    pub rank: Rank,
    /// The suit of the card.
    pub suit: Suit,
}

impl Card {
    /// Creates a new card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Returns whether this card belongs to the trump suit.
    #[must_use]
    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump
    }

    /// Returns whether `self`, played as a defense, beats `attack`.
    ///
    /// A defense wins with a higher card of the attack's suit, or with any
    /// trump against a non-trump attack. Without a trump suit only the first
    /// rule applies.
    #[must_use]
    pub fn beats(self, attack: Self, trump: Option<Suit>) -> bool {
        if self.suit == attack.suit && rank_value(self) > rank_value(attack) {
            return true;
        }
        trump.is_some_and(|trump| self.is_trump(trump) && !attack.is_trump(trump))
    }

    /// Position of the card in a freshly generated, unshuffled deck.
    pub(crate) const fn index(self) -> usize {
        self.suit as usize * Rank::ALL.len() + self.rank as usize
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.code())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCardError {
            id: id.to_owned(),
        };

        let mut chars = id.chars();
        let code = chars.next_back().ok_or_else(invalid)?;
        let suit = Suit::from_code(code).ok_or_else(invalid)?;
        let rank = Rank::from_label(chars.as_str()).ok_or_else(invalid)?;

        Ok(Self::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of cards in a deck.
pub const DECK_SIZE: usize = 36;

/// Number of cards a hand is dealt and topped up to.
pub const HAND_SIZE: usize = 6;

/// Ordinal of a card's rank in `6 7 8 9 10 J Q K A`.
#[must_use]
pub const fn rank_value(card: Card) -> u8 {
    card.rank as u8
}

/// Returns all 36 cards in a uniformly random order.
///
/// The returned deck is in draw order: cards are drawn from the front and
/// the last card is the bottom of the deck.
pub fn generate_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }

    deck.shuffle(rng);
    deck
}
