//! Player identity and hand storage.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::CardNotFound;
use crate::sync::Mutex;

/// Stable player identity, as issued by the credential gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates an identity from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A seated player and their hand.
///
/// The hand sits behind its own lock, which serializes direct use of one
/// `Player` value. A clone gets its own copy of the hand and its own lock.
/// Inside a match the match lock is what orders changes, since every
/// transition works on a cloned roster.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Mutex<Vec<Card>>,
}

impl Player {
    /// Creates a player with an empty hand.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Mutex::new(Vec::new()),
        }
    }

    /// Returns the player's identity.
    #[must_use]
    pub const fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Returns the player's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds cards to the hand.
    pub fn receive_cards(&self, cards: impl IntoIterator<Item = Card>) {
        self.hand.lock().extend(cards);
    }

    /// Removes the first copy of `card` from the hand and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CardNotFound`] if the hand does not hold the card.
    pub fn play_card(&self, card: Card) -> Result<Card, CardNotFound> {
        let mut hand = self.hand.lock();
        let position = hand
            .iter()
            .position(|held| *held == card)
            .ok_or(CardNotFound { card })?;
        Ok(hand.remove(position))
    }

    /// Checks that the hand holds every card of `cards`, counting repeats.
    ///
    /// # Errors
    ///
    /// Returns [`CardNotFound`] for the first card the hand cannot cover.
    pub fn check_holds(&self, cards: &[Card]) -> Result<(), CardNotFound> {
        let mut remaining = self.hand.lock().clone();
        for &card in cards {
            let position = remaining
                .iter()
                .position(|held| *held == card)
                .ok_or(CardNotFound { card })?;
            remaining.swap_remove(position);
        }
        Ok(())
    }

    /// Returns a copy of the hand.
    #[must_use]
    pub fn hand(&self) -> Vec<Card> {
        self.hand.lock().clone()
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn hand_len(&self) -> usize {
        self.hand.lock().len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn has_empty_hand(&self) -> bool {
        self.hand.lock().is_empty()
    }
}

impl Clone for Player {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            hand: Mutex::new(self.hand()),
        }
    }
}
