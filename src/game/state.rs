//! Match state types.

use serde::{Deserialize, Serialize};

use crate::card::{Card, DECK_SIZE};
use crate::error::InvariantViolation;
use crate::player::{Player, PlayerId};

use super::window::OpenWindow;

/// Match lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Waiting for players to join.
    Lobby,
    /// Hands are dealt and play is under way.
    Started,
    /// Some player ran out of cards. Terminal.
    Finished,
}

/// One attack card on the table and the card that beat it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// The attack card.
    pub attack: Card,
    /// The defense card, once played.
    pub defense: Option<Card>,
}

impl TableEntry {
    /// Creates an undefended entry.
    #[must_use]
    pub const fn open(attack: Card) -> Self {
        Self {
            attack,
            defense: None,
        }
    }

    /// Returns whether the attack has been beaten.
    #[must_use]
    pub const fn is_defended(&self) -> bool {
        self.defense.is_some()
    }
}

/// Result of a successful start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    /// The player who attacks first.
    pub turn_holder: PlayerId,
    /// The trump card.
    pub trump: Option<Card>,
}

/// Everything a match mutates, guarded as one unit by the game lock.
#[derive(Debug, Clone)]
pub(crate) struct MatchState {
    pub(crate) players: Vec<Player>,
    /// Draw pile with the top card last.
    deck: Vec<Card>,
    pub(crate) trump: Option<Card>,
    /// Roster index of the turn holder. The creator sits at index 0.
    pub(crate) turn: usize,
    pub(crate) table: Vec<TableEntry>,
    pub(crate) discard: Vec<Card>,
    pub(crate) phase: Phase,
    pub(crate) window: Option<OpenWindow>,
    next_epoch: u64,
    pub(crate) version: u64,
}

impl MatchState {
    /// Creates a lobby around `creator`. `deck` is in draw order.
    pub(crate) fn new(creator: Player, mut deck: Vec<Card>) -> Self {
        deck.reverse();
        Self {
            players: vec![creator],
            deck,
            trump: None,
            turn: 0,
            table: Vec::new(),
            discard: Vec::new(),
            phase: Phase::Lobby,
            window: None,
            next_epoch: 0,
            version: 0,
        }
    }

    pub(crate) fn position(&self, player: &PlayerId) -> Option<usize> {
        self.players.iter().position(|seated| seated.id() == player)
    }

    pub(crate) fn turn_holder(&self) -> &PlayerId {
        self.players[self.turn].id()
    }

    pub(crate) fn next_after(&self, index: usize) -> usize {
        (index + 1) % self.players.len()
    }

    pub(crate) fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Removes the bottom card of the draw pile.
    pub(crate) fn take_bottom(&mut self) -> Option<Card> {
        if self.deck.is_empty() {
            None
        } else {
            Some(self.deck.remove(0))
        }
    }

    /// Draws for the player at `index` until their hand holds `hand_size`
    /// cards or the deck runs out. Returns the number of cards drawn.
    pub(crate) fn replenish(&mut self, index: usize, hand_size: usize) -> usize {
        let needed = hand_size.saturating_sub(self.players[index].hand_len());
        let take = needed.min(self.deck.len());
        let drawn = self.deck.split_off(self.deck.len() - take);
        self.players[index].receive_cards(drawn.into_iter().rev());
        take
    }

    pub(crate) fn open_window(&mut self, defender: usize) {
        self.window = Some(OpenWindow::new(self.next_epoch, defender));
        self.next_epoch += 1;
    }

    /// Moves every table card to the discard pile and closes the window.
    pub(crate) fn clear_table(&mut self) {
        for entry in self.table.drain(..) {
            self.discard.push(entry.attack);
            self.discard.extend(entry.defense);
        }
        self.window = None;
    }

    pub(crate) fn any_hand_empty(&self) -> bool {
        self.players.iter().any(Player::has_empty_hand)
    }

    /// Moves a started match to `Finished` once a hand is empty.
    /// Returns `true` on that transition.
    pub(crate) fn finish_if_over(&mut self) -> bool {
        if self.phase == Phase::Started && self.any_hand_empty() {
            self.phase = Phase::Finished;
            self.window = None;
            return true;
        }
        false
    }

    /// Checks that every card of the deck sits in exactly one place.
    pub(crate) fn verify(&self) -> Result<(), InvariantViolation> {
        let mut seen = [false; DECK_SIZE];
        let mut counted = 0;
        let mut distinct = 0;

        let hands = self.players.iter().flat_map(Player::hand);
        let table = self
            .table
            .iter()
            .flat_map(|entry| core::iter::once(entry.attack).chain(entry.defense));

        for card in self
            .deck
            .iter()
            .copied()
            .chain(hands)
            .chain(table)
            .chain(self.discard.iter().copied())
            .chain(self.trump)
        {
            counted += 1;
            if !core::mem::replace(&mut seen[card.index()], true) {
                distinct += 1;
            }
        }

        if counted == DECK_SIZE && distinct == DECK_SIZE {
            Ok(())
        } else {
            Err(InvariantViolation { counted, distinct })
        }
    }
}
