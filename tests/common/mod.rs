//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use durak::{Card, GameOptions, Game, Player, PlayerId, Rank, Suit};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a test subscriber. Level comes from `TEST_LOG`, then `RUST_LOG`,
/// then defaults to `warn`.
pub fn init_logging() {
    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(|_| EnvFilter::new("warn"), EnvFilter::new);

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

pub fn card(id: &str) -> Card {
    id.parse().unwrap()
}

pub fn cards(ids: &[&str]) -> Vec<Card> {
    ids.iter().map(|id| card(id)).collect()
}

/// Builds a full deck in draw order: `draws` first, then every other card
/// in generation order, and `trump` at the bottom.
pub fn stacked_deck(draws: &[&str], trump: &str) -> Vec<Card> {
    let mut deck = cards(draws);
    let trump = card(trump);

    for suit in Suit::ALL {
        for rank in Rank::ALL {
            let candidate = Card::new(rank, suit);
            if candidate != trump && !deck.contains(&candidate) {
                deck.push(candidate);
            }
        }
    }

    deck.push(trump);
    deck
}

pub fn alice() -> PlayerId {
    PlayerId::new("alice")
}

pub fn bob() -> PlayerId {
    PlayerId::new("bob")
}

pub fn carol() -> PlayerId {
    PlayerId::new("carol")
}

/// A started two-player match. Alice is dealt `alice_hand`, Bob `bob_hand`.
pub fn two_player_game(
    alice_hand: &[&str],
    bob_hand: &[&str],
    trump: &str,
    options: GameOptions,
) -> Arc<Game> {
    let draws: Vec<&str> = alice_hand.iter().chain(bob_hand).copied().collect();
    let game = Game::with_deck(
        Player::new(alice(), "Alice"),
        "00000001",
        options,
        stacked_deck(&draws, trump),
    )
    .unwrap();
    game.add_player(Player::new(bob(), "Bob")).unwrap();
    game.start(&alice()).unwrap();
    game
}

/// Counts every card the match holds, wherever it is.
pub fn card_total(game: &Game, players: &[PlayerId]) -> usize {
    let snapshot = game.get_state();
    let hands: usize = players
        .iter()
        .map(|player| game.hand(player).unwrap().len())
        .sum();
    let table: usize = snapshot
        .table
        .iter()
        .map(|entry| 1 + usize::from(entry.defense.is_some()))
        .sum();

    snapshot.deck_count
        + hands
        + table
        + snapshot.discard_count
        + usize::from(snapshot.trump.is_some())
}

/// Polls `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
