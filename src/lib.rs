//! A server-side engine for Durak-style trick-taking matches.
//!
//! The crate provides a [`Game`] type that owns one match: the 36-card deck,
//! the roster, the trump, the turn pointer, and the table of attack/defense
//! pairs. A [`MatchRegistry`] keeps live matches by join code and exposes the
//! operations a transport layer calls.
//!
//! # Example
//!
//! ```no_run
//! use durak::{GameOptions, Identity, MatchRegistry};
//!
//! let registry = MatchRegistry::new(GameOptions::default());
//! let alice = Identity::new("alice", "Alice");
//! let bob = Identity::new("bob", "Bob");
//!
//! let (_, code) = registry.create_game(&alice);
//! registry.join_game(&code, &bob).unwrap();
//! let started = registry.start_game(&code, &alice.id).unwrap();
//! assert_eq!(started.turn_holder, alice.id);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod card;
pub mod error;
pub mod game;
pub mod notify;
pub mod options;
pub mod player;
pub mod registry;
pub mod snapshot;
mod sync;

// Re-export main types
pub use auth::{Authenticator, Identity};
pub use card::{Card, DECK_SIZE, HAND_SIZE, Rank, Suit, generate_deck, rank_value};
pub use error::{
    AuthError, CardNotFound, DefendError, ErrorKind, InvariantViolation, JoinError, MatchError,
    ParseCardError, PlayError, StartError,
};
pub use game::{Game, Phase, StartOutcome, TableEntry};
pub use notify::SnapshotSink;
pub use options::{GameOptions, MAX_PLAYERS};
pub use player::{Player, PlayerId};
pub use registry::MatchRegistry;
pub use snapshot::GameSnapshot;
