//! Error types for game operations.
//!
//! Every operation has its own closed error enum. [`ErrorKind`] groups the
//! variants into the categories a request boundary maps to client responses.

use thiserror::Error;

use crate::card::Card;
use crate::player::PlayerId;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// The request conflicts with the current match state.
    StateConflict,
    /// Unknown game, player, or card.
    NotFound,
    /// The move breaks the game rules.
    IllegalMove,
    /// A broken internal invariant; the transition was rolled back.
    Internal,
}

/// A card id that does not name a card of the 36-card deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card id `{id}`")]
pub struct ParseCardError {
    /// The rejected id.
    pub id: String,
}

/// The card-conservation check failed after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("card conservation broken: counted {counted} cards, {distinct} distinct")]
pub struct InvariantViolation {
    /// Total number of cards found across all locations.
    pub counted: usize,
    /// Number of distinct cards among them.
    pub distinct: usize,
}

/// A player tried to play a card they do not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("card {card} is not in the player's hand")]
pub struct CardNotFound {
    /// The missing card.
    pub card: Card,
}

/// Errors that can occur when joining a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The match has already started.
    #[error("game already started")]
    AlreadyStarted,
    /// The roster is full.
    #[error("game is full ({capacity} players)")]
    GameFull {
        /// Maximum roster size.
        capacity: usize,
    },
    /// The player is already in the roster.
    #[error("player {player} already joined")]
    AlreadyJoined {
        /// The joining player.
        player: PlayerId,
    },
    /// Seating the player broke card conservation.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl JoinError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyStarted | Self::GameFull { .. } | Self::AlreadyJoined { .. } => {
                ErrorKind::StateConflict
            }
            Self::Invariant(_) => ErrorKind::Internal,
        }
    }
}

/// Errors that can occur when starting a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// Only the creator may start the match.
    #[error("player {player} is not the creator of this game")]
    NotCreator {
        /// The requesting player.
        player: PlayerId,
    },
    /// The match has already started.
    #[error("game already started")]
    AlreadyStarted,
    /// Dealing broke card conservation.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl StartError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotCreator { .. } | Self::AlreadyStarted => ErrorKind::StateConflict,
            Self::Invariant(_) => ErrorKind::Internal,
        }
    }
}

/// Errors that can occur when playing attack cards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    /// A card id could not be parsed.
    #[error(transparent)]
    InvalidCard(#[from] ParseCardError),
    /// No card ids were submitted.
    #[error("no cards submitted")]
    NoCards,
    /// The match has not started yet.
    #[error("game has not started")]
    NotStarted,
    /// The match is over.
    #[error("game is finished")]
    Finished,
    /// An opening move mixed ranks.
    #[error("cards opening an empty table must share one rank")]
    EmptyTableRankMismatch,
    /// The player is not in the roster.
    #[error("player {player} is not in this game")]
    PlayerNotFound {
        /// The unknown player.
        player: PlayerId,
    },
    /// It is not this player's turn.
    #[error("not {player}'s turn, {turn_holder} is to move")]
    TurnViolation {
        /// The acting player.
        player: PlayerId,
        /// The current turn holder.
        turn_holder: PlayerId,
    },
    /// The player does not hold one of the cards.
    #[error("player {player} does not hold {card}")]
    CardNotFound {
        /// The acting player.
        player: PlayerId,
        /// The missing card.
        card: Card,
    },
    /// The move broke card conservation.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl PlayError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCard(_) | Self::NoCards => ErrorKind::Validation,
            Self::NotStarted
            | Self::Finished
            | Self::EmptyTableRankMismatch
            | Self::TurnViolation { .. } => ErrorKind::StateConflict,
            Self::PlayerNotFound { .. } | Self::CardNotFound { .. } => ErrorKind::NotFound,
            Self::Invariant(_) => ErrorKind::Internal,
        }
    }
}

/// Errors that can occur when defending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefendError {
    /// A card id could not be parsed.
    #[error(transparent)]
    InvalidCard(#[from] ParseCardError),
    /// The match has not started yet.
    #[error("game has not started")]
    NotStarted,
    /// The match is over.
    #[error("game is finished")]
    Finished,
    /// The player is not in the roster.
    #[error("player {player} is not in this game")]
    PlayerNotFound {
        /// The unknown player.
        player: PlayerId,
    },
    /// The defender does not hold the defense card.
    #[error("player {player} does not hold {card}")]
    CardNotFound {
        /// The defending player.
        player: PlayerId,
        /// The missing card.
        card: Card,
    },
    /// No open table entry carries this attack card.
    #[error("{card} is not an open attack on the table")]
    AttackNotOnTable {
        /// The named attack card.
        card: Card,
    },
    /// The defense card does not beat the attack card.
    #[error("{defense} does not beat {attack}")]
    IllegalDefense {
        /// The attack card.
        attack: Card,
        /// The rejected defense card.
        defense: Card,
    },
    /// The defense broke card conservation.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl DefendError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCard(_) => ErrorKind::Validation,
            Self::NotStarted | Self::Finished => ErrorKind::StateConflict,
            Self::PlayerNotFound { .. }
            | Self::CardNotFound { .. }
            | Self::AttackNotOnTable { .. } => ErrorKind::NotFound,
            Self::IllegalDefense { .. } => ErrorKind::IllegalMove,
            Self::Invariant(_) => ErrorKind::Internal,
        }
    }
}

/// Errors returned by the credential gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The login/credential pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Errors returned by [`MatchRegistry`](crate::MatchRegistry) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No live match uses this join code.
    #[error("no game with join code {join_code}")]
    NotFound {
        /// The unknown join code.
        join_code: String,
    },
    /// Joining failed.
    #[error(transparent)]
    Join(#[from] JoinError),
    /// Starting failed.
    #[error(transparent)]
    Start(#[from] StartError),
    /// Playing failed.
    #[error(transparent)]
    Play(#[from] PlayError),
    /// Defending failed.
    #[error(transparent)]
    Defend(#[from] DefendError),
}

impl MatchError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Join(err) => err.kind(),
            Self::Start(err) => err.kind(),
            Self::Play(err) => err.kind(),
            Self::Defend(err) => err.kind(),
        }
    }
}
