//! Immutable views of a match.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;
use crate::game::{Phase, TableEntry};
use crate::player::PlayerId;

/// A consistent picture of one match, as broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Match id.
    pub game_id: Uuid,
    /// Join code of the match.
    pub join_code: String,
    /// Bumped by every successful mutation; later snapshots carry larger values.
    pub version: u64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Display names in roster order.
    pub players: Vec<String>,
    /// The trump card, once the match has started.
    pub trump: Option<Card>,
    /// Player allowed to attack next.
    pub turn_holder: Option<PlayerId>,
    /// Open attack/defense pairs in play order.
    pub table: Vec<TableEntry>,
    /// Cards left in the draw pile.
    pub deck_count: usize,
    /// Cards moved off the table after a beaten attack.
    pub discard_count: usize,
}
