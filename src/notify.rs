//! Snapshot publication.

use crate::snapshot::GameSnapshot;

/// Receives a fresh snapshot after every successful mutation of a match.
///
/// Publication happens outside the match lock, so sinks may call back into
/// the game. Concurrent mutations can deliver out of order; use
/// [`GameSnapshot::version`] to drop stale ones.
pub trait SnapshotSink: Send + Sync {
    /// Publishes a snapshot to the subscribers of its join code.
    fn publish(&self, snapshot: &GameSnapshot);
}

impl<F> SnapshotSink for F
where
    F: Fn(&GameSnapshot) + Send + Sync,
{
    fn publish(&self, snapshot: &GameSnapshot) {
        self(snapshot);
    }
}
