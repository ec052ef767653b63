//! Game engine and state management.

use core::fmt;
use std::sync::{Arc, MutexGuard, Weak};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::card::{Card, generate_deck};
use crate::error::InvariantViolation;
use crate::notify::SnapshotSink;
use crate::options::{GameOptions, MAX_PLAYERS};
use crate::player::{Player, PlayerId};
use crate::snapshot::GameSnapshot;
use crate::sync::Mutex;

mod attack;
mod defense;
mod lobby;
pub mod state;
mod window;

pub use state::{Phase, StartOutcome, TableEntry};

use state::MatchState;
use window::{DefenseTimer, OpenWindow};

/// A single Durak match.
///
/// Every mutation runs inside one lock around the whole match state, works
/// on a copy, and only replaces the state once the copy passes the
/// card-conservation check. After each successful mutation the subscribed
/// [`SnapshotSink`]s receive a fresh [`GameSnapshot`].
///
/// Games are handed out as `Arc<Game>`; the defense-window timer keeps only a
/// weak reference.
pub struct Game {
    id: Uuid,
    join_code: String,
    creator: PlayerId,
    options: GameOptions,
    state: Mutex<MatchState>,
    latest: Mutex<Arc<GameSnapshot>>,
    sinks: Mutex<Vec<Arc<dyn SnapshotSink>>>,
    this: Weak<Self>,
}

impl Game {
    /// Creates a match in the lobby with a freshly shuffled deck.
    ///
    /// # Example
    ///
    /// ```
    /// use durak::{Game, GameOptions, Phase, Player};
    ///
    /// let game = Game::new(Player::new("alice", "Alice"), "12345678", GameOptions::default());
    /// assert_eq!(game.phase(), Phase::Lobby);
    /// assert_eq!(game.deck_count(), 36);
    /// ```
    #[must_use]
    pub fn new(creator: Player, join_code: impl Into<String>, options: GameOptions) -> Arc<Self> {
        let mut rng = options.seed.map_or_else(
            || ChaCha8Rng::from_rng(&mut rand::rng()),
            ChaCha8Rng::seed_from_u64,
        );
        let state = MatchState::new(creator, generate_deck(&mut rng));
        Self::build(join_code.into(), options, state)
    }

    /// Creates a match with a prepared deck in draw order.
    ///
    /// The first card is drawn first and the last card becomes trump.
    ///
    /// # Errors
    ///
    /// Returns an error unless `deck` holds each of the 36 cards exactly once.
    pub fn with_deck(
        creator: Player,
        join_code: impl Into<String>,
        options: GameOptions,
        deck: Vec<Card>,
    ) -> Result<Arc<Self>, InvariantViolation> {
        let state = MatchState::new(creator, deck);
        state.verify()?;
        Ok(Self::build(join_code.into(), options, state))
    }

    fn build(join_code: String, mut options: GameOptions, state: MatchState) -> Arc<Self> {
        options.max_players = options.max_players.clamp(1, MAX_PLAYERS);
        let id = Uuid::new_v4();
        let creator = state.players[0].id().clone();
        let initial = Arc::new(snapshot_of(id, &join_code, &state));

        info!(game_id = %id, join_code = %join_code, creator = %creator, "game created");

        Arc::new_cyclic(|this| Self {
            id,
            join_code,
            creator,
            options,
            state: Mutex::new(state),
            latest: Mutex::new(initial),
            sinks: Mutex::new(Vec::new()),
            this: this.clone(),
        })
    }

    /// Returns the match id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the join code.
    #[must_use]
    pub fn join_code(&self) -> &str {
        &self.join_code
    }

    /// Returns the creator's identity.
    #[must_use]
    pub const fn creator(&self) -> &PlayerId {
        &self.creator
    }

    /// Returns the match options.
    #[must_use]
    pub const fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Subscribes a sink to snapshots of this match.
    pub fn subscribe(&self, sink: Arc<dyn SnapshotSink>) {
        self.sinks.lock().push(sink);
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Returns the number of seated players.
    pub fn player_count(&self) -> usize {
        self.state.lock().players.len()
    }

    /// Returns the turn holder, once the match has started.
    pub fn turn_holder(&self) -> Option<PlayerId> {
        let state = self.state.lock();
        (state.phase != Phase::Lobby).then(|| state.turn_holder().clone())
    }

    /// Returns the trump card, once the match has started.
    pub fn trump(&self) -> Option<Card> {
        self.state.lock().trump
    }

    /// Returns the number of cards left in the draw pile.
    pub fn deck_count(&self) -> usize {
        self.state.lock().deck_len()
    }

    /// Returns a copy of a player's hand.
    ///
    /// Returns `None` if the player is not seated in this match.
    pub fn hand(&self, player: &PlayerId) -> Option<Vec<Card>> {
        let state = self.state.lock();
        state
            .position(player)
            .map(|index| state.players[index].hand())
    }

    /// Returns whether any player's hand is empty.
    ///
    /// Before dealing every hand is empty, so this also holds in the lobby.
    /// The draw pile is not consulted.
    pub fn game_over(&self) -> bool {
        self.state.lock().any_hand_empty()
    }

    /// Returns a snapshot taken under the match lock.
    pub fn get_state(&self) -> GameSnapshot {
        let state = self.state.lock();
        snapshot_of(self.id, &self.join_code, &state)
    }

    /// Returns the most recently published snapshot without taking the
    /// match lock. May trail an in-flight mutation.
    pub fn latest_snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.latest.lock())
    }

    /// Replaces the state with `next` once it passes the conservation check,
    /// then reconciles the defense timer and publishes a snapshot.
    fn commit(
        &self,
        mut state: MutexGuard<'_, MatchState>,
        mut next: MatchState,
        op: &'static str,
    ) -> Result<(), InvariantViolation> {
        let finished = next.finish_if_over();

        if let Err(violation) = next.verify() {
            error!(
                game_id = %self.id,
                join_code = %self.join_code,
                op,
                %violation,
                "transition aborted"
            );
            return Err(violation);
        }

        if finished {
            info!(game_id = %self.id, join_code = %self.join_code, "game finished");
        }

        next.version = state.version + 1;
        let previous = core::mem::replace(&mut *state, next);
        self.sync_window(previous.window, &mut state);

        let snapshot = Arc::new(snapshot_of(self.id, &self.join_code, &state));
        drop(state);
        self.publish(snapshot);

        Ok(())
    }

    /// Cancels a window that the last transition closed and starts the
    /// timer of any open window that has none, including one whose earlier
    /// spawn failed.
    fn sync_window(&self, previous: Option<OpenWindow>, state: &mut MatchState) {
        let current = state.window.as_ref().map(|window| window.epoch);

        if let Some(closed) = previous.filter(|window| Some(window.epoch) != current) {
            closed.cancel();
            debug!(game_id = %self.id, epoch = closed.epoch, "defense window closed");
        }

        let Some(window) = state.window.as_mut().filter(|window| window.timer.is_none()) else {
            return;
        };

        let epoch = window.epoch;
        let game = self.this.clone();
        let spawned = DefenseTimer::spawn(
            format!("defense-{}", self.join_code),
            self.options.defense_window,
            move || {
                if let Some(game) = game.upgrade() {
                    game.expire_window(epoch);
                }
            },
        );

        match spawned {
            Ok(timer) => {
                debug!(game_id = %self.id, epoch, "defense window opened");
                window.timer = Some(timer);
            }
            Err(err) => {
                warn!(
                    game_id = %self.id,
                    epoch,
                    %err,
                    "failed to start defense timer, retrying on next transition"
                );
            }
        }
    }

    fn publish(&self, snapshot: Arc<GameSnapshot>) {
        {
            let mut latest = self.latest.lock();
            if latest.version < snapshot.version {
                *latest = Arc::clone(&snapshot);
            }
        }

        let sinks = self.sinks.lock().clone();
        for sink in sinks {
            sink.publish(&snapshot);
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("join_code", &self.join_code)
            .field("creator", &self.creator)
            .finish_non_exhaustive()
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        if let Some(window) = &self.state.lock().window {
            window.cancel();
        }
    }
}

fn snapshot_of(id: Uuid, join_code: &str, state: &MatchState) -> GameSnapshot {
    GameSnapshot {
        game_id: id,
        join_code: join_code.to_owned(),
        version: state.version,
        phase: state.phase,
        players: state
            .players
            .iter()
            .map(|player| player.name().to_owned())
            .collect(),
        trump: state.trump,
        turn_holder: (state.phase != Phase::Lobby).then(|| state.turn_holder().clone()),
        table: state.table.clone(),
        deck_count: state.deck_len(),
        discard_count: state.discard.len(),
    }
}
