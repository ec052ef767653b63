//! Join-code keyed registry of live matches.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::MatchError;
use crate::game::{Game, Phase, StartOutcome};
use crate::notify::SnapshotSink;
use crate::options::GameOptions;
use crate::player::{Player, PlayerId};
use crate::snapshot::GameSnapshot;
use crate::sync::Mutex;

/// Number of decimal digits in a join code.
pub const JOIN_CODE_LEN: usize = 8;

const JOIN_CODE_SPACE: u32 = 100_000_000;

/// Live matches keyed by join code.
///
/// The registry owns its own concurrency: lookups clone the `Arc<Game>` out
/// of the map, so no map shard stays locked while a game operation runs.
/// Join codes are unique among the matches currently held.
pub struct MatchRegistry {
    games: DashMap<String, Arc<Game>>,
    options: GameOptions,
    rng: Mutex<ChaCha8Rng>,
    sink: Option<Arc<dyn SnapshotSink>>,
}

impl MatchRegistry {
    /// Creates an empty registry whose matches use `options`.
    ///
    /// With a seed set, join codes and per-match deck seeds are derived
    /// from it.
    #[must_use]
    pub fn new(options: GameOptions) -> Self {
        let rng = options.seed.map_or_else(
            || ChaCha8Rng::from_rng(&mut rand::rng()),
            ChaCha8Rng::seed_from_u64,
        );

        Self {
            games: DashMap::new(),
            options,
            rng: Mutex::new(rng),
            sink: None,
        }
    }

    /// Subscribes `sink` to every match created from now on.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Creates a match owned by `creator` and returns its id and join code.
    pub fn create_game(&self, creator: &Identity) -> (Uuid, String) {
        loop {
            let (code, options) = self.next_code_and_options();

            let Entry::Vacant(slot) = self.games.entry(code) else {
                continue;
            };

            let join_code = slot.key().clone();
            let game = Game::new(
                Player::new(creator.id.clone(), creator.name.clone()),
                join_code.clone(),
                options,
            );
            if let Some(sink) = &self.sink {
                game.subscribe(Arc::clone(sink));
            }

            let id = game.id();
            slot.insert(game);
            return (id, join_code);
        }
    }

    /// Inserts an externally built match.
    ///
    /// # Errors
    ///
    /// Hands the game back if its join code is already taken.
    pub fn insert(&self, game: Arc<Game>) -> Result<(), Arc<Game>> {
        match self.games.entry(game.join_code().to_owned()) {
            Entry::Occupied(_) => Err(game),
            Entry::Vacant(slot) => {
                if let Some(sink) = &self.sink {
                    game.subscribe(Arc::clone(sink));
                }
                slot.insert(game);
                Ok(())
            }
        }
    }

    /// Returns the match using `join_code`.
    pub fn get(&self, join_code: &str) -> Option<Arc<Game>> {
        self.games
            .get(join_code)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Removes a match, freeing its join code.
    pub fn remove(&self, join_code: &str) -> Option<Arc<Game>> {
        let removed = self.games.remove(join_code).map(|(_, game)| game);
        if let Some(game) = &removed {
            info!(game_id = %game.id(), join_code, "game removed");
        }
        removed
    }

    /// Removes every finished match. Returns how many were removed.
    pub fn remove_finished(&self) -> usize {
        let before = self.games.len();
        self.games
            .retain(|_, game| game.phase() != Phase::Finished);
        before.saturating_sub(self.games.len())
    }

    /// Returns the number of live matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns whether the registry holds no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Seats `player` in the match and returns the new roster size.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist or refuses the player.
    pub fn join_game(&self, join_code: &str, player: &Identity) -> Result<usize, MatchError> {
        let game = self.lookup(join_code)?;
        let count = game.add_player(Player::new(player.id.clone(), player.name.clone()))?;
        Ok(count)
    }

    /// Starts the match on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist, `requester` is not its
    /// creator, or it has already started.
    pub fn start_game(
        &self,
        join_code: &str,
        requester: &PlayerId,
    ) -> Result<StartOutcome, MatchError> {
        Ok(self.lookup(join_code)?.start(requester)?)
    }

    /// Attacks with `card_ids` and returns the next turn holder.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist or the attack is refused.
    pub fn play_cards<S: AsRef<str>>(
        &self,
        join_code: &str,
        player: &PlayerId,
        card_ids: &[S],
    ) -> Result<PlayerId, MatchError> {
        Ok(self.lookup(join_code)?.play_cards(player, card_ids)?)
    }

    /// Beats `attack_id` with `defense_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist or the defense is refused.
    pub fn defend(
        &self,
        join_code: &str,
        player: &PlayerId,
        attack_id: &str,
        defense_id: &str,
    ) -> Result<(), MatchError> {
        Ok(self
            .lookup(join_code)?
            .defend(attack_id, defense_id, player)?)
    }

    /// Returns a torn-free snapshot of the match.
    ///
    /// # Errors
    ///
    /// Returns an error if the match does not exist.
    pub fn get_state(&self, join_code: &str) -> Result<GameSnapshot, MatchError> {
        Ok(self.lookup(join_code)?.get_state())
    }

    fn lookup(&self, join_code: &str) -> Result<Arc<Game>, MatchError> {
        self.get(join_code).ok_or_else(|| MatchError::NotFound {
            join_code: join_code.to_owned(),
        })
    }

    fn next_code_and_options(&self) -> (String, GameOptions) {
        let mut rng = self.rng.lock();
        let code = format!(
            "{:0width$}",
            rng.random_range(0..JOIN_CODE_SPACE),
            width = JOIN_CODE_LEN
        );
        let options = match self.options.seed {
            Some(_) => self.options.clone().with_seed(rng.random()),
            None => self.options.clone(),
        };
        (code, options)
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(GameOptions::default())
    }
}
