//! Game configuration options.

use core::time::Duration;

use crate::card::HAND_SIZE;

/// Largest roster a match accepts.
pub const MAX_PLAYERS: usize = 6;

/// Configuration options for a match.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use std::time::Duration;
///
/// use durak::GameOptions;
///
/// let options = GameOptions::default()
///     .with_max_players(4)
///     .with_defense_window(Duration::from_secs(30))
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Maximum roster size. A match clamps it to `1..=`[`MAX_PLAYERS`].
    pub max_players: usize,
    /// Number of cards a hand is dealt and topped up to.
    pub hand_size: usize,
    /// How long a defender has before open attacks are delivered to them.
    pub defense_window: Duration,
    /// Shuffle seed. `None` draws a fresh seed per match.
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            hand_size: HAND_SIZE,
            defense_window: Duration::from_secs(15),
            seed: None,
        }
    }
}

impl GameOptions {
    /// Sets the maximum roster size, clamped to `1..=6`.
    ///
    /// # Example
    ///
    /// ```
    /// use durak::GameOptions;
    ///
    /// assert_eq!(GameOptions::default().with_max_players(2).max_players, 2);
    /// assert_eq!(GameOptions::default().with_max_players(10).max_players, 6);
    /// ```
    #[must_use]
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players.clamp(1, MAX_PLAYERS);
        self
    }

    /// Sets the hand size.
    #[must_use]
    pub const fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Sets the defense window duration.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use durak::GameOptions;
    ///
    /// let options = GameOptions::default().with_defense_window(Duration::from_millis(50));
    /// assert_eq!(options.defense_window, Duration::from_millis(50));
    /// ```
    #[must_use]
    pub const fn with_defense_window(mut self, window: Duration) -> Self {
        self.defense_window = window;
        self
    }

    /// Sets a fixed shuffle seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
