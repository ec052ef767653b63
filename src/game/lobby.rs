use tracing::info;

use crate::error::{JoinError, StartError};
use crate::player::{Player, PlayerId};

use super::{Game, Phase, StartOutcome};

impl Game {
    /// Seats a player in the lobby.
    ///
    /// Returns the roster size after joining.
    ///
    /// # Errors
    ///
    /// Returns an error if the match has started, the roster is full, or the
    /// player is already seated.
    pub fn add_player(&self, player: Player) -> Result<usize, JoinError> {
        let state = self.state.lock();

        if state.phase != Phase::Lobby {
            return Err(JoinError::AlreadyStarted);
        }
        if state.players.len() >= self.options.max_players {
            return Err(JoinError::GameFull {
                capacity: self.options.max_players,
            });
        }
        if state.position(player.id()).is_some() {
            return Err(JoinError::AlreadyJoined {
                player: player.id().clone(),
            });
        }

        let player_id = player.id().clone();
        let mut next = state.clone();
        next.players.push(player);
        let count = next.players.len();

        self.commit(state, next, "add_player")?;

        info!(
            game_id = %self.id,
            join_code = %self.join_code,
            player = %player_id,
            count,
            "player joined"
        );
        Ok(count)
    }

    /// Starts the match: fixes trump, deals hands, and gives the creator
    /// the first turn.
    ///
    /// The bottom card of the deck becomes trump and leaves the deck. Each
    /// player in roster order is then dealt up to the hand size.
    ///
    /// # Errors
    ///
    /// Returns an error if `requester` is not the creator or the match has
    /// already started.
    pub fn start(&self, requester: &PlayerId) -> Result<StartOutcome, StartError> {
        let state = self.state.lock();

        if *requester != self.creator {
            return Err(StartError::NotCreator {
                player: requester.clone(),
            });
        }
        if state.phase != Phase::Lobby {
            return Err(StartError::AlreadyStarted);
        }

        let mut next = state.clone();
        next.phase = Phase::Started;
        next.trump = next.take_bottom();
        for index in 0..next.players.len() {
            next.replenish(index, self.options.hand_size);
        }
        next.turn = 0;

        let outcome = StartOutcome {
            turn_holder: next.turn_holder().clone(),
            trump: next.trump,
        };

        self.commit(state, next, "start")?;

        info!(
            game_id = %self.id,
            join_code = %self.join_code,
            turn_holder = %outcome.turn_holder,
            trump = ?outcome.trump.map(|card| card.to_string()),
            "game started"
        );
        Ok(outcome)
    }
}
