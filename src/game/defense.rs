use tracing::{debug, warn};

use crate::card::Card;
use crate::error::{CardNotFound, DefendError};
use crate::player::PlayerId;

use super::{Game, Phase};

impl Game {
    /// Beats an open attack card with a card from the defender's hand.
    ///
    /// The defense wins with a higher card of the attack's suit, or with a
    /// trump against a non-trump attack. It is placed on the first open
    /// table entry carrying `attack_id`. Once every entry is beaten the table
    /// moves to the discard pile and the defense window closes.
    ///
    /// # Errors
    ///
    /// Returns an error if a card id is malformed, the match is not under
    /// way, the defense does not beat the attack, the player is not seated
    /// or lacks the defense card, or the attack is not open on the table.
    /// Nothing changes on error.
    pub fn defend(
        &self,
        attack_id: &str,
        defense_id: &str,
        player: &PlayerId,
    ) -> Result<(), DefendError> {
        let attack: Card = attack_id.parse()?;
        let defense: Card = defense_id.parse()?;

        let state = self.state.lock();

        match state.phase {
            Phase::Lobby => return Err(DefendError::NotStarted),
            Phase::Finished => return Err(DefendError::Finished),
            Phase::Started => {}
        }

        if !defense.beats(attack, state.trump.map(|trump| trump.suit)) {
            return Err(DefendError::IllegalDefense { attack, defense });
        }

        let index = state
            .position(player)
            .ok_or_else(|| DefendError::PlayerNotFound {
                player: player.clone(),
            })?;

        let not_held = |_: CardNotFound| DefendError::CardNotFound {
            player: player.clone(),
            card: defense,
        };
        state.players[index]
            .check_holds(&[defense])
            .map_err(not_held)?;

        let slot = state
            .table
            .iter()
            .position(|entry| !entry.is_defended() && entry.attack == attack)
            .ok_or(DefendError::AttackNotOnTable { card: attack })?;

        let mut next = state.clone();
        next.players[index].play_card(defense).map_err(not_held)?;
        next.table[slot].defense = Some(defense);

        let cleared = next.table.iter().all(|entry| entry.is_defended());
        if cleared {
            next.clear_table();
        }

        self.commit(state, next, "defend")?;

        debug!(
            game_id = %self.id,
            player = %player,
            attack = %attack,
            defense = %defense,
            cleared,
            "attack beaten"
        );
        Ok(())
    }

    /// Resolves an elapsed defense window: open attacks go to the defender,
    /// beaten pairs go to the discard pile, and the table clears. The turn
    /// does not move.
    ///
    /// Does nothing unless window `epoch` is still the open one.
    pub(super) fn expire_window(&self, epoch: u64) {
        let state = self.state.lock();

        let Some(defender) = state
            .window
            .as_ref()
            .filter(|window| window.epoch == epoch)
            .map(|window| window.defender)
        else {
            debug!(game_id = %self.id, epoch, "stale defense window ignored");
            return;
        };

        let mut next = state.clone();
        let mut picked_up = Vec::new();
        for entry in next.table.drain(..) {
            match entry.defense {
                Some(defense) => next.discard.extend([entry.attack, defense]),
                None => picked_up.push(entry.attack),
            }
        }
        next.window = None;

        let count = picked_up.len();
        next.players[defender].receive_cards(picked_up);
        let defender_id = next.players[defender].id().clone();

        if self.commit(state, next, "expire_window").is_ok() {
            warn!(
                game_id = %self.id,
                join_code = %self.join_code,
                defender = %defender_id,
                count,
                "defense window elapsed, defender picked up"
            );
        }
    }
}
