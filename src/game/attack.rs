use tracing::debug;

use crate::card::Card;
use crate::error::{CardNotFound, ParseCardError, PlayError};
use crate::player::PlayerId;

use super::{Game, Phase, TableEntry};

fn parse_cards<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Card>, ParseCardError> {
    ids.iter().map(|id| id.as_ref().parse()).collect()
}

impl Game {
    /// Attacks with one or more cards.
    ///
    /// On an empty table every card must share one rank. The cards move to
    /// the table in submission order, the turn passes to the next player in
    /// the roster, and the attacker draws back up to the hand size. Opening
    /// an empty table starts the defense window for that next player.
    ///
    /// Returns the new turn holder.
    ///
    /// # Errors
    ///
    /// Returns an error if a card id is malformed or missing from the hand,
    /// the match is not under way, an opening attack mixes ranks, or it is
    /// not the player's turn. Nothing changes on error.
    pub fn play_cards<S: AsRef<str>>(
        &self,
        player: &PlayerId,
        card_ids: &[S],
    ) -> Result<PlayerId, PlayError> {
        let cards = parse_cards(card_ids)?;
        let Some(&first) = cards.first() else {
            return Err(PlayError::NoCards);
        };

        let state = self.state.lock();

        match state.phase {
            Phase::Lobby => return Err(PlayError::NotStarted),
            Phase::Finished => return Err(PlayError::Finished),
            Phase::Started => {}
        }

        let opening = state.table.is_empty();
        if opening && cards.iter().any(|card| card.rank != first.rank) {
            return Err(PlayError::EmptyTableRankMismatch);
        }

        let index = state
            .position(player)
            .ok_or_else(|| PlayError::PlayerNotFound {
                player: player.clone(),
            })?;
        if index != state.turn {
            return Err(PlayError::TurnViolation {
                player: player.clone(),
                turn_holder: state.turn_holder().clone(),
            });
        }

        let not_held = |missing: CardNotFound| PlayError::CardNotFound {
            player: player.clone(),
            card: missing.card,
        };
        state.players[index].check_holds(&cards).map_err(not_held)?;

        let mut next = state.clone();
        for &card in &cards {
            next.players[index].play_card(card).map_err(not_held)?;
            next.table.push(TableEntry::open(card));
        }

        next.turn = next.next_after(index);
        if opening {
            next.open_window(next.turn);
        }
        let drawn = next.replenish(index, self.options.hand_size);
        let turn_holder = next.turn_holder().clone();

        self.commit(state, next, "play_cards")?;

        debug!(
            game_id = %self.id,
            player = %player,
            cards = ?cards.iter().map(ToString::to_string).collect::<Vec<_>>(),
            drawn,
            next_turn = %turn_holder,
            "cards played"
        );
        Ok(turn_holder)
    }
}
