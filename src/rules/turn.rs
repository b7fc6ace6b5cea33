//! Turn rotation and the pass counter.

use crate::core::{GamePhase, GameState, PlayerId};

use super::round::next_active_after;

/// What ending a turn led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAdvance {
    NextPlayer(PlayerId),
    /// Every active seat passed in a row.
    RoundOver,
}

/// End the current seat's turn.
///
/// A turn without any card played counts as a pass; once every active seat
/// has passed consecutively the round is over.
pub fn advance_to_next_player(state: &mut GameState) -> TurnAdvance {
    let current = state.current_player;
    if let Some(player) = state.players.get_mut(current) {
        player.played_value_this_turn = false;
    }

    if state.played_any_card_this_turn {
        state.consecutive_passes = 0;
    } else {
        state.consecutive_passes += 1;
        let message = format!("{} passed the turn.", state.name(current));
        state.push_log(message);
    }

    let active = state.active_players().count();
    if state.consecutive_passes >= active {
        log::debug!("all {active} active seats passed");
        return TurnAdvance::RoundOver;
    }

    let next = next_active_after(state, current).unwrap_or(current);
    state.current_player = next;
    state.pending = None;
    state.played_any_card_this_turn = false;
    state.phase = GamePhase::Playing;
    let message = format!("--- {}'s turn ---", state.name(next));
    state.push_log(message);
    TurnAdvance::NextPlayer(next)
}
