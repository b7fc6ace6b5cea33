//! Side membership per mode.
//!
//! - Duo: seats 1 and 3 against seats 2 and 4.
//! - One-vs-many: the human against the cluster of every other seat.
//! - Final battle: the human and Versatrix against the bosses.
//! - Otherwise every seat is its own side.

use smallvec::SmallVec;

use crate::core::{AiKind, GameState, PlayerId};

/// A set of seats. Never more than four in practice.
pub type Seats = SmallVec<[PlayerId; 4]>;

/// The two fixed duo teams, restricted to seats that exist.
#[must_use]
pub fn duo_teams(state: &GameState) -> [Seats; 2] {
    let pick = |ids: [u8; 2]| -> Seats {
        ids.into_iter()
            .map(PlayerId::new)
            .filter(|&id| state.players.contains(id))
            .collect()
    };
    [pick([0, 2]), pick([1, 3])]
}

/// The one-vs-many cluster: every non-human seat.
#[must_use]
pub fn cluster(state: &GameState) -> Seats {
    state
        .players
        .values()
        .filter(|p| !p.is_human)
        .map(|p| p.id)
        .collect()
}

/// Final battle sides: `(human side, boss side)`.
#[must_use]
pub fn final_sides(state: &GameState) -> (Seats, Seats) {
    state
        .players
        .values()
        .map(|p| p.id)
        .partition(|&id| state.players[id].ai != AiKind::NecroversoFinal || state.players[id].is_human)
}

/// Seats on `player`'s side, including `player`.
#[must_use]
pub fn allies(state: &GameState, player: PlayerId) -> Seats {
    let mode = state.mode;
    if mode.is_duo() {
        let [a, b] = duo_teams(state);
        return if a.contains(&player) { a } else { b };
    }
    if mode.is_one_vs_many() {
        let is_human = state.players.get(player).is_some_and(|p| p.is_human);
        return if is_human {
            smallvec::smallvec![player]
        } else {
            cluster(state)
        };
    }
    if mode.is_final_boss() {
        let (heroes, bosses) = final_sides(state);
        return if bosses.contains(&player) { bosses } else { heroes };
    }
    smallvec::smallvec![player]
}

/// Seats not on `player`'s side.
#[must_use]
pub fn opponents(state: &GameState, player: PlayerId) -> Seats {
    let own = allies(state, player);
    state
        .players
        .player_ids()
        .filter(|id| !own.contains(id))
        .collect()
}

/// The two sides whose summed scores decide a round, or `None` when every
/// seat competes alone.
#[must_use]
pub fn round_sides(state: &GameState) -> Option<(Seats, Seats)> {
    let mode = state.mode;
    if mode.is_duo() {
        let [a, b] = duo_teams(state);
        return Some((a, b));
    }
    if mode.is_one_vs_many() {
        let human: Seats = state.human().into_iter().collect();
        return Some((human, cluster(state)));
    }
    if mode.is_final_boss() {
        return Some(final_sides(state));
    }
    None
}

/// Seats a landed field effect applies to: the duo team, or the seat alone.
#[must_use]
pub fn field_team(state: &GameState, player: PlayerId) -> Seats {
    if state.mode.is_duo() {
        allies(state, player)
    } else {
        smallvec::smallvec![player]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameMode, StoryBattle};

    fn ids(raw: &[u8]) -> Seats {
        raw.iter().copied().map(PlayerId::new).collect()
    }

    #[test]
    fn test_duo_teams() {
        let state = GameState::new(GameMode::Duo, GameConfig::default(), 1);
        assert_eq!(allies(&state, PlayerId::new(2)), ids(&[0, 2]));
        assert_eq!(opponents(&state, PlayerId::new(0)), ids(&[1, 3]));
    }

    #[test]
    fn test_one_vs_many() {
        let state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoKing),
            GameConfig::default(),
            1,
        );
        assert_eq!(allies(&state, PlayerId::new(0)), ids(&[0]));
        assert_eq!(allies(&state, PlayerId::new(3)), ids(&[1, 2, 3]));
        assert_eq!(opponents(&state, PlayerId::new(0)), ids(&[1, 2, 3]));
    }

    #[test]
    fn test_final_battle_sides() {
        let state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoFinal),
            GameConfig::default(),
            1,
        );
        let (heroes, bosses) = final_sides(&state);
        assert_eq!(heroes, ids(&[0, 3]));
        assert_eq!(bosses, ids(&[1, 2]));
        assert_eq!(allies(&state, PlayerId::new(3)), ids(&[0, 3]));
        assert_eq!(round_sides(&state), Some((ids(&[0, 3]), ids(&[1, 2]))));
    }

    #[test]
    fn test_solo_is_every_seat_alone() {
        let state = GameState::new(GameMode::Solo { players: 3 }, GameConfig::default(), 1);
        assert_eq!(allies(&state, PlayerId::new(1)), ids(&[1]));
        assert_eq!(opponents(&state, PlayerId::new(1)), ids(&[0, 2]));
        assert_eq!(field_team(&state, PlayerId::new(1)), ids(&[1]));
        assert_eq!(round_sides(&state), None);
    }
}
