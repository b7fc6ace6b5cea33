//! Legal targets and target-set expansion.

use crate::board::PathId;
use crate::core::{GameState, PlayerId};
use crate::rules::teams::{cluster, Seats};

use super::effect::{Category, EffectKind, MoveEffect};

/// Seats an effect card may be aimed at: every seat still in play.
#[must_use]
pub fn valid_targets(state: &GameState) -> Vec<PlayerId> {
    state.active_players().collect()
}

/// Seats an effect actually lands on.
///
/// In the one-vs-many battle, aiming at any cluster member from the human
/// seat, or from inside the cluster, spreads the effect over the whole
/// cluster. Pula never spreads.
#[must_use]
pub fn expand_targets(state: &GameState, caster: PlayerId, target: PlayerId, kind: EffectKind) -> Seats {
    if state.mode.is_one_vs_many() && kind != EffectKind::Pula {
        let members = cluster(state);
        let caster_is_human = state.players.get(caster).is_some_and(|p| p.is_human);
        if members.contains(&target) && (caster_is_human || members.contains(&caster)) {
            return members;
        }
    }
    smallvec::smallvec![target]
}

/// Paths a Pula on `target` may send it to: nobody stands there and no
/// other seat's pending Pula has claimed it this round.
#[must_use]
pub fn pula_destinations(state: &GameState, target: PlayerId) -> Vec<PathId> {
    let occupied = state.occupied_paths();
    let claimed: Vec<PathId> = state
        .players
        .values()
        .filter(|p| p.id != target && p.effects.movement == Some(MoveEffect::Pula))
        .filter_map(|p| p.target_path_for_pula)
        .collect();
    state
        .paths
        .iter()
        .map(|p| p.id)
        .filter(|id| !occupied.contains(id) && !claimed.contains(id))
        .collect()
}

/// Categories a reversal can be aimed at on `target`: those with an active
/// effect.
#[must_use]
pub fn reversible_categories(state: &GameState, target: PlayerId) -> Vec<Category> {
    let Some(player) = state.players.get(target) else {
        return Vec::new();
    };
    let mut categories = Vec::with_capacity(2);
    if player.effects.score.is_some() {
        categories.push(Category::Score);
    }
    if player.effects.movement.is_some() {
        categories.push(Category::Movement);
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameMode, StoryBattle};
    use crate::effects::{MoveEffect, ScoreEffect};

    #[test]
    fn test_cluster_expansion() {
        let state = GameState::new(
            GameMode::Story(StoryBattle::NecroversoKing),
            GameConfig::default(),
            1,
        );
        let human = PlayerId::new(0);
        let member = PlayerId::new(2);

        assert_eq!(expand_targets(&state, human, member, EffectKind::Menos).len(), 3);
        assert_eq!(expand_targets(&state, PlayerId::new(1), member, EffectKind::Mais).len(), 3);
        assert_eq!(
            expand_targets(&state, human, member, EffectKind::Pula).as_slice(),
            &[member]
        );
        assert_eq!(
            expand_targets(&state, PlayerId::new(1), human, EffectKind::Menos).as_slice(),
            &[human]
        );
    }

    #[test]
    fn test_no_expansion_outside_one_vs_many() {
        let state = GameState::new(GameMode::Solo { players: 4 }, GameConfig::default(), 1);
        let targets = expand_targets(&state, PlayerId::new(0), PlayerId::new(2), EffectKind::Mais);
        assert_eq!(targets.as_slice(), &[PlayerId::new(2)]);
    }

    #[test]
    fn test_occupied_paths_are_never_destinations() {
        let state = GameState::new(GameMode::Solo { players: 4 }, GameConfig::default(), 1);
        let destinations = pula_destinations(&state, PlayerId::new(1));

        assert_eq!(destinations, vec![PathId(4), PathId(5)]);
        for occupied in state.occupied_paths() {
            assert!(!destinations.contains(&occupied));
        }
    }

    #[test]
    fn test_claimed_paths_are_not_offered_twice() {
        let mut state = GameState::new(GameMode::Solo { players: 4 }, GameConfig::default(), 1);
        let (first, second) = (PlayerId::new(1), PlayerId::new(2));
        state.players[first].effects.movement = Some(MoveEffect::Pula);
        state.players[first].target_path_for_pula = Some(PathId(4));

        assert_eq!(pula_destinations(&state, second), vec![PathId(5)]);
        // The claimant may still be re-aimed at its own destination.
        assert_eq!(pula_destinations(&state, first), vec![PathId(4), PathId(5)]);

        // A claim only counts while the Pula is active.
        state.players[first].effects.movement = None;
        assert_eq!(pula_destinations(&state, second), vec![PathId(4), PathId(5)]);
    }

    #[test]
    fn test_reversible_categories() {
        let mut state = GameState::new(GameMode::Solo { players: 2 }, GameConfig::default(), 1);
        let target = PlayerId::new(1);
        assert!(reversible_categories(&state, target).is_empty());

        state.players[target].effects.movement = Some(MoveEffect::Sobe);
        assert_eq!(reversible_categories(&state, target), vec![Category::Movement]);

        state.players[target].effects.score = Some(ScoreEffect::Menos);
        assert_eq!(reversible_categories(&state, target).len(), 2);
    }
}
