//! How a game ends.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, StoryBattle};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (team games, shared victory).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Build from a winner list of any length.
    #[must_use]
    pub fn from_winners(mut winners: Vec<PlayerId>) -> Self {
        match winners.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(winners[0]),
            _ => {
                winners.sort();
                winners.dedup();
                GameResult::Winners(winners)
            }
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Why a story battle was lost outside the normal race.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    Collision,
    BlackHole,
    Time,
}

impl LossReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LossReason::Collision => "collision",
            LossReason::BlackHole => "black_hole",
            LossReason::Time => "time",
        }
    }
}

/// Terminal event of a story battle, consumed by narrative progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub battle: StoryBattle,
    pub won: bool,
    pub reason: Option<LossReason>,
}

impl OutcomeEvent {
    #[must_use]
    pub const fn battle_id(&self) -> &'static str {
        self.battle.id()
    }
}

/// Final outcome recorded on the state when the game ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    pub message: String,
    /// Set for story battles.
    pub story: Option<OutcomeEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let team = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
        assert!(team.is_winner(PlayerId::new(2)));
    }

    #[test]
    fn test_from_winners() {
        assert_eq!(GameResult::from_winners(vec![]), GameResult::Draw);
        assert_eq!(
            GameResult::from_winners(vec![PlayerId::new(3)]),
            GameResult::Winner(PlayerId::new(3))
        );
        assert_eq!(
            GameResult::from_winners(vec![PlayerId::new(2), PlayerId::new(0)]),
            GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)])
        );
    }

    #[test]
    fn test_outcome_event_ids() {
        let event = OutcomeEvent {
            battle: StoryBattle::NecroversoFinal,
            won: false,
            reason: Some(LossReason::BlackHole),
        };
        assert_eq!(event.battle_id(), "necroverso_final");
        assert_eq!(event.reason.map(LossReason::as_str), Some("black_hole"));
    }
}
