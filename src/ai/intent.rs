//! What an AI seat wants to do this turn.

use serde::{Deserialize, Serialize};

use crate::core::Play;

/// One queued AI action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiIntent {
    Play(Play),
    /// Rei Reversum's free global inversion.
    UseReversumAbility,
    /// The final boss' NECRO X.
    UseNecroXAbility,
    /// Inversus' total inversion.
    UseInversusAbility,
}

impl AiIntent {
    /// The play carried by this intent, if any.
    #[must_use]
    pub const fn play(&self) -> Option<&Play> {
        match self {
            AiIntent::Play(play) => Some(play),
            _ => None,
        }
    }
}

/// Ordered intents for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    pub intents: Vec<AiIntent>,
}

impl AiDecision {
    #[must_use]
    pub fn new(intents: Vec<AiIntent>) -> Self {
        Self { intents }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Queued card plays, in order.
    pub fn plays(&self) -> impl Iterator<Item = &Play> {
        self.intents.iter().filter_map(AiIntent::play)
    }
}
