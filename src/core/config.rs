//! Game configuration: rule constants, modes, and seat rosters.
//!
//! `GameConfig` holds the numbers the rules are written against. The
//! defaults are the standard table rules; the `with_*` builders exist for
//! variants and for tests that want small decks or short boards.

use serde::{Deserialize, Serialize};

use super::player::AiKind;
use crate::board::BoardOptions;
use crate::effects::EffectKind;

/// Rule constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Spaces per path.
    pub board_size: u8,
    /// Position that wins the race (one past the last space).
    pub winning_position: u8,
    pub num_paths: usize,
    pub colored_spaces_per_path: usize,
    pub max_value_cards_in_hand: usize,
    pub max_effect_cards_in_hand: usize,
    pub max_played_value_cards: usize,
    pub log_capacity: usize,
    /// `(face value, copies)`.
    pub value_deck: Vec<(u8, u8)>,
    /// `(effect, copies)`.
    pub effect_deck: Vec<(EffectKind, u8)>,
    pub inversus_hearts: u8,
    pub boss_hearts: u8,
    pub contravox_uses: u8,
    /// Final battle countdown.
    pub final_countdown_secs: u64,
    /// AI pacing. Presentation only.
    pub ai_think_ms: u64,
    pub ai_action_ms: u64,
    pub ai_wrapup_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 9,
            winning_position: 10,
            num_paths: 6,
            colored_spaces_per_path: 2,
            max_value_cards_in_hand: 3,
            max_effect_cards_in_hand: 2,
            max_played_value_cards: 2,
            log_capacity: 50,
            value_deck: vec![(2, 12), (4, 12), (6, 12), (8, 12), (10, 12)],
            effect_deck: vec![
                (EffectKind::Mais, 4),
                (EffectKind::Menos, 4),
                (EffectKind::Sobe, 4),
                (EffectKind::Desce, 4),
                (EffectKind::Pula, 4),
                (EffectKind::Reversus, 4),
                (EffectKind::ReversusTotal, 1),
            ],
            inversus_hearts: 10,
            boss_hearts: 3,
            contravox_uses: 3,
            final_countdown_secs: 20 * 60,
            ai_think_ms: 1000,
            ai_action_ms: 1200,
            ai_wrapup_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Total cards in the value deck.
    #[must_use]
    pub fn value_deck_size(&self) -> usize {
        self.value_deck.iter().map(|&(_, n)| n as usize).sum()
    }

    /// Total cards in the effect deck.
    #[must_use]
    pub fn effect_deck_size(&self) -> usize {
        self.effect_deck.iter().map(|&(_, n)| n as usize).sum()
    }

    /// Replace the value deck composition.
    pub fn with_value_deck(mut self, deck: Vec<(u8, u8)>) -> Self {
        self.value_deck = deck;
        self
    }

    /// Replace the effect deck composition.
    pub fn with_effect_deck(mut self, deck: Vec<(EffectKind, u8)>) -> Self {
        self.effect_deck = deck;
        self
    }

    /// Set the number of paths.
    pub fn with_paths(mut self, paths: usize) -> Self {
        self.num_paths = paths;
        self
    }

    /// Set the hand caps.
    pub fn with_hand_caps(mut self, value: usize, effect: usize) -> Self {
        self.max_value_cards_in_hand = value;
        self.max_effect_cards_in_hand = effect;
        self
    }

    /// Drop all AI pacing delays.
    pub fn without_pacing(mut self) -> Self {
        self.ai_think_ms = 0;
        self.ai_action_ms = 0;
        self.ai_wrapup_ms = 0;
        self
    }
}

/// Story-mode battles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryBattle {
    Tutorial,
    Contravox,
    Versatrix,
    Reversum,
    /// One human against a three-seat cluster.
    NecroversoKing,
    /// Human and Versatrix against two bosses on a hazardous board.
    NecroversoFinal,
}

impl StoryBattle {
    /// Stable identifier used in outcome events.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            StoryBattle::Tutorial => "tutorial_necroverso",
            StoryBattle::Contravox => "contravox",
            StoryBattle::Versatrix => "versatrix",
            StoryBattle::Reversum => "reversum",
            StoryBattle::NecroversoKing => "necroverso_king",
            StoryBattle::NecroversoFinal => "necroverso_final",
        }
    }
}

/// How a game is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Every seat for itself, 2-4 players.
    Solo { players: u8 },
    /// Two fixed teams of two.
    Duo,
    /// Heart-based duel against a mirror.
    Inversus,
    Story(StoryBattle),
}

impl GameMode {
    #[must_use]
    pub const fn story_battle(self) -> Option<StoryBattle> {
        match self {
            GameMode::Story(battle) => Some(battle),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_story(self) -> bool {
        matches!(self, GameMode::Story(_))
    }

    #[must_use]
    pub const fn is_final_boss(self) -> bool {
        matches!(self, GameMode::Story(StoryBattle::NecroversoFinal))
    }

    #[must_use]
    pub const fn is_one_vs_many(self) -> bool {
        matches!(self, GameMode::Story(StoryBattle::NecroversoKing))
    }

    #[must_use]
    pub const fn is_heart_mode(self) -> bool {
        matches!(self, GameMode::Inversus)
    }

    #[must_use]
    pub const fn is_duo(self) -> bool {
        matches!(self, GameMode::Duo)
    }

    /// Modes where rounds are won by sides rather than seats.
    #[must_use]
    pub const fn is_team_mode(self) -> bool {
        self.is_duo() || self.is_final_boss() || self.is_one_vs_many()
    }

    /// Heart mode plays without a board.
    #[must_use]
    pub const fn has_board(self) -> bool {
        !self.is_heart_mode()
    }

    /// Whether the first round opens with the draw-to-start.
    #[must_use]
    pub const fn has_initial_draw(self) -> bool {
        !self.is_heart_mode() && !self.is_final_boss()
    }

    /// Board features for this mode.
    #[must_use]
    pub fn board_options(self) -> BoardOptions {
        BoardOptions {
            final_boss: self.is_final_boss(),
            yellow_spaces: matches!(
                self,
                GameMode::Story(StoryBattle::Versatrix | StoryBattle::NecroversoFinal)
            ),
            only_negative: matches!(self, GameMode::Story(StoryBattle::Reversum)),
        }
    }

    /// Default seats for this mode. Seat 0 is always the human.
    #[must_use]
    pub fn default_roster(self) -> Vec<PlayerSetup> {
        let you = PlayerSetup::human("You");
        match self {
            GameMode::Solo { players } => std::iter::once(you)
                .chain((2..=players.clamp(2, 4)).map(|n| PlayerSetup::ai(format!("Player {n}"), AiKind::Default)))
                .collect(),
            GameMode::Duo => std::iter::once(you)
                .chain((2..=4).map(|n| PlayerSetup::ai(format!("Player {n}"), AiKind::Default)))
                .collect(),
            GameMode::Inversus => vec![you, PlayerSetup::ai("Inversus", AiKind::Inversus)],
            GameMode::Story(StoryBattle::Tutorial) => {
                vec![you, PlayerSetup::ai("Necroverso", AiKind::Tutorial)]
            }
            GameMode::Story(StoryBattle::Contravox) => {
                vec![you, PlayerSetup::ai("Contravox", AiKind::Contravox)]
            }
            GameMode::Story(StoryBattle::Versatrix) => {
                vec![you, PlayerSetup::ai("Versatrix", AiKind::Versatrix)]
            }
            GameMode::Story(StoryBattle::Reversum) => {
                vec![you, PlayerSetup::ai("Rei Reversum", AiKind::Reversum)]
            }
            GameMode::Story(StoryBattle::NecroversoKing) => std::iter::once(you)
                .chain((1..=3).map(|n| PlayerSetup::ai(format!("Rei Necroverso {n}"), AiKind::NecroversoKing)))
                .collect(),
            GameMode::Story(StoryBattle::NecroversoFinal) => vec![
                you,
                PlayerSetup::ai("Necroverso Final", AiKind::NecroversoFinal),
                PlayerSetup::ai("Necroverso Final II", AiKind::NecroversoFinal),
                PlayerSetup::ai("Versatrix", AiKind::Versatrix),
            ],
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Solo { players } => write!(f, "Solo ({players}p)"),
            GameMode::Duo => f.write_str("Duo"),
            GameMode::Inversus => f.write_str("Inversus"),
            GameMode::Story(battle) => write!(f, "Story: {}", battle.id()),
        }
    }
}

/// One seat in a roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub is_human: bool,
    pub ai: AiKind,
}

impl PlayerSetup {
    #[must_use]
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_human: true,
            ai: AiKind::Default,
        }
    }

    #[must_use]
    pub fn ai(name: impl Into<String>, ai: AiKind) -> Self {
        Self {
            name: name.into(),
            is_human: false,
            ai,
        }
    }
}
