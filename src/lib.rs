//! # reversus
//!
//! Rules engine for Reversus, a turn-based card-and-board race.
//!
//! Each round every seat is dealt value and effect cards. Value cards set a
//! score, effect cards bend it (Mais, Menos) or bend movement (Sobe, Desce,
//! Pula), and the Reversus cards invert what others played. When everyone
//! passes in a row the round is scored and the board moves.
//!
//! ## Design Principles
//!
//! 1. **One owner**: `GameState` holds everything and is only mutated
//!    through the rules functions and the driver.
//!
//! 2. **Deterministic**: all randomness comes from a seeded, forkable
//!    `GameRng`, so a seed replays a whole game.
//!
//! 3. **Presentation at arm's length**: rendering, banners and pacing go
//!    through `GameHooks`; human decisions are typed requests and responses.
//!
//! ## Modules
//!
//! - `core`: players, configuration, state, plays, RNG, message log
//! - `cards`: cards and the two decks
//! - `board`: paths, spaces and field effects
//! - `effects`: effect kinds, inversion rules and targeting
//! - `rules`: scoring, turns, rounds, field effects, story abilities
//! - `ai`: computer seat policies
//! - `engine`: the game driver and the human choice protocol
//! - `persist`: save files and round snapshots

pub mod ai;
pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod persist;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    AiKind, Announcement, AnnouncementStyle, GameConfig, GameMode, GamePhase, GameRng, GameState,
    Play, Player, PlayerId, PlayerMap, PlayerSetup, StoryBattle,
};

pub use crate::cards::{Card, CardFace, CardId, CardType};

pub use crate::board::{BoardPath, FieldEffectKind, PathId, SpaceColor};

pub use crate::effects::{Category, EffectKind, MoveEffect, ScoreEffect};

pub use crate::rules::{GameOutcome, GameResult, LossReason, RoundReport};

pub use crate::ai::{AiDecision, AiIntent, AiPolicy, HeuristicPolicy};

pub use crate::engine::{
    ChoiceRequest, ChoiceResponse, Game, GameHooks, GameSetup, NoopHooks, Progress, ReversalScope,
};

pub use crate::persist::{RoundSnapshot, SaveFile};

pub use crate::error::{EngineError, EngineResult};
