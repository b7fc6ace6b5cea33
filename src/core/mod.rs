//! Core engine types: players, state, plays, RNG, configuration, log.
//!
//! Everything else in the crate operates on a [`GameState`] built from a
//! [`GameMode`] and a [`GameConfig`].

pub mod action;
pub mod config;
pub mod messages;
pub mod player;
pub mod rng;
pub mod state;

pub use action::Play;
pub use config::{GameConfig, GameMode, PlayerSetup, StoryBattle};
pub use messages::{Announcement, AnnouncementStyle, GameLog};
pub use player::{ActiveEffects, AiKind, PlayedCards, Player, PlayerId, PlayerMap, PlayerStatus};
pub use rng::{GameRng, GameRngState};
pub use state::{AbilityState, CardLocation, GamePhase, GameState};
