//! Presentation hooks.
//!
//! The engine never draws, plays sounds or sleeps on its own. Everything
//! the player should see goes through a [`GameHooks`] implementation; every
//! method defaults to doing nothing, so headless games and tests use
//! [`NoopHooks`].

use crate::core::{Announcement, GameState};
use crate::rules::{GameOutcome, RoundReport};

/// Callbacks the driver makes while a game runs.
pub trait GameHooks {
    /// The visible state changed.
    fn render(&mut self, _state: &GameState) {}

    /// A transient banner, e.g. "REVERSUS TOTAL!".
    fn announce(&mut self, _announcement: &Announcement) {}

    /// Pacing between AI sub-actions. Hosts that want a watchable game
    /// sleep or schedule here.
    fn pause(&mut self, _ms: u64) {}

    /// A round was resolved.
    fn round_summary(&mut self, _report: &RoundReport) {}

    /// The game ended. Called once.
    fn outcome(&mut self, _outcome: &GameOutcome) {}
}

/// Hooks that ignore everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl GameHooks for NoopHooks {}
