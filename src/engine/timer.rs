//! The advisory game clock.
//!
//! Every game shows elapsed time. The final battle instead counts down
//! and loses the game when it reaches zero; the driver checks expiry at
//! each step and when the host calls [`Game::tick`](super::Game::tick).

use std::time::{Duration, Instant};

/// Wall-clock timer with a carried-over offset for loaded games.
#[derive(Clone, Debug)]
pub struct GameTimer {
    started: Instant,
    carried: Duration,
    countdown: Option<Duration>,
}

impl GameTimer {
    #[must_use]
    pub fn new(countdown_secs: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            carried: Duration::ZERO,
            countdown: countdown_secs.map(Duration::from_secs),
        }
    }

    /// Continue from `elapsed_secs` already played.
    #[must_use]
    pub fn with_elapsed(mut self, elapsed_secs: u64) -> Self {
        self.carried = Duration::from_secs(elapsed_secs);
        self.started = Instant::now();
        self
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        (self.carried + self.started.elapsed()).as_secs()
    }

    /// Seconds left on the countdown. `None` when counting up.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u64> {
        self.countdown
            .map(|limit| limit.as_secs().saturating_sub(self.elapsed_secs()))
    }

    #[must_use]
    pub fn is_countdown(&self) -> bool {
        self.countdown.is_some()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs() == Some(0)
    }

    /// `MM:SS` of the remaining time in countdown mode, else of the
    /// elapsed time.
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs().unwrap_or_else(|| self.elapsed_secs()))
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped at an hour.
#[must_use]
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
