//! Player-facing message log.
//!
//! Newest entry first, capped. Every entry is also mirrored to the `log`
//! facade at info level.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Capped, newest-first message log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<String>,
    capacity: usize,
}

impl GameLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vector::new(),
            capacity,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.entries.push_front(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Most recent message.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Messages, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Whether any retained message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.iter().any(|m| m.contains(needle))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Visual tone of an announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnouncementStyle {
    Effect,
    Reversus,
    ReversusTotal,
    Negative,
    Inversus,
}

/// Fire-and-forget notice for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub style: AnnouncementStyle,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_capped() {
        let mut log = GameLog::new(3);
        for i in 0..5 {
            log.push(format!("message {i}"));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.latest(), Some("message 4"));
        let all: Vec<_> = log.iter().collect();
        assert_eq!(all, vec!["message 4", "message 3", "message 2"]);
        assert!(!log.contains("message 0"));
    }
}
