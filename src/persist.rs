//! Save files and round snapshots.
//!
//! A save is a bincode-encoded [`SaveFile`]: a magic number, a format
//! version, the elapsed clock and the whole [`GameState`]. Decoding checks
//! all three headers and runs [`GameState::validate`] before handing the
//! state out, so a caller that only swaps its state in on `Ok` never sees a
//! partial load.
//!
//! [`RoundSnapshot`] is the in-memory copy taken at round start for
//! rollback. The state's log and set-like fields are `im` structures, so
//! the clone shares most of its memory with the live state.

use serde::{Deserialize, Serialize};

use crate::core::GameState;
use crate::error::{EngineError, EngineResult};

/// "RVRS" in ASCII.
pub const SAVE_MAGIC: u32 = 0x5256_5253;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// A persisted game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    magic: u32,
    pub version: u32,
    pub elapsed_secs: u64,
    pub state: GameState,
}

impl SaveFile {
    #[must_use]
    pub fn new(state: GameState, elapsed_secs: u64) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: SAVE_VERSION,
            elapsed_secs,
            state,
        }
    }

    pub fn encode(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a save.
    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        let save: SaveFile = bincode::deserialize(bytes)?;
        if save.magic != SAVE_MAGIC {
            return Err(EngineError::CorruptSave(format!("bad magic {:#010x}", save.magic)));
        }
        if save.version != SAVE_VERSION {
            return Err(EngineError::SaveVersion {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        save.state.validate()?;
        Ok(save)
    }
}

/// The state as it was when the current round started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub version: u32,
    pub round: u32,
    state: GameState,
}

impl RoundSnapshot {
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            round: state.turn,
            state: state.clone(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A fresh copy of the captured state; the snapshot stays usable.
    #[must_use]
    pub fn restore(&self) -> GameState {
        self.state.clone()
    }
}
