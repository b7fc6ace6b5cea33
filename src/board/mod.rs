//! The board: parallel paths of spaces, some carrying field effects.

mod path;
mod space;

pub use path::{generate_board_paths, BoardOptions, BoardPath, PathId};
pub use space::{FieldEffect, FieldEffectKind, Polarity, Space, SpaceColor};
