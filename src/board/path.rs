//! Board paths and board generation.

use serde::{Deserialize, Serialize};

use super::space::{FieldEffectKind, Space, SpaceColor};
use crate::core::{GameConfig, GameRng, PlayerId};

/// Path identifier (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathId(pub u8);

impl PathId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path {}", self.0 + 1)
    }
}

/// One parallel track of the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPath {
    pub id: PathId,
    pub owner: Option<PlayerId>,
    pub spaces: Vec<Space>,
}

impl BoardPath {
    /// Space at a 1-based position, if it is on the board.
    #[must_use]
    pub fn space(&self, position: u8) -> Option<&Space> {
        position.checked_sub(1).and_then(|i| self.spaces.get(i as usize))
    }

    /// Mutable space at a 1-based position.
    pub fn space_mut(&mut self, position: u8) -> Option<&mut Space> {
        position
            .checked_sub(1)
            .and_then(move |i| self.spaces.get_mut(i as usize))
    }

    /// Red spaces that have not fired yet.
    #[must_use]
    pub fn unused_red_spaces(&self) -> usize {
        self.spaces
            .iter()
            .filter(|s| s.color == SpaceColor::Red && !s.used)
            .count()
    }
}

/// Battle-specific board features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardOptions {
    /// Final battle: black holes and a single blue/red space per path.
    pub final_boss: bool,
    /// One yellow space per path.
    pub yellow_spaces: bool,
    /// Every colored space is red.
    pub only_negative: bool,
}

/// Generate the board.
///
/// The first and last spaces of a path are never colored. Within the
/// colorable spaces, black holes are placed first, then blue/red spaces,
/// then the yellow space.
#[must_use]
pub fn generate_board_paths(
    config: &GameConfig,
    options: BoardOptions,
    rng: &mut GameRng,
) -> Vec<BoardPath> {
    (0..config.num_paths)
        .map(|i| {
            let mut spaces: Vec<Space> = (1..=config.board_size).map(Space::white).collect();
            let mut colorable: Vec<u8> = (2..config.board_size).collect();
            rng.shuffle(&mut colorable);
            let mut slots = colorable.into_iter();

            if options.final_boss {
                let black_holes = if rng.coin() { 2 } else { 1 };
                for id in slots.by_ref().take(black_holes) {
                    spaces[id as usize - 1].color = SpaceColor::Black;
                }
            }

            let colored = if options.final_boss {
                1
            } else {
                config.colored_spaces_per_path
            };
            for id in slots.by_ref().take(colored) {
                let positive = !options.only_negative && rng.coin();
                let (color, pool): (SpaceColor, &[FieldEffectKind]) = if positive {
                    (SpaceColor::Blue, &FieldEffectKind::POSITIVE)
                } else {
                    (SpaceColor::Red, &FieldEffectKind::NEGATIVE)
                };
                let space = &mut spaces[id as usize - 1];
                space.color = color;
                space.effect = rng.choose(pool).copied();
            }

            if options.yellow_spaces {
                if let Some(id) = slots.next() {
                    spaces[id as usize - 1].color = SpaceColor::Yellow;
                }
            }

            BoardPath {
                id: PathId(i as u8),
                owner: None,
                spaces,
            }
        })
        .collect()
}
