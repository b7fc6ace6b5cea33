//! Effect kinds and their inversion table.
//!
//! Effects fall into two categories. Score effects change how a round score
//! is computed; movement effects change how far a player travels when the
//! round resolves. Reversal effects have no category of their own: they flip
//! whatever sits in the category they are aimed at.

use serde::{Deserialize, Serialize};

/// Every effect a card or ability can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Add the resto to the score.
    Mais,
    /// Subtract the resto from the score.
    Menos,
    /// Advance one space.
    Sobe,
    /// Retreat one space.
    Desce,
    /// Move to another path.
    Pula,
    /// Invert one category on one player.
    Reversus,
    /// Invert everything, or lock-invert one category on one player.
    ReversusTotal,
    /// Multiply the score by the resto.
    NecroX,
    /// Divide the score by the resto.
    NecroXInvertido,
}

impl EffectKind {
    /// All kinds, in declaration order.
    pub const ALL: [EffectKind; 9] = [
        EffectKind::Mais,
        EffectKind::Menos,
        EffectKind::Sobe,
        EffectKind::Desce,
        EffectKind::Pula,
        EffectKind::Reversus,
        EffectKind::ReversusTotal,
        EffectKind::NecroX,
        EffectKind::NecroXInvertido,
    ];

    /// The category this kind occupies, if any.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            EffectKind::Mais | EffectKind::Menos | EffectKind::NecroX | EffectKind::NecroXInvertido => {
                Some(Category::Score)
            }
            EffectKind::Sobe | EffectKind::Desce | EffectKind::Pula => Some(Category::Movement),
            EffectKind::Reversus | EffectKind::ReversusTotal => None,
        }
    }

    /// Involutive inverse. `None` for kinds that have no inverse
    /// (`Pula` and the reversal cards).
    #[must_use]
    pub const fn inverse(self) -> Option<EffectKind> {
        match self {
            EffectKind::Mais => Some(EffectKind::Menos),
            EffectKind::Menos => Some(EffectKind::Mais),
            EffectKind::Sobe => Some(EffectKind::Desce),
            EffectKind::Desce => Some(EffectKind::Sobe),
            EffectKind::NecroX => Some(EffectKind::NecroXInvertido),
            EffectKind::NecroXInvertido => Some(EffectKind::NecroX),
            EffectKind::Pula | EffectKind::Reversus | EffectKind::ReversusTotal => None,
        }
    }

    /// Whether this is one of the reversal cards.
    #[must_use]
    pub const fn is_reversal(self) -> bool {
        matches!(self, EffectKind::Reversus | EffectKind::ReversusTotal)
    }

    /// Score effect carried by this kind, if it is one.
    #[must_use]
    pub const fn as_score(self) -> Option<ScoreEffect> {
        match self {
            EffectKind::Mais => Some(ScoreEffect::Mais),
            EffectKind::Menos => Some(ScoreEffect::Menos),
            EffectKind::NecroX => Some(ScoreEffect::NecroX),
            EffectKind::NecroXInvertido => Some(ScoreEffect::NecroXInvertido),
            _ => None,
        }
    }

    /// Movement effect carried by this kind, if it is one.
    #[must_use]
    pub const fn as_movement(self) -> Option<MoveEffect> {
        match self {
            EffectKind::Sobe => Some(MoveEffect::Sobe),
            EffectKind::Desce => Some(MoveEffect::Desce),
            EffectKind::Pula => Some(MoveEffect::Pula),
            _ => None,
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EffectKind::Mais => "Mais",
            EffectKind::Menos => "Menos",
            EffectKind::Sobe => "Sobe",
            EffectKind::Desce => "Desce",
            EffectKind::Pula => "Pula",
            EffectKind::Reversus => "Reversus",
            EffectKind::ReversusTotal => "Reversus Total",
            EffectKind::NecroX => "NECRO X",
            EffectKind::NecroXInvertido => "NECRO X Invertido",
        };
        f.write_str(name)
    }
}

/// Effect category on a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Score,
    Movement,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Score => f.write_str("score"),
            Category::Movement => f.write_str("movement"),
        }
    }
}

/// Active score effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreEffect {
    Mais,
    Menos,
    NecroX,
    NecroXInvertido,
}

impl ScoreEffect {
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            ScoreEffect::Mais => ScoreEffect::Menos,
            ScoreEffect::Menos => ScoreEffect::Mais,
            ScoreEffect::NecroX => ScoreEffect::NecroXInvertido,
            ScoreEffect::NecroXInvertido => ScoreEffect::NecroX,
        }
    }

    /// The buff under the current inversion state.
    #[must_use]
    pub const fn buff(global_inversion: bool) -> Self {
        if global_inversion {
            ScoreEffect::Menos
        } else {
            ScoreEffect::Mais
        }
    }

    /// The debuff under the current inversion state.
    #[must_use]
    pub const fn debuff(global_inversion: bool) -> Self {
        Self::buff(global_inversion).inverse()
    }
}

impl From<ScoreEffect> for EffectKind {
    fn from(effect: ScoreEffect) -> Self {
        match effect {
            ScoreEffect::Mais => EffectKind::Mais,
            ScoreEffect::Menos => EffectKind::Menos,
            ScoreEffect::NecroX => EffectKind::NecroX,
            ScoreEffect::NecroXInvertido => EffectKind::NecroXInvertido,
        }
    }
}

/// Active movement effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveEffect {
    Sobe,
    Desce,
    Pula,
}

impl MoveEffect {
    /// Inverting a relocation nulls it.
    #[must_use]
    pub const fn inverse(self) -> Option<Self> {
        match self {
            MoveEffect::Sobe => Some(MoveEffect::Desce),
            MoveEffect::Desce => Some(MoveEffect::Sobe),
            MoveEffect::Pula => None,
        }
    }

    /// Spaces moved by the card effect alone.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            MoveEffect::Sobe => 1,
            MoveEffect::Desce => -1,
            MoveEffect::Pula => 0,
        }
    }
}

impl From<MoveEffect> for EffectKind {
    fn from(effect: MoveEffect) -> Self {
        match effect {
            MoveEffect::Sobe => EffectKind::Sobe,
            MoveEffect::Desce => EffectKind::Desce,
            MoveEffect::Pula => EffectKind::Pula,
        }
    }
}

impl std::fmt::Display for ScoreEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        EffectKind::from(*self).fmt(f)
    }
}

impl std::fmt::Display for MoveEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        EffectKind::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_involution() {
        for kind in EffectKind::ALL {
            if let Some(inverse) = kind.inverse() {
                assert_eq!(inverse.inverse(), Some(kind));
                assert_eq!(inverse.category(), kind.category());
            }
        }
    }

    #[test]
    fn test_pula_and_reversals_have_no_inverse() {
        assert_eq!(EffectKind::Pula.inverse(), None);
        assert_eq!(EffectKind::Reversus.inverse(), None);
        assert_eq!(EffectKind::ReversusTotal.inverse(), None);
        assert_eq!(MoveEffect::Pula.inverse(), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(EffectKind::NecroX.category(), Some(Category::Score));
        assert_eq!(EffectKind::Pula.category(), Some(Category::Movement));
        assert_eq!(EffectKind::ReversusTotal.category(), None);
    }

    #[test]
    fn test_buff_swaps_under_inversion() {
        assert_eq!(ScoreEffect::buff(false), ScoreEffect::Mais);
        assert_eq!(ScoreEffect::buff(true), ScoreEffect::Menos);
        assert_eq!(ScoreEffect::debuff(true), ScoreEffect::Mais);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(EffectKind::NecroXInvertido.to_string(), "NECRO X Invertido");
        assert_eq!(MoveEffect::Desce.to_string(), "Desce");
    }
}
