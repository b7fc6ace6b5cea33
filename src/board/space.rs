//! Board spaces and field effects.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Space color. Blue and red spaces carry a field effect; yellow and black
/// spaces are story-battle specials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceColor {
    White,
    Blue,
    Red,
    Yellow,
    Black,
}

/// Whether a field effect helps or hurts the team that lands on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Effects printed on blue (positive) and red (negative) spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldEffectKind {
    RestoMaior,
    RestoMenor,
    CartaMenor,
    CartaMaior,
    JogoAberto,
    Imunidade,
    Desafio,
    Impulso,
    Castigo,
    Parada,
    SuperExposto,
    TrocaJusta,
    TrocaInjusta,
    TotalRevesusNada,
}

impl FieldEffectKind {
    /// Effects that can appear on a blue space.
    pub const POSITIVE: [FieldEffectKind; 7] = [
        FieldEffectKind::RestoMaior,
        FieldEffectKind::CartaMenor,
        FieldEffectKind::JogoAberto,
        FieldEffectKind::Imunidade,
        FieldEffectKind::Desafio,
        FieldEffectKind::Impulso,
        FieldEffectKind::TrocaJusta,
    ];

    /// Effects that can appear on a red space.
    pub const NEGATIVE: [FieldEffectKind; 8] = [
        FieldEffectKind::RestoMenor,
        FieldEffectKind::CartaMaior,
        FieldEffectKind::JogoAberto,
        FieldEffectKind::SuperExposto,
        FieldEffectKind::Castigo,
        FieldEffectKind::Parada,
        FieldEffectKind::TrocaInjusta,
        FieldEffectKind::TotalRevesusNada,
    ];

    /// Persistent effects stay active for the rest of the round; the rest
    /// act once, immediately.
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        !matches!(
            self,
            FieldEffectKind::CartaMenor
                | FieldEffectKind::CartaMaior
                | FieldEffectKind::JogoAberto
                | FieldEffectKind::TrocaJusta
                | FieldEffectKind::TrocaInjusta
                | FieldEffectKind::TotalRevesusNada
        )
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            FieldEffectKind::RestoMaior => "Your resto counts as 10 this round.",
            FieldEffectKind::RestoMenor => "Your resto counts as 2 this round.",
            FieldEffectKind::CartaMenor => "Discard your lowest value card and draw a new one.",
            FieldEffectKind::CartaMaior => "Discard your highest value card and draw a new one.",
            FieldEffectKind::JogoAberto => "Hands are played face up this round.",
            FieldEffectKind::Imunidade => "Immune to Menos and Desce this round.",
            FieldEffectKind::Desafio => "Win without playing Mais or Sobe to advance 3 spaces.",
            FieldEffectKind::Impulso => "Advance 1 space even if you lose the round.",
            FieldEffectKind::Castigo => "Retreat 3 spaces if you lose the round.",
            FieldEffectKind::Parada => "Winning the round does not move you.",
            FieldEffectKind::SuperExposto => "Menos and Desce hit you twice as hard.",
            FieldEffectKind::TrocaJusta => "Trade your lowest value card for an opponent's highest.",
            FieldEffectKind::TrocaInjusta => "Trade your highest value card for an opponent's lowest.",
            FieldEffectKind::TotalRevesusNada => "Discard your effect cards.",
        }
    }
}

impl std::fmt::Display for FieldEffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldEffectKind::RestoMaior => "Resto Maior",
            FieldEffectKind::RestoMenor => "Resto Menor",
            FieldEffectKind::CartaMenor => "Carta Menor",
            FieldEffectKind::CartaMaior => "Carta Maior",
            FieldEffectKind::JogoAberto => "Jogo Aberto",
            FieldEffectKind::Imunidade => "Imunidade",
            FieldEffectKind::Desafio => "Desafio",
            FieldEffectKind::Impulso => "Impulso",
            FieldEffectKind::Castigo => "Castigo",
            FieldEffectKind::Parada => "Parada",
            FieldEffectKind::SuperExposto => "Super Exposto",
            FieldEffectKind::TrocaJusta => "Troca Justa",
            FieldEffectKind::TrocaInjusta => "Troca Injusta",
            FieldEffectKind::TotalRevesusNada => "Total Revesus Nada!",
        };
        f.write_str(name)
    }
}

/// A round-scoped field effect attached to one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldEffect {
    pub kind: FieldEffectKind,
    pub applies_to: PlayerId,
    pub polarity: Polarity,
}

/// One space of a path. Ids run 1..=board size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Space {
    pub id: u8,
    pub color: SpaceColor,
    pub effect: Option<FieldEffectKind>,
    /// Set when the space fires; cleared once nobody stands on it.
    pub used: bool,
}

impl Space {
    #[must_use]
    pub fn white(id: u8) -> Self {
        Self {
            id,
            color: SpaceColor::White,
            effect: None,
            used: false,
        }
    }

    /// Polarity of a blue or red space.
    #[must_use]
    pub fn polarity(&self) -> Option<Polarity> {
        match self.color {
            SpaceColor::Blue => Some(Polarity::Positive),
            SpaceColor::Red => Some(Polarity::Negative),
            _ => None,
        }
    }

    /// Turn the space back into a plain one.
    pub fn neutralize(&mut self) {
        self.color = SpaceColor::White;
        self.effect = None;
    }
}
