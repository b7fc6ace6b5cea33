//! Player identification, per-player storage, and the player record.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seat 0 is the human in every preset mode.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `PlayerId`.
//!
//! ## Player
//!
//! Everything the engine tracks about one seat: hand, resto, played piles,
//! active effects, board position, and story-mode extras such as hearts.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::board::PathId;
use crate::cards::{Card, CardId};
use crate::effects::{MoveEffect, ScoreEffect};

/// Seat identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use reversus::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per player.
///
/// ```
/// use reversus::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i32> = PlayerMap::new(4, |_| 0);
/// scores[PlayerId::new(1)] = 12;
/// assert_eq!(scores[PlayerId::new(1)], 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build from an already ordered vector (entry `i` belongs to seat `i`).
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `player` is a seat of this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    /// Get a reference to a player's data, if the seat exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data, if the seat exists.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Decision archetype driving a computer-controlled seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiKind {
    Default,
    /// Plays its highest value card every time.
    Tutorial,
    Contravox,
    Versatrix,
    /// May trigger a free global inversion once per round.
    Reversum,
    /// Member of the three-seat cluster in the one-vs-many battle.
    NecroversoKing,
    /// Boss of the final battle; owns the NECRO X ability.
    NecroversoFinal,
    /// Mirrors the human in heart mode.
    Inversus,
}

/// Live standing shown next to each seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Neutral,
    Winning,
    Losing,
}

/// Current effect per category. At most one of each per round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub score: Option<ScoreEffect>,
    pub movement: Option<MoveEffect>,
}

/// Cards a player has in front of them this round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayedCards {
    /// At most two value cards.
    pub value: Vec<Card>,
    /// Effect cards targeting this player, one per category plus any
    /// global reversal cast on them.
    pub effect: Vec<Card>,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub ai: AiKind,
    pub hand: Vec<Card>,
    /// Value card carried over from the previous round.
    pub resto: Option<Card>,
    /// Last value card played this round; becomes the resto at reset.
    pub next_resto: Option<CardId>,
    pub effects: ActiveEffects,
    pub played: PlayedCards,
    pub played_value_this_turn: bool,
    pub is_eliminated: bool,
    pub status: PlayerStatus,
    pub live_score: i32,
    /// Heart mode only.
    pub hearts: Option<u8>,
    /// `None` when the mode has no board.
    pub path: Option<PathId>,
    pub position: u8,
    pub target_path_for_pula: Option<PathId>,
}

impl Player {
    /// Create a player standing on space 1.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, is_human: bool, ai: AiKind) -> Self {
        Self {
            id,
            name: name.into(),
            is_human,
            ai,
            hand: Vec::new(),
            resto: None,
            next_resto: None,
            effects: ActiveEffects::default(),
            played: PlayedCards::default(),
            played_value_this_turn: false,
            is_eliminated: false,
            status: PlayerStatus::Neutral,
            live_score: 0,
            hearts: None,
            path: None,
            position: 1,
            target_path_for_pula: None,
        }
    }

    /// Value cards currently in hand.
    pub fn value_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().filter(|c| c.is_value())
    }

    /// Effect cards currently in hand.
    pub fn effect_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().filter(|c| c.is_effect())
    }

    /// Number of value cards in hand.
    #[must_use]
    pub fn value_card_count(&self) -> usize {
        self.value_cards().count()
    }

    /// Whether the mandatory value play is still owed this turn.
    #[must_use]
    pub fn owes_value_play(&self) -> bool {
        !self.played_value_this_turn && self.value_card_count() >= 2
    }

    /// Face value of the resto, or 0 without one.
    #[must_use]
    pub fn resto_value(&self) -> u8 {
        self.resto.as_ref().and_then(Card::value).unwrap_or(0)
    }

    /// Find a card in hand by id.
    #[must_use]
    pub fn card_in_hand(&self, card: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card)
    }

    /// Remove a card from hand by id.
    pub fn take_from_hand(&mut self, card: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.id == card)?;
        Some(self.hand.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardFace;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 1");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert!(map.contains(PlayerId::new(3)));
        assert!(!map.contains(PlayerId::new(4)));
        assert!(map.get(PlayerId::new(9)).is_none());
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], (PlayerId::new(2), &2));
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }

    #[test]
    fn test_owes_value_play() {
        let mut player = Player::new(PlayerId::new(0), "You", true, AiKind::Default);
        player.hand.push(Card::new(CardId(1), CardFace::Value(4)));
        assert!(!player.owes_value_play());

        player.hand.push(Card::new(CardId(2), CardFace::Value(6)));
        assert!(player.owes_value_play());

        player.played_value_this_turn = true;
        assert!(!player.owes_value_play());
    }

    #[test]
    fn test_take_from_hand() {
        let mut player = Player::new(PlayerId::new(1), "Player 2", false, AiKind::Default);
        player.hand.push(Card::new(CardId(7), CardFace::Value(8)));

        assert!(player.take_from_hand(CardId(3)).is_none());
        let card = player.take_from_hand(CardId(7)).unwrap();
        assert_eq!(card.value(), Some(8));
        assert!(player.hand.is_empty());
    }
}
