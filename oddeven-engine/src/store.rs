use crate::game::GameRecord;
use std::collections::BTreeMap;

/// Open games keyed by game id.
///
/// Holds at most one record per id and never holds a finished or aborted game.
/// Only the engine inserts or removes records.
#[derive(Debug, Default, Clone)]
pub struct GameStore {
    games: BTreeMap<String, GameRecord>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game_id: &str) -> Option<&GameRecord> {
        self.games.get(game_id)
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Open games in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.values()
    }

    pub(crate) fn get_mut(&mut self, game_id: &str) -> Option<&mut GameRecord> {
        self.games.get_mut(game_id)
    }

    pub(crate) fn insert(&mut self, record: GameRecord) {
        self.games.insert(record.id().to_string(), record);
    }

    pub(crate) fn remove(&mut self, game_id: &str) -> Option<GameRecord> {
        self.games.remove(game_id)
    }
}
