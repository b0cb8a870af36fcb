//! In-memory repository.

use crate::models::{Match, Player, PlayerId};

use super::{Repository, StorageError};

/// Repository holding players and matches in memory.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    players: Vec<Player>,
    matches: Vec<Match>,
    next_id: PlayerId,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            matches: Vec::new(),
            next_id: PlayerId::new(1),
        }
    }

    /// Insert an already-built match, e.g. one without a winner.
    pub fn insert_match(&mut self, m: Match) {
        self.matches.push(m);
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryRepository {
    fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.clone())
    }

    fn list_matches(&self) -> Result<Vec<Match>, StorageError> {
        Ok(self.matches.clone())
    }

    fn add_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let player = Player::new(self.next_id, name.to_string());
        self.next_id = self.next_id.next().ok_or(StorageError::IdsExhausted)?;
        self.players.push(player.clone());
        Ok(player)
    }

    fn record_match(&mut self, winner: PlayerId, loser: PlayerId) -> Result<Match, StorageError> {
        let m = Match::decided(winner, loser);
        self.matches.push(m.clone());
        Ok(m)
    }

    fn clear_matches(&mut self) -> Result<(), StorageError> {
        self.matches.clear();
        Ok(())
    }

    fn clear_players(&mut self) -> Result<(), StorageError> {
        self.players.clear();
        Ok(())
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        Ok(self.players.len())
    }
}
