//! Tournament data storage.
//!
//! The core only talks to storage through the [`Repository`] trait.
//! Two implementations ship with the crate:
//! - [`JsonlRepository`]: JSONL files under a data directory
//! - [`MemoryRepository`]: in-process vectors, for tests and embedding

mod jsonl;
mod memory;

pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Match, Player, PlayerId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at {path:?} line {line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Player id sequence exhausted")]
    IdsExhausted,
}

/// Data access for players and matches.
///
/// Implementations own whatever resource they need and acquire it per call;
/// nothing is held open between operations.
pub trait Repository {
    /// All registered players.
    fn list_players(&self) -> Result<Vec<Player>, StorageError>;

    /// All recorded matches.
    fn list_matches(&self) -> Result<Vec<Match>, StorageError>;

    /// Register a player. The store assigns the id.
    fn add_player(&mut self, name: &str) -> Result<Player, StorageError>;

    /// Record a decided match.
    fn record_match(&mut self, winner: PlayerId, loser: PlayerId) -> Result<Match, StorageError>;

    /// Remove every match record.
    fn clear_matches(&mut self) -> Result<(), StorageError>;

    /// Remove every player record.
    fn clear_players(&mut self) -> Result<(), StorageError>;

    /// Number of registered players.
    fn count_players(&self) -> Result<usize, StorageError> {
        Ok(self.list_players()?.len())
    }
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        (**self).list_players()
    }

    fn list_matches(&self) -> Result<Vec<Match>, StorageError> {
        (**self).list_matches()
    }

    fn add_player(&mut self, name: &str) -> Result<Player, StorageError> {
        (**self).add_player(name)
    }

    fn record_match(&mut self, winner: PlayerId, loser: PlayerId) -> Result<Match, StorageError> {
        (**self).record_match(winner, loser)
    }

    fn clear_matches(&mut self) -> Result<(), StorageError> {
        (**self).clear_matches()
    }

    fn clear_players(&mut self) -> Result<(), StorageError> {
        (**self).clear_players()
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        (**self).count_players()
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Player.filename())
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Match.filename())
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    /// Persisted id sequence, so ids are never reused after a reset.
    pub fn sequence_path(&self) -> PathBuf {
        self.state_dir().join("player_sequence.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
