//! Player model: a registered tournament entrant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier, assigned by the store
    pub id: PlayerId,

    /// Full name as registered (need not be unique)
    pub name: String,

    /// When the player was registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player registered now.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            registered_at: Utc::now(),
        }
    }
}

/// Normalize a player name for registration.
///
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_player_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
