//! Match model: a completed game between two players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A single completed match.
///
/// Reported matches store the winner as `home` and the loser as `visitor`.
/// A match without a `winner` is kept in storage but never counts toward
/// standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Home player
    pub home: PlayerId,

    /// Visiting player
    pub visitor: PlayerId,

    /// Winner, either `home` or `visitor`
    #[serde(default)]
    pub winner: Option<PlayerId>,

    /// When the result was reported
    pub reported_at: DateTime<Utc>,
}

impl Match {
    /// Create a decided match from a reported result.
    pub fn decided(winner: PlayerId, loser: PlayerId) -> Self {
        Self {
            home: winner,
            visitor: loser,
            winner: Some(winner),
            reported_at: Utc::now(),
        }
    }

    /// Whether the given player took part in this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.home == player || self.visitor == player
    }

    /// A winner must be one of the two participants.
    pub fn has_valid_winner(&self) -> bool {
        match self.winner {
            Some(w) => self.involves(w),
            None => true,
        }
    }
}
