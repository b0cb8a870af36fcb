//! Derived standings models.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::PlayerId;

/// A player's aggregated record at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub player_id: PlayerId,
    pub name: String,

    /// Matches won
    pub wins: u32,

    /// Matches played with a recorded winner. Always `>= wins`.
    pub matches_played: u32,
}

impl StandingRecord {
    /// A record for a player with no matches yet.
    pub fn unplayed(player_id: PlayerId, name: String) -> Self {
        Self {
            player_id,
            name,
            wins: 0,
            matches_played: 0,
        }
    }

    pub fn losses(&self) -> u32 {
        self.matches_played - self.wins
    }

    /// Win rate in `[0, 1]`; zero when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.matches_played as f64
        }
    }

    /// Ranking order: most wins first, then fewest matches, then lowest id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then_with(|| self.matches_played.cmp(&other.matches_played))
            .then_with(|| self.player_id.cmp(&other.player_id))
    }
}
