//! Pairing model: an assigned match-up for the next round.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StandingRecord};

/// Two players drawn against each other for the upcoming round.
///
/// Pairings are computed fresh each round and never stored. The outcome is
/// recorded afterwards as a [`Match`](super::Match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
}

impl Pairing {
    /// Pair two standing records.
    pub fn new(first: &StandingRecord, second: &StandingRecord) -> Self {
        Self {
            player1_id: first.player_id,
            player1_name: first.name.clone(),
            player2_id: second.player_id,
            player2_name: second.name.clone(),
        }
    }

    /// Both player IDs, first player first.
    pub fn ids(&self) -> (PlayerId, PlayerId) {
        (self.player1_id, self.player2_id)
    }
}
