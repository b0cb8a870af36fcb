//! Tournament service.
//!
//! [`Tournament`] is the caller-facing facade. It owns an injected
//! [`Repository`] and exposes one method per tournament operation:
//! registering players, reporting matches, standings, pairings, resets and
//! counting.

use thiserror::Error;
use tracing::info;

use crate::calculate::{
    compute_pairings, compute_pairings_avoiding_rematches, compute_standings, rank_standings,
    PairingError,
};
use crate::config::PairingConfig;
use crate::models::{normalize_player_name, Match, Pairing, Player, PlayerId, StandingRecord};
use crate::storage::{Repository, StorageError};

/// Errors surfaced by tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Data access failed: {0}")]
    DataAccess(#[from] StorageError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error("Invalid match outcome: {0}")]
    InvalidMatchOutcome(String),

    #[error("Player name must not be empty")]
    InvalidPlayerName,
}

/// Players and matches read from the store at one point in time.
///
/// Pairing from a snapshot needs no access to the store, so callers can run
/// it away from whatever guards the repository.
#[derive(Debug, Clone)]
pub struct RoundSnapshot {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

impl RoundSnapshot {
    pub fn pairings(&self, avoid_rematches: bool) -> Result<Vec<Pairing>, PairingError> {
        let standings = compute_standings(&self.players, &self.matches);

        let pairings = if avoid_rematches {
            compute_pairings_avoiding_rematches(&standings, &self.matches)?
        } else {
            compute_pairings(&standings)?
        };

        info!(
            "Computed {} pairings for {} players (avoid_rematches: {})",
            pairings.len(),
            self.players.len(),
            avoid_rematches
        );
        Ok(pairings)
    }
}

/// A Swiss tournament over some store.
#[derive(Debug)]
pub struct Tournament<R> {
    repo: R,
    pairing: PairingConfig,
}

impl<R: Repository> Tournament<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            pairing: PairingConfig::default(),
        }
    }

    pub fn with_pairing_config(mut self, pairing: PairingConfig) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn pairing_config(&self) -> &PairingConfig {
        &self.pairing
    }

    /// Register a player. The name is trimmed and must not be empty.
    pub fn register_player(&mut self, name: &str) -> Result<Player, TournamentError> {
        let name = normalize_player_name(name).ok_or(TournamentError::InvalidPlayerName)?;
        Ok(self.repo.add_player(&name)?)
    }

    /// Record that `winner` beat `loser`.
    ///
    /// Both must be distinct registered players.
    pub fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<Match, TournamentError> {
        if winner == loser {
            return Err(TournamentError::InvalidMatchOutcome(format!(
                "player {} cannot play themselves",
                winner
            )));
        }

        let players = self.repo.list_players()?;
        for id in [winner, loser] {
            if !players.iter().any(|p| p.id == id) {
                return Err(TournamentError::InvalidMatchOutcome(format!(
                    "player {} is not registered",
                    id
                )));
            }
        }

        Ok(self.repo.record_match(winner, loser)?)
    }

    pub fn players(&self) -> Result<Vec<Player>, TournamentError> {
        Ok(self.repo.list_players()?)
    }

    pub fn matches(&self) -> Result<Vec<Match>, TournamentError> {
        Ok(self.repo.list_matches()?)
    }

    /// Current standings, leader first.
    pub fn standings(&self) -> Result<Vec<StandingRecord>, TournamentError> {
        let players = self.repo.list_players()?;
        let matches = self.repo.list_matches()?;
        Ok(rank_standings(compute_standings(&players, &matches)))
    }

    /// Pairings for the next round using the configured engine.
    pub fn swiss_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        self.swiss_pairings_with(self.pairing.avoid_rematches)
    }

    /// Pairings for the next round, choosing whether to avoid rematches.
    pub fn swiss_pairings_with(
        &self,
        avoid_rematches: bool,
    ) -> Result<Vec<Pairing>, TournamentError> {
        Ok(self.round_snapshot()?.pairings(avoid_rematches)?)
    }

    /// Read the players and matches a round is paired from.
    pub fn round_snapshot(&self) -> Result<RoundSnapshot, TournamentError> {
        Ok(RoundSnapshot {
            players: self.repo.list_players()?,
            matches: self.repo.list_matches()?,
        })
    }

    pub fn delete_matches(&mut self) -> Result<(), TournamentError> {
        Ok(self.repo.clear_matches()?)
    }

    pub fn delete_players(&mut self) -> Result<(), TournamentError> {
        Ok(self.repo.clear_players()?)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.repo.count_players()?)
    }
}
