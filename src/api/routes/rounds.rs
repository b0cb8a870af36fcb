use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Pairing, StandingRecord};
use crate::tournament::{RoundSnapshot, TournamentError};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingRecord>,
}

pub async fn get_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let tournament = state.tournament.read().await;
    let standings = tournament.standings()?;
    Ok(Json(StandingsResponse { standings }))
}

#[derive(Debug, Deserialize)]
pub struct PairingsParams {
    /// Overrides the configured pairing engine when set
    pub avoid_rematches: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub pairings: Vec<Pairing>,
    pub avoid_rematches: bool,
}

/// Read what the round is paired from, releasing the lock before returning.
async fn snapshot_round(
    state: &AppState,
    avoid_rematches: Option<bool>,
) -> Result<(RoundSnapshot, bool), ApiError> {
    let tournament = state.tournament.read().await;
    let avoid_rematches = avoid_rematches.unwrap_or(tournament.pairing_config().avoid_rematches);
    Ok((tournament.round_snapshot()?, avoid_rematches))
}

pub async fn get_pairings(
    State(state): State<AppState>,
    Query(params): Query<PairingsParams>,
) -> Result<Json<PairingsResponse>, ApiError> {
    let (snapshot, avoid_rematches) = snapshot_round(&state, params.avoid_rematches).await?;

    // The rematch search is CPU-bound; keep it off the async workers
    let pairings = tokio::task::spawn_blocking(move || snapshot.pairings(avoid_rematches))
        .await
        .map_err(|e| ApiError::Internal(format!("Pairing task failed: {}", e)))?
        .map_err(TournamentError::from)?;

    Ok(Json(PairingsResponse {
        pairings,
        avoid_rematches,
    }))
}
