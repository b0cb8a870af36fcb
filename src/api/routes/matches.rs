use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Match, PlayerId};

#[derive(Debug, Deserialize)]
pub struct ReportMatchRequest {
    pub winner: PlayerId,
    pub loser: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub count: usize,
}

pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let tournament = state.tournament.read().await;
    let matches = tournament.matches()?;

    Ok(Json(MatchListResponse {
        count: matches.len(),
        matches,
    }))
}

pub async fn report_match(
    State(state): State<AppState>,
    Json(request): Json<ReportMatchRequest>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let mut tournament = state.tournament.write().await;
    let recorded = tournament.report_match(request.winner, request.loser)?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

pub async fn delete_matches(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut tournament = state.tournament.write().await;
    tournament.delete_matches()?;
    Ok(StatusCode::NO_CONTENT)
}
