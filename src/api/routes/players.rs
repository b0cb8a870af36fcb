use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Player;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
    pub count: usize,
}

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let tournament = state.tournament.read().await;
    let players = tournament.players()?;

    Ok(Json(PlayerListResponse {
        count: players.len(),
        players,
    }))
}

pub async fn register_player(
    State(state): State<AppState>,
    Json(request): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let mut tournament = state.tournament.write().await;
    let player = tournament.register_player(&request.name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn delete_players(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut tournament = state.tournament.write().await;
    tournament.delete_players()?;
    Ok(StatusCode::NO_CONTENT)
}
