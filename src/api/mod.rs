//! REST API endpoints.
//!
//! Axum-based HTTP API exposing player registration, match reporting,
//! standings and next-round pairings.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::PairingError;
use crate::tournament::TournamentError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidMatchOutcome(String),

    #[error("{0}")]
    OddPlayerCount(String),

    #[error("{0}")]
    InsufficientPlayers(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::InvalidPlayerName => ApiError::BadRequest(err.to_string()),
            TournamentError::InvalidMatchOutcome(_) => ApiError::InvalidMatchOutcome(err.to_string()),
            TournamentError::Pairing(PairingError::OddPlayerCount(_)) => {
                ApiError::OddPlayerCount(err.to_string())
            }
            TournamentError::Pairing(PairingError::InsufficientPlayers(_)) => {
                ApiError::InsufficientPlayers(err.to_string())
            }
            TournamentError::DataAccess(e) => {
                tracing::error!("Storage failure: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InvalidMatchOutcome(_) => (StatusCode::BAD_REQUEST, "INVALID_MATCH_OUTCOME"),
            ApiError::OddPlayerCount(_) => (StatusCode::CONFLICT, "ODD_PLAYER_COUNT"),
            ApiError::InsufficientPlayers(_) => (StatusCode::CONFLICT, "INSUFFICIENT_PLAYERS"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/players",
            get(routes::players::list_players)
                .post(routes::players::register_player)
                .delete(routes::players::delete_players),
        )
        .route(
            "/api/matches",
            get(routes::matches::list_matches)
                .post(routes::matches::report_match)
                .delete(routes::matches::delete_matches),
        )
        .route("/api/standings", get(routes::rounds::get_standings))
        .route("/api/pairings", get(routes::rounds::get_pairings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origin. `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
