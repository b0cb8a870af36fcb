//! # Swiss Tournament
//!
//! Player registration, match reporting and round pairing for Swiss-system
//! tournaments.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, standings, pairings)
//! - **storage**: Repository trait plus JSONL and in-memory stores
//! - **calculate**: Standings aggregation and the pairing engine
//! - **tournament**: Service facade over an injected repository
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use tournament::{Tournament, TournamentError};
