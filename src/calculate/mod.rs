//! Tournament calculations.
//!
//! Pure functions over snapshots of players and matches:
//! - Standings aggregation (wins and matches played per player)
//! - Swiss pairing for the next round

mod pairing;
mod standings;

pub use pairing::*;
pub use standings::*;
