use std::sync::Arc;

use tokio::sync::RwLock;

use crate::storage::Repository;
use crate::tournament::Tournament;

/// Store type shared by the HTTP handlers.
pub type DynRepository = Box<dyn Repository + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub tournament: Arc<RwLock<Tournament<DynRepository>>>,
}

impl AppState {
    pub fn new(tournament: Tournament<DynRepository>) -> Self {
        Self {
            tournament: Arc::new(RwLock::new(tournament)),
        }
    }
}
