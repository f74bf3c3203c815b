pub mod authz;
pub mod coordinator;
pub mod database;
pub mod handlers;
pub mod server;
pub mod snapshot;
pub mod token;
pub mod validation;

use std::sync::Arc;

use shared::types::AppConfig;

use crate::coordinator::Coordinator;
use crate::database::SqliteStore;

/// Everything a request handler needs. Cheap to clone; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub coordinator: Arc<Coordinator<SqliteStore>>,
}

impl AppState {
    pub fn new(config: AppConfig, coordinator: Coordinator<SqliteStore>) -> Self {
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
        }
    }
}
