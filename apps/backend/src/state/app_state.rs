use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::engine::EngineConfig;
use crate::services::matching::MatchingService;
use crate::services::rounds::RoundService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent in tests that never touch storage)
    pub db: Option<DatabaseConnection>,
    pub engine: EngineConfig,
    pub matching: Arc<MatchingService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, engine: EngineConfig, matching: MatchingService) -> Self {
        Self {
            db: Some(db),
            engine,
            matching: Arc::new(matching),
        }
    }

    /// State without a database; routes needing storage answer 503.
    pub fn without_db(engine: EngineConfig) -> Self {
        let matching = MatchingService::new(None, engine.oracle_timeout, engine.seed);
        Self {
            db: None,
            engine,
            matching: Arc::new(matching),
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn round_service(&self) -> RoundService {
        RoundService::new(Arc::clone(&self.matching))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("engine", &self.engine)
            .field("oracle", &self.matching.oracle_name())
            .finish()
    }
}
