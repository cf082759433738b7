use std::sync::Arc;

use crate::config::db::DbProfile;
use crate::config::engine::EngineConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::matcher::CandidateMatcher;
use crate::services::matching::MatchingService;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    engine: EngineConfig,
    db_profile: Option<DbProfile>,
    oracle: Option<Arc<dyn CandidateMatcher>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            engine: EngineConfig::default(),
            db_profile: None,
            oracle: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Use this matcher as the oracle instead of the one the engine config names.
    pub fn with_oracle(mut self, oracle: Arc<dyn CandidateMatcher>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let matching = match self.oracle {
            Some(oracle) => {
                MatchingService::new(Some(oracle), self.engine.oracle_timeout, self.engine.seed)
            }
            None => MatchingService::from_config(&self.engine)?,
        };

        match self.db_profile {
            Some(profile) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(profile).await?;
                Ok(AppState::new(conn, self.engine, matching))
            }
            None => Ok(AppState {
                db: None,
                engine: self.engine,
                matching: Arc::new(matching),
            }),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
