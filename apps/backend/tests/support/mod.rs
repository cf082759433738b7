#![allow(dead_code)]

pub mod oracles;

use std::sync::Arc;

use mingle::config::db::DbProfile;
use mingle::config::engine::EngineConfig;
use mingle::infra::state::build_state;
use mingle::matcher::CandidateMatcher;
use mingle::{AppError, AppState};

pub use app_builder::create_test_app;

/// Fixed seed so partitions are reproducible across runs.
pub const TEST_SEED: u64 = 7;

pub fn test_engine() -> EngineConfig {
    EngineConfig {
        seed: Some(TEST_SEED),
        ..EngineConfig::default()
    }
}

/// Fresh in-memory database with the balanced matcher as oracle.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_db(DbProfile::InMemory)
        .with_engine(test_engine())
        .build()
        .await
}

/// Fresh in-memory database with a test oracle in front of the fallback.
pub async fn build_test_state_with_oracle(
    oracle: Arc<dyn CandidateMatcher>,
) -> Result<AppState, AppError> {
    build_state()
        .with_db(DbProfile::InMemory)
        .with_engine(test_engine())
        .with_oracle(oracle)
        .build()
        .await
}
