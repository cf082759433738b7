//! Partition strategies.
//!
//! This module provides:
//! - `CandidateMatcher`, the trait every strategy implements
//! - `ShuffleMatcher`: seeded shuffle, also the fallback of last resort
//! - `BalancedMatcher`: in-process local search over repeat and company pairs
//! - `LlmMatcher`: language-model oracle over HTTP
//! - a name-keyed registry used to build the configured strategy

mod balanced;
pub mod llm;
pub mod registry;
mod shuffle;
mod trait_def;

pub use balanced::BalancedMatcher;
pub use llm::LlmMatcher;
pub use shuffle::{ShuffleMatcher, FALLBACK_RATIONALE};
pub use trait_def::{CandidateMatcher, MatchError, MatchRequest};
