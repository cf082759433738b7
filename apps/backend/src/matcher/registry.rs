//! How matchers are registered
//!
//! 1) Implement `CandidateMatcher` for your type in its module.
//! 2) Add a `MatcherFactory` entry below under the name `MINGLE_MATCHER` selects it by.
//! 3) Keep constructors free of I/O; network calls belong in `propose`.
//! 4) Determinism: same seed => same partition (where applicable).

use std::sync::Arc;

use crate::config::engine::EngineConfig;
use crate::matcher::{BalancedMatcher, CandidateMatcher, LlmMatcher, MatchError, ShuffleMatcher};

type BuildFn = fn(&EngineConfig) -> Result<Arc<dyn CandidateMatcher>, MatchError>;

/// Factory definition for constructing matcher implementations.
pub struct MatcherFactory {
    pub name: &'static str,
    pub make: BuildFn,
}

static MATCHER_FACTORIES: &[MatcherFactory] = &[
    MatcherFactory {
        name: LlmMatcher::NAME,
        make: make_llm,
    },
    MatcherFactory {
        name: BalancedMatcher::NAME,
        make: make_balanced,
    },
    MatcherFactory {
        name: ShuffleMatcher::NAME,
        make: make_shuffle,
    },
];

/// Returns the statically registered matcher factories.
pub fn registered_matchers() -> &'static [MatcherFactory] {
    MATCHER_FACTORIES
}

/// Finds a registered matcher factory by its name.
pub fn by_name(name: &str) -> Option<&'static MatcherFactory> {
    registered_matchers()
        .iter()
        .find(|factory| factory.name == name)
}

/// Build the matcher the configuration selects.
pub fn build(config: &EngineConfig) -> Result<Arc<dyn CandidateMatcher>, MatchError> {
    let name = config.matcher.as_str();
    let factory = by_name(name)
        .ok_or_else(|| MatchError::Unavailable(format!("no matcher registered as '{name}'")))?;
    (factory.make)(config)
}

fn make_llm(config: &EngineConfig) -> Result<Arc<dyn CandidateMatcher>, MatchError> {
    let llm = config
        .llm
        .clone()
        .ok_or_else(|| MatchError::Unavailable("language-model matcher has no API key".into()))?;
    Ok(Arc::new(LlmMatcher::new(llm, config.oracle_timeout)?))
}

fn make_balanced(config: &EngineConfig) -> Result<Arc<dyn CandidateMatcher>, MatchError> {
    Ok(Arc::new(BalancedMatcher::new(config.seed)))
}

fn make_shuffle(config: &EngineConfig) -> Result<Arc<dyn CandidateMatcher>, MatchError> {
    Ok(Arc::new(ShuffleMatcher::new(config.seed)))
}
