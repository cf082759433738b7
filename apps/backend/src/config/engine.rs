//! Grouping engine configuration read from the environment.

use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_LLM_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_LLM_URL: &str = "https://api.anthropic.com/v1/messages";

/// Which strategy proposes partitions before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherKind {
    /// Language-model oracle over HTTP
    Llm,
    /// In-process local search
    Balanced,
    /// Seeded shuffle only
    Shuffle,
}

impl MatcherKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "llm" => Some(MatcherKind::Llm),
            "balanced" => Some(MatcherKind::Balanced),
            "shuffle" | "random" => Some(MatcherKind::Shuffle),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MatcherKind::Llm => "llm",
            MatcherKind::Balanced => "balanced",
            MatcherKind::Shuffle => "shuffle",
        }
    }
}

/// Settings for the language-model oracle.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub url: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("url", &self.url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub matcher: MatcherKind,
    pub oracle_timeout: Duration,
    /// Fixed RNG seed for the shuffle fallback and local search
    pub seed: Option<u64>,
    pub llm: Option<LlmConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::Balanced,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
            seed: None,
            llm: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse from any key lookup.
    ///
    /// Without `MINGLE_MATCHER` the oracle is used when an API key is present
    /// and the balanced local search otherwise.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm = get("ANTHROPIC_API_KEY").map(|api_key| LlmConfig {
            api_key,
            model: get("MINGLE_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            url: get("MINGLE_LLM_URL").unwrap_or_else(|| DEFAULT_LLM_URL.to_string()),
        });

        let matcher = match get("MINGLE_MATCHER") {
            Some(raw) => MatcherKind::parse(&raw).ok_or_else(|| {
                AppError::config(format!(
                    "MINGLE_MATCHER must be one of llm, balanced, shuffle (got '{raw}')"
                ))
            })?,
            None if llm.is_some() => MatcherKind::Llm,
            None => MatcherKind::Balanced,
        };

        if matcher == MatcherKind::Llm && llm.is_none() {
            return Err(AppError::config(
                "MINGLE_MATCHER=llm requires ANTHROPIC_API_KEY",
            ));
        }

        let oracle_timeout = match get("MINGLE_ORACLE_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "MINGLE_ORACLE_TIMEOUT_MS must be a positive integer (got '{raw}')"
                    ))
                })?,
            None => DEFAULT_ORACLE_TIMEOUT,
        };

        let seed = match get("MINGLE_MATCHER_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!("MINGLE_MATCHER_SEED must be a u64 (got '{raw}')"))
            })?),
            None => None,
        };

        Ok(Self {
            matcher,
            oracle_timeout,
            seed,
            llm,
        })
    }
}
