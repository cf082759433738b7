//! Oracle -> validator -> fallback pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::engine::{EngineConfig, MatcherKind};
use crate::domain::{derive_round_seed, validate, Proposal};
use crate::error::AppError;
use crate::matcher::{registry, CandidateMatcher, MatchError, MatchRequest, ShuffleMatcher};

/// Accepted partition plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub proposal: Proposal,
    /// Name of the strategy whose proposal was kept
    pub matcher: &'static str,
    /// True when a configured oracle failed and the shuffle stood in
    pub fell_back: bool,
}

/// Runs the configured matcher and guarantees a valid partition.
///
/// Oracle proposals are all-or-nothing: any timeout, transport failure,
/// parse failure or validator rejection discards the whole proposal and the
/// seeded shuffle takes over.
pub struct MatchingService {
    oracle: Option<Arc<dyn CandidateMatcher>>,
    fallback: ShuffleMatcher,
    timeout: Duration,
    seed: Option<u64>,
}

impl MatchingService {
    pub fn new(
        oracle: Option<Arc<dyn CandidateMatcher>>,
        timeout: Duration,
        seed: Option<u64>,
    ) -> Self {
        Self {
            oracle,
            fallback: ShuffleMatcher::new(seed),
            timeout,
            seed,
        }
    }

    /// Build from engine configuration. The shuffle kind needs no oracle.
    pub fn from_config(config: &EngineConfig) -> Result<Self, AppError> {
        let oracle = match config.matcher {
            MatcherKind::Shuffle => None,
            _ => Some(registry::build(config).map_err(|e| AppError::config(e.to_string()))?),
        };
        Ok(Self::new(oracle, config.oracle_timeout, config.seed))
    }

    pub fn oracle_name(&self) -> Option<&'static str> {
        self.oracle.as_ref().map(|o| o.name())
    }

    /// Per-round seed when a base seed is configured.
    pub fn round_seed(&self, event_id: i64, round_no: i16) -> Option<u64> {
        self.seed
            .map(|base| derive_round_seed(base, event_id, round_no))
    }

    /// Produce a partition of every participant in the request.
    pub async fn partition(&self, request: &MatchRequest) -> MatchOutcome {
        if let Some(oracle) = &self.oracle {
            match self.consult(oracle.as_ref(), request).await {
                Ok(proposal) => {
                    return MatchOutcome {
                        proposal: renumber(proposal),
                        matcher: oracle.name(),
                        fell_back: false,
                    };
                }
                Err(err) => {
                    warn!(
                        matcher = oracle.name(),
                        participants = request.participants.len(),
                        group_size = request.group_size,
                        error = %err,
                        "Matcher proposal discarded, using shuffle fallback"
                    );
                }
            }
        }

        let proposal = self.fallback.partition(request);
        info!(
            groups = proposal.groups.len(),
            participants = request.participants.len(),
            "Shuffle partition produced"
        );
        MatchOutcome {
            proposal,
            matcher: ShuffleMatcher::NAME,
            fell_back: self.oracle.is_some(),
        }
    }

    async fn consult(
        &self,
        oracle: &dyn CandidateMatcher,
        request: &MatchRequest,
    ) -> Result<Proposal, MatchError> {
        let proposal = timeout(self.timeout, oracle.propose(request))
            .await
            .map_err(|_| MatchError::Timeout(self.timeout))??;
        validate(&proposal, &request.participant_ids(), request.group_size)?;
        Ok(proposal)
    }
}

/// Stored group numbers are always 1..=k in proposal order.
fn renumber(mut proposal: Proposal) -> Proposal {
    for (group, no) in proposal.groups.iter_mut().zip(1i16..) {
        group.group_no = no;
    }
    proposal
}
