//! Matcher trait definition.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PairHistory, ParticipantId, ParticipantProfile, Proposal, Violation};

/// Why a matcher produced no usable partition.
///
/// None of these reach the caller of a round start; the matching service
/// logs them and falls back to the shuffle.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("matcher timed out after {0:?}")]
    Timeout(Duration),
    #[error("matcher unavailable: {0}")]
    Unavailable(String),
    #[error("matcher returned malformed output: {0}")]
    Malformed(String),
    #[error("proposal rejected: {0}")]
    Rejected(#[from] Violation),
}

/// Everything a matcher is told about the round it partitions.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub participants: Vec<ParticipantProfile>,
    pub group_size: usize,
    pub history: PairHistory,
    /// Fixed seed for this round; matchers without one draw from entropy
    pub seed: Option<u64>,
}

impl MatchRequest {
    pub fn new(participants: Vec<ParticipantProfile>, group_size: usize) -> Self {
        Self {
            participants,
            group_size,
            history: PairHistory::new(),
            seed: None,
        }
    }

    pub fn with_history(mut self, history: PairHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }
}

/// A strategy that proposes a partition.
///
/// Output is untrusted: every proposal goes through `domain::validate`
/// before it is stored, whichever implementation produced it.
#[async_trait]
pub trait CandidateMatcher: Send + Sync {
    /// Stable name recorded as the round's provenance.
    fn name(&self) -> &'static str;

    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError>;
}
