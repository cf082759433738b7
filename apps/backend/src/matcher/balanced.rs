//! In-process optimizing matcher.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::*;
use tokio::task;
use tracing::debug;

use super::shuffle::numbered_proposal;
use super::trait_def::{CandidateMatcher, MatchError, MatchRequest};
use crate::domain::partition::{improve_by_swaps, score_partition};
use crate::domain::{shuffle_partition, Affiliations, Proposal};

/// Upper bound on local-search passes per round.
pub const MAX_SWAP_PASSES: usize = 8;

/// Shuffle, then pairwise swaps that strictly lower the partition score.
///
/// Repeat pairings are weighed before shared affiliations; sizes come from
/// the shuffle plan and never change during the search. The search runs on
/// the blocking pool so the matching service's timeout can abandon it.
pub struct BalancedMatcher {
    rng: Mutex<StdRng>,
}

impl BalancedMatcher {
    pub const NAME: &'static str = "balanced";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl CandidateMatcher for BalancedMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError> {
        let ids = request.participant_ids();
        let mut groups = match request.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                shuffle_partition(&ids, request.group_size, &mut rng)
            }
            None => shuffle_partition(&ids, request.group_size, &mut *self.rng.lock()),
        };

        let affiliations = Affiliations::from_pairs(
            request
                .participants
                .iter()
                .map(|p| (p.id, p.company.as_str())),
        );
        let history = request.history.clone();

        let (groups, before, after) = task::spawn_blocking(move || {
            let before = score_partition(&groups, &history, &affiliations);
            let after = improve_by_swaps(&mut groups, &history, &affiliations, MAX_SWAP_PASSES);
            (groups, before, after)
        })
        .await
        .map_err(|e| MatchError::Unavailable(format!("local search aborted: {e}")))?;
        debug!(
            repeat_before = before.repeat_pairs,
            repeat_after = after.repeat_pairs,
            same_company_after = after.same_affiliation_pairs,
            "Balanced matcher local search finished"
        );

        let rationale = format!(
            "Balanced assignment: {} repeat pairs, {} same-company pairs",
            after.repeat_pairs, after.same_affiliation_pairs
        );
        Ok(numbered_proposal(groups, &rationale))
    }
}
