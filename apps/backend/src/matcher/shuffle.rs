//! Shuffle matcher: the fallback that always yields a valid partition.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::*;

use super::trait_def::{CandidateMatcher, MatchError, MatchRequest};
use crate::domain::{shuffle_partition, ParticipantId, Proposal, ProposedGroup};

pub const FALLBACK_RATIONALE: &str = "Random assignment (fallback)";

/// Fisher-Yates shuffle followed by slicing along the size plan.
///
/// A request seed takes precedence over the matcher's own RNG so a given
/// round can be replayed exactly.
pub struct ShuffleMatcher {
    rng: Mutex<StdRng>,
}

impl ShuffleMatcher {
    pub const NAME: &'static str = "shuffle";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Infallible partition, used directly when another matcher fails.
    pub fn partition(&self, request: &MatchRequest) -> Proposal {
        let ids = request.participant_ids();
        let groups = match request.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                shuffle_partition(&ids, request.group_size, &mut rng)
            }
            None => shuffle_partition(&ids, request.group_size, &mut *self.rng.lock()),
        };
        numbered_proposal(groups, FALLBACK_RATIONALE)
    }
}

impl Default for ShuffleMatcher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl CandidateMatcher for ShuffleMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError> {
        Ok(self.partition(request))
    }
}

/// Wrap member lists as "Group 1", "Group 2", ... with one shared rationale.
pub(crate) fn numbered_proposal(groups: Vec<Vec<ParticipantId>>, rationale: &str) -> Proposal {
    Proposal {
        groups: groups
            .into_iter()
            .zip(1i16..)
            .map(|(participant_ids, group_no)| ProposedGroup {
                group_no,
                name: format!("Group {group_no}"),
                participant_ids,
                rationale: Some(rationale.to_string()),
            })
            .collect(),
    }
}
