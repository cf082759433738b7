use async_trait::async_trait;
use mingle::domain::{Proposal, ProposedGroup};
use mingle::matcher::{CandidateMatcher, MatchError, MatchRequest};

/// Puts everyone into a single group, oversized for any realistic request.
pub struct OneBigGroup;

#[async_trait]
impl CandidateMatcher for OneBigGroup {
    fn name(&self) -> &'static str {
        "one-big-group"
    }

    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError> {
        Ok(Proposal {
            groups: vec![ProposedGroup {
                group_no: 1,
                name: "Everyone".to_string(),
                participant_ids: request.participant_ids(),
                rationale: None,
            }],
        })
    }
}

/// Gives every participant a group of their own.
pub struct Singletons;

#[async_trait]
impl CandidateMatcher for Singletons {
    fn name(&self) -> &'static str {
        "singletons"
    }

    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError> {
        let groups = request
            .participant_ids()
            .into_iter()
            .zip(1i16..)
            .map(|(id, no)| ProposedGroup {
                group_no: no,
                name: format!("Solo {no}"),
                participant_ids: vec![id],
                rationale: None,
            })
            .collect();
        Ok(Proposal { groups })
    }
}

/// Always unavailable.
pub struct Offline;

#[async_trait]
impl CandidateMatcher for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn propose(&self, _request: &MatchRequest) -> Result<Proposal, MatchError> {
        Err(MatchError::Unavailable("connection refused".to_string()))
    }
}
