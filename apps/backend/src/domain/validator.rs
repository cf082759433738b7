//! Acceptance gate for partitions proposed by an untrusted matcher.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::partition::MIN_GROUP_SIZE;
use crate::domain::ParticipantId;

/// One group in a proposed partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedGroup {
    pub group_no: i16,
    pub name: String,
    pub participant_ids: Vec<ParticipantId>,
    pub rationale: Option<String>,
}

/// A full partition as proposed by a matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub groups: Vec<ProposedGroup>,
}

/// First hard-constraint violation found in a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("proposal contains no groups")]
    NoGroups,
    #[error("group {group_no} has a blank name")]
    BlankName { group_no: i16 },
    #[error("participants left out: {0:?}")]
    Missing(Vec<ParticipantId>),
    #[error("participants not in the event: {0:?}")]
    Unknown(Vec<ParticipantId>),
    #[error("participants assigned more than once: {0:?}")]
    Duplicated(Vec<ParticipantId>),
    #[error("group {group_no} is empty")]
    EmptyGroup { group_no: i16 },
    #[error("group {group_no} has {size} members, minimum is {min}")]
    Undersized { group_no: i16, size: usize, min: usize },
    #[error("group {group_no} has {size} members, limit is {max}")]
    Oversized { group_no: i16, size: usize, max: usize },
}

/// Check shape, then exact coverage, then size bounds; stop at the first failure.
pub fn validate(
    proposal: &Proposal,
    expected: &[ParticipantId],
    group_size: usize,
) -> Result<(), Violation> {
    if proposal.groups.is_empty() {
        return Err(Violation::NoGroups);
    }
    if let Some(g) = proposal.groups.iter().find(|g| g.name.trim().is_empty()) {
        return Err(Violation::BlankName {
            group_no: g.group_no,
        });
    }

    let expected_set: BTreeSet<ParticipantId> = expected.iter().copied().collect();
    let mut seen: BTreeMap<ParticipantId, usize> = BTreeMap::new();
    for id in proposal.groups.iter().flat_map(|g| &g.participant_ids) {
        *seen.entry(*id).or_default() += 1;
    }

    let missing: Vec<_> = expected_set
        .iter()
        .filter(|id| !seen.contains_key(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(Violation::Missing(missing));
    }

    let unknown: Vec<_> = seen
        .keys()
        .filter(|id| !expected_set.contains(id))
        .copied()
        .collect();
    if !unknown.is_empty() {
        return Err(Violation::Unknown(unknown));
    }

    let duplicated: Vec<_> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| *id)
        .collect();
    if !duplicated.is_empty() {
        return Err(Violation::Duplicated(duplicated));
    }

    // A lone participant is only valid when they are the whole event
    let min = if expected_set.len() >= MIN_GROUP_SIZE {
        MIN_GROUP_SIZE
    } else {
        1
    };
    let max = group_size + 1;
    for g in &proposal.groups {
        let size = g.participant_ids.len();
        if size == 0 {
            return Err(Violation::EmptyGroup {
                group_no: g.group_no,
            });
        }
        if size < min {
            return Err(Violation::Undersized {
                group_no: g.group_no,
                size,
                min,
            });
        }
        if size > max {
            return Err(Violation::Oversized {
                group_no: g.group_no,
                size,
                max,
            });
        }
    }

    Ok(())
}
