//! Domain layer: pure grouping-engine logic, no I/O.

pub mod clock;
pub mod connections;
pub mod lifecycle;
pub mod pair_history;
pub mod partition;
pub mod validator;


use serde::Serialize;

pub use clock::RoundClock;
pub use connections::{connections_for, Connections};
pub use lifecycle::{EventStatus, RoundPhase, RoundTransition};
pub use pair_history::PairHistory;
pub use partition::{plan_group_sizes, shuffle_partition, Affiliations, PartitionScore};
pub use validator::{validate, Proposal, ProposedGroup, Violation};

pub type ParticipantId = i64;

/// What a matcher may know about a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantProfile {
    pub id: ParticipantId,
    pub name: String,
    pub company: String,
    pub role: String,
    pub offers: Vec<String>,
    pub seeks: Vec<String>,
    pub industries: Vec<String>,
}

impl ParticipantProfile {
    /// Bare profile, mostly for tests and fallbacks.
    pub fn named(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company: String::new(),
            role: String::new(),
            offers: Vec::new(),
            seeks: Vec::new(),
            industries: Vec::new(),
        }
    }
}

/// Derive a per-round seed from a configured base seed.
///
/// Same base, event and round always give the same seed; different rounds
/// of one event shuffle differently.
pub fn derive_round_seed(base: u64, event_id: i64, round_no: i16) -> u64 {
    base.wrapping_add((event_id as u64).wrapping_mul(1_000_003))
        .wrapping_add((round_no as u64).wrapping_mul(10_007))
}
