//! Who has already shared a group with whom.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::ParticipantId;

/// Symmetric "has met" relation built from past group memberships.
///
/// Recording a group adds every unordered pair of its members in both
/// directions, so `have_met(a, b) == have_met(b, a)` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairHistory {
    partners: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

impl PairHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any sequence of groups (one slice of member ids per group).
    pub fn from_groups<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: AsRef<[ParticipantId]>,
    {
        let mut history = Self::new();
        for group in groups {
            history.record_group(group.as_ref());
        }
        history
    }

    pub fn record_group(&mut self, members: &[ParticipantId]) {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if a == b {
                    continue;
                }
                self.partners.entry(a).or_default().insert(b);
                self.partners.entry(b).or_default().insert(a);
            }
        }
    }

    pub fn have_met(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.partners.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Previous partners of `participant`, ascending.
    pub fn partners_of(&self, participant: ParticipantId) -> Vec<ParticipantId> {
        let mut out: Vec<_> = self
            .partners
            .get(&participant)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Number of unordered pairs inside `group` that have met before.
    pub fn repeat_pairs_in(&self, group: &[ParticipantId]) -> usize {
        let mut count = 0;
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                if self.have_met(a, b) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Stable, ordered view for serialization and logging.
    pub fn to_sorted_map(&self) -> BTreeMap<ParticipantId, BTreeSet<ParticipantId>> {
        self.partners
            .iter()
            .map(|(k, v)| (*k, v.iter().copied().collect()))
            .collect()
    }
}
