//! Mutual and one-way connections derived from directed saves.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::ParticipantId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Connections {
    /// Saved by `participant` and saved `participant` back.
    pub mutual: BTreeSet<ParticipantId>,
    /// Saved by `participant` without reciprocation.
    pub one_way: BTreeSet<ParticipantId>,
}

/// Derive connections for `participant` from `(from, to)` edges of one event.
///
/// Edges may be in any order and may repeat; the round each was recorded in
/// is irrelevant.
pub fn connections_for<I>(participant: ParticipantId, edges: I) -> Connections
where
    I: IntoIterator<Item = (ParticipantId, ParticipantId)>,
{
    let mut saved = BTreeSet::new();
    let mut saved_me = BTreeSet::new();
    for (from, to) in edges {
        if from == to {
            continue;
        }
        if from == participant {
            saved.insert(to);
        } else if to == participant {
            saved_me.insert(from);
        }
    }

    let mutual: BTreeSet<_> = saved.intersection(&saved_me).copied().collect();
    let one_way = saved.difference(&mutual).copied().collect();
    Connections { mutual, one_way }
}
