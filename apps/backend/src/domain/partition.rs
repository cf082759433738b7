//! Group sizing, partition scoring and the two in-process partitioners.
//!
//! Sizing never drops or duplicates anyone; the soft goals (avoid repeat
//! pairs, then avoid same-affiliation pairs) are only ever traded against
//! each other, never against coverage.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::pair_history::PairHistory;
use crate::domain::ParticipantId;

/// Smallest group size a round may request.
pub const MIN_GROUP_SIZE: usize = 2;

/// Group sizes for `n` participants at target size `g`.
///
/// The sizes always sum to `n`, never exceed `g + 1`, and are at least 2
/// whenever `n >= 2`. When `n <= g + 1` everyone shares one group. Otherwise
/// contiguous slicing is used if its remainder fits (0, 1 absorbed by the last
/// chunk, or a single trailing group of `g - 1`); failing that, sizes are
/// spread evenly over a group count that keeps them within `g ± 1`. If no such
/// count exists the fewest groups that respect the `g + 1` cap are used.
///
/// Keeping every size within `g ± 1` takes priority over having only one
/// group off target: 13 at 5 plans `[5, 4, 4]`, not `[5, 5, 3]`.
pub fn plan_group_sizes(n: usize, g: usize) -> Vec<usize> {
    let g = g.max(MIN_GROUP_SIZE);
    if n == 0 {
        return Vec::new();
    }
    if n <= g + 1 {
        return vec![n];
    }

    let full = n / g;
    let rem = n % g;
    if rem == 0 {
        return vec![g; full];
    }
    if rem == 1 {
        let mut sizes = vec![g; full];
        if let Some(last) = sizes.last_mut() {
            *last += 1;
        }
        return sizes;
    }
    if rem == g - 1 {
        let mut sizes = vec![g; full];
        sizes.push(g - 1);
        return sizes;
    }

    let lo = n.div_ceil(g + 1);
    let hi = n / (g - 1);
    let best = (lo..=hi).min_by_key(|&k| (off_target_groups(n, k, g), k));
    balanced_sizes(n, best.unwrap_or(lo))
}

fn balanced_sizes(n: usize, k: usize) -> Vec<usize> {
    let k = k.max(1);
    let base = n / k;
    let extra = n % k;
    (0..k).map(|i| if i < extra { base + 1 } else { base }).collect()
}

fn off_target_groups(n: usize, k: usize, g: usize) -> usize {
    balanced_sizes(n, k).iter().filter(|&&s| s != g).count()
}

/// Cut `ordered` into consecutive chunks following `sizes`.
pub fn slice_into_groups(ordered: &[ParticipantId], sizes: &[usize]) -> Vec<Vec<ParticipantId>> {
    let mut groups = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for &size in sizes {
        let end = (start + size).min(ordered.len());
        groups.push(ordered[start..end].to_vec());
        start = end;
    }
    groups
}

/// Shuffle then slice. Terminates for every input and covers everyone once.
pub fn shuffle_partition<R: Rng + ?Sized>(
    participants: &[ParticipantId],
    group_size: usize,
    rng: &mut R,
) -> Vec<Vec<ParticipantId>> {
    let mut order = participants.to_vec();
    order.shuffle(rng);
    slice_into_groups(&order, &plan_group_sizes(order.len(), group_size))
}

/// Partition quality; smaller is better and fields compare in priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartitionScore {
    pub repeat_pairs: usize,
    pub same_affiliation_pairs: usize,
}

impl std::ops::Add for PartitionScore {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            repeat_pairs: self.repeat_pairs + rhs.repeat_pairs,
            same_affiliation_pairs: self.same_affiliation_pairs + rhs.same_affiliation_pairs,
        }
    }
}

/// Normalized affiliation per participant. Blank companies are simply absent.
#[derive(Debug, Clone, Default)]
pub struct Affiliations(HashMap<ParticipantId, String>);

impl Affiliations {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, S)>,
        S: AsRef<str>,
    {
        let map = pairs
            .into_iter()
            .filter_map(|(id, company)| {
                let norm = company.as_ref().trim().to_lowercase();
                (!norm.is_empty()).then_some((id, norm))
            })
            .collect();
        Self(map)
    }

    pub fn same(&self, a: ParticipantId, b: ParticipantId) -> bool {
        match (self.0.get(&a), self.0.get(&b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

/// Cost contributed by pairing `member` with each of `others` (skipping itself).
fn member_cost(
    member: ParticipantId,
    others: &[ParticipantId],
    skip: Option<ParticipantId>,
    history: &PairHistory,
    affiliations: &Affiliations,
) -> PartitionScore {
    let mut score = PartitionScore::default();
    for &other in others {
        if other == member || Some(other) == skip {
            continue;
        }
        if history.have_met(member, other) {
            score.repeat_pairs += 1;
        }
        if affiliations.same(member, other) {
            score.same_affiliation_pairs += 1;
        }
    }
    score
}

pub fn score_group(
    group: &[ParticipantId],
    history: &PairHistory,
    affiliations: &Affiliations,
) -> PartitionScore {
    let mut score = PartitionScore::default();
    for (i, &a) in group.iter().enumerate() {
        score = score + member_cost(a, &group[i + 1..], None, history, affiliations);
    }
    score
}

pub fn score_partition(
    groups: &[Vec<ParticipantId>],
    history: &PairHistory,
    affiliations: &Affiliations,
) -> PartitionScore {
    groups
        .iter()
        .map(|g| score_group(g, history, affiliations))
        .fold(PartitionScore::default(), |acc, s| acc + s)
}

/// Pairwise-swap local search.
///
/// Each pass tries every cross-group swap and keeps those that strictly lower
/// the score; stops after `max_passes` or the first pass without improvement.
/// Group sizes never change. Returns the final score.
pub fn improve_by_swaps(
    groups: &mut [Vec<ParticipantId>],
    history: &PairHistory,
    affiliations: &Affiliations,
    max_passes: usize,
) -> PartitionScore {
    for _ in 0..max_passes {
        let mut improved = false;
        for a in 0..groups.len() {
            for b in (a + 1)..groups.len() {
                for i in 0..groups[a].len() {
                    for j in 0..groups[b].len() {
                        let x = groups[a][i];
                        let y = groups[b][j];
                        let before = member_cost(x, &groups[a], None, history, affiliations)
                            + member_cost(y, &groups[b], None, history, affiliations);
                        let after = member_cost(x, &groups[b], Some(y), history, affiliations)
                            + member_cost(y, &groups[a], Some(x), history, affiliations);
                        if after < before {
                            groups[a][i] = y;
                            groups[b][j] = x;
                            improved = true;
                        }
                    }
                }
            }
        }
        if !improved {
            break;
        }
    }
    score_partition(groups, history, affiliations)
}
