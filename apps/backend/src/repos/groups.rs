//! Group repository functions, including the event's pairing history.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;

use crate::adapters::groups_sea as groups_adapter;
use crate::domain::{PairHistory, ParticipantId, Proposal};
use crate::entities::round_groups;
use crate::errors::domain::DomainError;

/// Group domain model with its members
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i64,
    pub event_id: i64,
    pub round_id: i64,
    pub group_no: i16,
    pub name: String,
    pub rationale: Option<String>,
    pub member_ids: Vec<ParticipantId>,
}

impl Group {
    fn from_model(model: round_groups::Model, member_ids: Vec<ParticipantId>) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            round_id: model.round_id,
            group_no: model.group_no,
            name: model.name,
            rationale: model.rationale,
            member_ids,
        }
    }
}

/// Persist every group of an accepted proposal. Run inside the round transaction.
pub async fn create_groups<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_id: i64,
    proposal: &Proposal,
) -> Result<Vec<Group>, DomainError> {
    let mut out = Vec::with_capacity(proposal.groups.len());
    for group in &proposal.groups {
        let dto = groups_adapter::GroupCreate {
            event_id,
            round_id,
            group_no: group.group_no,
            name: group.name.clone(),
            rationale: group.rationale.clone(),
            member_ids: group.participant_ids.clone(),
        };
        let model = groups_adapter::create_group_with_members(conn, dto).await?;
        out.push(Group::from_model(model, group.participant_ids.clone()));
    }
    Ok(out)
}

/// Groups of a round (by group_no) with members attached.
pub async fn groups_for_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<Group>, DomainError> {
    let groups = groups_adapter::find_groups_by_round(conn, round_id).await?;
    let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
    let mut members: BTreeMap<i64, Vec<ParticipantId>> = BTreeMap::new();
    for m in groups_adapter::find_members_by_groups(conn, &ids).await? {
        members.entry(m.group_id).or_default().push(m.participant_id);
    }
    Ok(groups
        .into_iter()
        .map(|g| {
            let member_ids = members.remove(&g.id).unwrap_or_default();
            Group::from_model(g, member_ids)
        })
        .collect())
}

/// The participant's group in a round; `None` means sitting out.
pub async fn group_for_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    participant_id: ParticipantId,
) -> Result<Option<Group>, DomainError> {
    let Some(group) =
        groups_adapter::find_group_for_participant(conn, round_id, participant_id).await?
    else {
        return Ok(None);
    };
    let member_ids = groups_adapter::find_members_by_groups(conn, &[group.id])
        .await?
        .into_iter()
        .map(|m| m.participant_id)
        .collect();
    Ok(Some(Group::from_model(group, member_ids)))
}

/// Pairing history over every group of every round of the event so far.
pub async fn pair_history_for_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<PairHistory, DomainError> {
    let mut by_group: BTreeMap<i64, Vec<ParticipantId>> = BTreeMap::new();
    for m in groups_adapter::find_members_by_event(conn, event_id).await? {
        by_group.entry(m.group_id).or_default().push(m.participant_id);
    }
    Ok(PairHistory::from_groups(by_group.values()))
}
