//! SeaORM adapter for round groups and their members.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::entities::{group_members, round_groups};

pub mod dto;

pub use dto::GroupCreate;

/// Insert a group row and its member rows.
///
/// Callers run this inside the round-start transaction so a failure on any
/// member leaves no partial group behind.
pub async fn create_group_with_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GroupCreate,
) -> Result<round_groups::Model, DbErr> {
    let group = round_groups::ActiveModel {
        id: NotSet,
        event_id: Set(dto.event_id),
        round_id: Set(dto.round_id),
        group_no: Set(dto.group_no),
        name: Set(dto.name),
        rationale: Set(dto.rationale),
    }
    .insert(conn)
    .await?;

    if !dto.member_ids.is_empty() {
        let members = dto
            .member_ids
            .iter()
            .map(|pid| group_members::ActiveModel {
                id: NotSet,
                group_id: Set(group.id),
                participant_id: Set(*pid),
            });
        group_members::Entity::insert_many(members)
            .exec_without_returning(conn)
            .await?;
    }

    Ok(group)
}

/// Groups of a round ordered by group_no.
pub async fn find_groups_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<round_groups::Model>, DbErr> {
    round_groups::Entity::find()
        .filter(round_groups::Column::RoundId.eq(round_id))
        .order_by_asc(round_groups::Column::GroupNo)
        .all(conn)
        .await
}

/// Members of the given groups, ordered by group then insertion.
pub async fn find_members_by_groups<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    group_ids: &[i64],
) -> Result<Vec<group_members::Model>, DbErr> {
    if group_ids.is_empty() {
        return Ok(Vec::new());
    }
    group_members::Entity::find()
        .filter(group_members::Column::GroupId.is_in(group_ids.iter().copied()))
        .order_by_asc(group_members::Column::GroupId)
        .order_by_asc(group_members::Column::Id)
        .all(conn)
        .await
}

/// Every membership row of every group of an event.
pub async fn find_members_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<group_members::Model>, DbErr> {
    group_members::Entity::find()
        .join(JoinType::InnerJoin, group_members::Relation::RoundGroup.def())
        .filter(round_groups::Column::EventId.eq(event_id))
        .order_by_asc(group_members::Column::GroupId)
        .order_by_asc(group_members::Column::Id)
        .all(conn)
        .await
}

/// The group a participant sits in for a round, if any.
pub async fn find_group_for_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    participant_id: i64,
) -> Result<Option<round_groups::Model>, DbErr> {
    round_groups::Entity::find()
        .join(JoinType::InnerJoin, round_groups::Relation::GroupMembers.def())
        .filter(round_groups::Column::RoundId.eq(round_id))
        .filter(group_members::Column::ParticipantId.eq(participant_id))
        .one(conn)
        .await
}
