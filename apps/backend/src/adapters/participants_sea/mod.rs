//! SeaORM adapter for participants.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::participants;

pub mod dto;

pub use dto::ParticipantCreate;

pub async fn create_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ParticipantCreate,
) -> Result<participants::Model, DbErr> {
    let participant = participants::ActiveModel {
        id: NotSet,
        event_id: Set(dto.event_id),
        name: Set(dto.name),
        company: Set(dto.company),
        role: Set(dto.role),
        offers: Set(dto.offers_json),
        seeks: Set(dto.seeks_json),
        industries: Set(dto.industries_json),
        bio: Set(dto.bio),
        joined_at: Set(time::OffsetDateTime::now_utc()),
    };

    participant.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
) -> Result<Option<participants::Model>, DbErr> {
    participants::Entity::find_by_id(participant_id)
        .one(conn)
        .await
}

/// All participants of an event in join order.
pub async fn list_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<participants::Model>, DbErr> {
    participants::Entity::find()
        .filter(participants::Column::EventId.eq(event_id))
        .order_by_asc(participants::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<u64, DbErr> {
    participants::Entity::find()
        .filter(participants::Column::EventId.eq(event_id))
        .count(conn)
        .await
}
