//! SeaORM adapter for saves (directed contact edges).

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::saves;

pub mod dto;

pub use dto::SaveCreate;

/// Insert the edge unless it already exists. Returns true when a row was written.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SaveCreate,
) -> Result<bool, DbErr> {
    let save = saves::ActiveModel {
        id: NotSet,
        event_id: Set(dto.event_id),
        round_id: Set(dto.round_id),
        from_participant_id: Set(dto.from_participant_id),
        to_participant_id: Set(dto.to_participant_id),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    let rows = saves::Entity::insert(save)
        .on_conflict(
            OnConflict::columns([
                saves::Column::EventId,
                saves::Column::FromParticipantId,
                saves::Column::ToParticipantId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(rows > 0)
}

/// Delete the directed edge whichever round recorded it. Returns rows affected.
pub async fn delete_edge<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    from_participant_id: i64,
    to_participant_id: i64,
) -> Result<u64, DbErr> {
    let result = saves::Entity::delete_many()
        .filter(saves::Column::EventId.eq(event_id))
        .filter(saves::Column::FromParticipantId.eq(from_participant_id))
        .filter(saves::Column::ToParticipantId.eq(to_participant_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Every edge touching a participant, in either direction.
pub async fn find_touching<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    participant_id: i64,
) -> Result<Vec<saves::Model>, DbErr> {
    saves::Entity::find()
        .filter(saves::Column::EventId.eq(event_id))
        .filter(
            Condition::any()
                .add(saves::Column::FromParticipantId.eq(participant_id))
                .add(saves::Column::ToParticipantId.eq(participant_id)),
        )
        .order_by_asc(saves::Column::Id)
        .all(conn)
        .await
}

/// All edges of an event.
pub async fn find_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<saves::Model>, DbErr> {
    saves::Entity::find()
        .filter(saves::Column::EventId.eq(event_id))
        .order_by_asc(saves::Column::Id)
        .all(conn)
        .await
}
