//! SeaORM adapter for rounds.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::rounds;

pub mod dto;

pub use dto::RoundCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<rounds::Model>, DbErr> {
    rounds::Entity::find_by_id(round_id).one(conn).await
}

pub async fn find_by_event_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_no: i16,
) -> Result<Option<rounds::Model>, DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::EventId.eq(event_id))
        .filter(rounds::Column::RoundNo.eq(round_no))
        .one(conn)
        .await
}

/// Find all rounds for an event (ordered by round_no)
pub async fn find_all_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<rounds::Model>, DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::EventId.eq(event_id))
        .order_by_asc(rounds::Column::RoundNo)
        .all(conn)
        .await
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<rounds::Model, DbErr> {
    let round = rounds::ActiveModel {
        id: NotSet,
        event_id: Set(dto.event_id),
        round_no: Set(dto.round_no),
        group_size: Set(dto.group_size),
        duration_minutes: Set(dto.duration_minutes),
        matcher: Set(dto.matcher),
        started_at: Set(dto.started_at),
        ended_at: Set(None),
    };

    round.insert(conn).await
}

/// Stamp `ended_at` on a round that is still open. Returns rows affected.
pub async fn mark_ended<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_no: i16,
    at: OffsetDateTime,
) -> Result<u64, DbErr> {
    let result = rounds::Entity::update_many()
        .col_expr(rounds::Column::EndedAt, Expr::val(Some(at)).into())
        .filter(rounds::Column::EventId.eq(event_id))
        .filter(rounds::Column::RoundNo.eq(round_no))
        .filter(rounds::Column::EndedAt.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
