//! SeaORM adapter for events - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::events;
use crate::infra::db_errors::{EVENT_NOT_FOUND_PREFIX, OPTIMISTIC_LOCK_PREFIX};

pub mod dto;

pub use dto::{EventAdvance, EventCreate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find_by_id(event_id).one(conn).await
}

/// Find an event that must exist; a missing row becomes a structured not-found error.
pub async fn require_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<events::Model, DbErr> {
    find_by_id(conn, event_id)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("{EVENT_NOT_FOUND_PREFIX}{event_id}")))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find()
        .filter(events::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn create_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: EventCreate,
) -> Result<events::Model, DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let event = events::ActiveModel {
        id: NotSet,
        code: Set(dto.code),
        name: Set(dto.name),
        total_rounds: Set(dto.total_rounds),
        status: Set(events::EventStatus::Lobby),
        current_round: Set(0),
        organizer_email: Set(dto.organizer_email),
        created_at: Set(now),
        updated_at: Set(now),
        lock_version: Set(1),
    };

    event.insert(conn).await
}

/// Compare-and-set on `(current_round, lock_version)`, then refetch.
///
/// Zero affected rows means either the event is gone or another writer got
/// there first; the two cases are told apart by a follow-up read.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: EventAdvance,
) -> Result<events::Model, DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = events::Entity::update_many()
        .col_expr(events::Column::CurrentRound, Expr::val(dto.next_round).into())
        .col_expr(events::Column::Status, Expr::val(dto.status).into())
        .col_expr(events::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            events::Column::LockVersion,
            Expr::col(events::Column::LockVersion).add(1),
        )
        .filter(events::Column::Id.eq(dto.id))
        .filter(events::Column::CurrentRound.eq(dto.expected_round))
        .filter(events::Column::LockVersion.eq(dto.expected_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let current = require_event(conn, dto.id).await?;
        return Err(DbErr::Custom(format!(
            "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
            dto.expected_lock_version, current.lock_version
        )));
    }

    require_event(conn, dto.id).await
}
