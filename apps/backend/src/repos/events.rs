//! Event repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::events_sea as events_adapter;
use crate::domain::EventStatus;
use crate::entities::events;
use crate::errors::domain::DomainError;

/// Event domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub total_rounds: i16,
    pub status: EventStatus,
    pub current_round: i16,
    pub organizer_email: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub lock_version: i32,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Option<Event>, DomainError> {
    let event = events_adapter::find_by_id(conn, event_id).await?;
    Ok(event.map(Event::from))
}

/// Load an event that must exist (NotFound otherwise).
pub async fn require_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Event, DomainError> {
    let event = events_adapter::require_event(conn, event_id).await?;
    Ok(Event::from(event))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Event>, DomainError> {
    let event = events_adapter::find_by_code(conn, code).await?;
    Ok(event.map(Event::from))
}

pub async fn create_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: String,
    name: String,
    total_rounds: i16,
    organizer_email: Option<String>,
) -> Result<Event, DomainError> {
    let dto = events_adapter::EventCreate {
        code,
        name,
        total_rounds,
        organizer_email,
    };
    let event = events_adapter::create_event(conn, dto).await?;
    Ok(Event::from(event))
}

/// Conditionally move the round counter; Conflict when someone else moved it first.
pub async fn advance<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event: &Event,
    next_round: i16,
    status: EventStatus,
) -> Result<Event, DomainError> {
    let dto = events_adapter::EventAdvance {
        id: event.id,
        expected_round: event.current_round,
        expected_lock_version: event.lock_version,
        next_round,
        status: status.into(),
    };
    let updated = events_adapter::advance(conn, dto).await?;
    Ok(Event::from(updated))
}

impl From<events::EventStatus> for EventStatus {
    fn from(status: events::EventStatus) -> Self {
        match status {
            events::EventStatus::Lobby => EventStatus::Lobby,
            events::EventStatus::Active => EventStatus::Active,
            events::EventStatus::Ended => EventStatus::Ended,
        }
    }
}

impl From<EventStatus> for events::EventStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Lobby => events::EventStatus::Lobby,
            EventStatus::Active => events::EventStatus::Active,
            EventStatus::Ended => events::EventStatus::Ended,
        }
    }
}

impl From<events::Model> for Event {
    fn from(model: events::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            total_rounds: model.total_rounds,
            status: model.status.into(),
            current_round: model.current_round,
            organizer_email: model.organizer_email,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lock_version: model.lock_version,
        }
    }
}
