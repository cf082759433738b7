//! Round repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::rounds_sea as rounds_adapter;
use crate::domain::RoundClock;
use crate::entities::rounds;
use crate::errors::domain::DomainError;

/// Round domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: i64,
    pub event_id: i64,
    pub round_no: i16,
    pub group_size: i16,
    pub duration_minutes: i16,
    /// Strategy whose partition was stored
    pub matcher: String,
    pub started_at: OffsetDateTime,
    pub ended_at: Option<OffsetDateTime>,
}

impl Round {
    pub fn clock(&self) -> RoundClock {
        RoundClock::new(self.started_at, self.duration_minutes)
    }
}

/// Fields of a round about to be inserted.
#[derive(Debug, Clone)]
pub struct NewRound {
    pub event_id: i64,
    pub round_no: i16,
    pub group_size: i16,
    pub duration_minutes: i16,
    pub matcher: String,
    pub started_at: OffsetDateTime,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<Round>, DomainError> {
    let round = rounds_adapter::find_by_id(conn, round_id).await?;
    Ok(round.map(Round::from))
}

pub async fn find_by_event_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_no: i16,
) -> Result<Option<Round>, DomainError> {
    let round = rounds_adapter::find_by_event_and_round(conn, event_id, round_no).await?;
    Ok(round.map(Round::from))
}

pub async fn find_all_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<Round>, DomainError> {
    let rounds = rounds_adapter::find_all_by_event(conn, event_id).await?;
    Ok(rounds.into_iter().map(Round::from).collect())
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewRound,
) -> Result<Round, DomainError> {
    let dto = rounds_adapter::RoundCreate {
        event_id: new.event_id,
        round_no: new.round_no,
        group_size: new.group_size,
        duration_minutes: new.duration_minutes,
        matcher: new.matcher,
        started_at: new.started_at,
    };
    let round = rounds_adapter::create_round(conn, dto).await?;
    Ok(Round::from(round))
}

/// Stamp `ended_at` if the round is still open; no-op otherwise.
pub async fn mark_ended<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_no: i16,
    at: OffsetDateTime,
) -> Result<bool, DomainError> {
    let rows = rounds_adapter::mark_ended(conn, event_id, round_no, at).await?;
    Ok(rows > 0)
}

impl From<rounds::Model> for Round {
    fn from(model: rounds::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            round_no: model.round_no,
            group_size: model.group_size,
            duration_minutes: model.duration_minutes,
            matcher: model.matcher,
            started_at: model.started_at,
            ended_at: model.ended_at,
        }
    }
}
