//! Save repository functions (directed contact edges).

use sea_orm::ConnectionTrait;

use crate::adapters::saves_sea as saves_adapter;
use crate::domain::ParticipantId;
use crate::errors::domain::DomainError;

/// Record `from -> to` unless present. Returns true when newly written.
pub async fn record<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    round_id: i64,
    from: ParticipantId,
    to: ParticipantId,
) -> Result<bool, DomainError> {
    let dto = saves_adapter::SaveCreate {
        event_id,
        round_id,
        from_participant_id: from,
        to_participant_id: to,
    };
    Ok(saves_adapter::insert_if_absent(conn, dto).await?)
}

/// Remove `from -> to` whichever round recorded it. Returns true when a row went away.
pub async fn retract<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    from: ParticipantId,
    to: ParticipantId,
) -> Result<bool, DomainError> {
    let rows = saves_adapter::delete_edge(conn, event_id, from, to).await?;
    Ok(rows > 0)
}

/// `(from, to)` pairs of every edge touching the participant.
pub async fn edges_touching<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    participant_id: ParticipantId,
) -> Result<Vec<(ParticipantId, ParticipantId)>, DomainError> {
    Ok(saves_adapter::find_touching(conn, event_id, participant_id)
        .await?
        .into_iter()
        .map(|s| (s.from_participant_id, s.to_participant_id))
        .collect())
}

/// Number of distinct edges recorded in the event.
pub async fn count_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<usize, DomainError> {
    Ok(saves_adapter::find_by_event(conn, event_id).await?.len())
}
