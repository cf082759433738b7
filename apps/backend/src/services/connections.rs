//! Contact saves and the connections derived from them.

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::domain::{self, Connections, ParticipantId};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::events;
use crate::repos::participants::{self, Participant};
use crate::repos::rounds;
use crate::repos::saves;

/// A directed "I want to stay in touch" edge.
#[derive(Debug, Clone, Copy)]
pub struct SaveContact {
    pub event_id: i64,
    pub round_id: i64,
    pub from: ParticipantId,
    pub to: ParticipantId,
}

/// A participant's connections with the other side resolved.
#[derive(Debug, Clone)]
pub struct ConnectionsView {
    pub participant: Participant,
    pub mutual: Vec<Participant>,
    pub one_way: Vec<Participant>,
}

pub struct ConnectionService;

impl ConnectionService {
    pub fn new() -> Self {
        Self
    }

    /// Record `from -> to`. Repeating a save is a no-op; returns whether a row was written.
    pub async fn save_contact<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        save: SaveContact,
    ) -> Result<bool, DomainError> {
        if save.from == save.to {
            return Err(DomainError::validation(
                ValidationKind::SelfSave,
                "A participant cannot save themselves",
            ));
        }

        events::require_event(conn, save.event_id).await?;
        let round = rounds::find_by_id(conn, save.round_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Round,
                    format!("Round {} not found", save.round_id),
                )
            })?;
        if round.event_id != save.event_id {
            return Err(DomainError::validation(
                ValidationKind::NotInEvent,
                format!("Round {} belongs to another event", save.round_id),
            ));
        }
        require_member(conn, save.event_id, save.from).await?;
        require_member(conn, save.event_id, save.to).await?;

        let created =
            saves::record(conn, save.event_id, save.round_id, save.from, save.to).await?;
        info!(
            event_id = save.event_id,
            round_no = round.round_no,
            from = save.from,
            to = save.to,
            created,
            "Contact saved"
        );
        Ok(created)
    }

    /// Remove `from -> to` whichever round recorded it. Idempotent.
    pub async fn retract_contact<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        event_id: i64,
        from: ParticipantId,
        to: ParticipantId,
    ) -> Result<bool, DomainError> {
        if from == to {
            return Err(DomainError::validation(
                ValidationKind::SelfSave,
                "A participant cannot save themselves",
            ));
        }
        events::require_event(conn, event_id).await?;

        let removed = saves::retract(conn, event_id, from, to).await?;
        debug!(event_id, from, to, removed, "Contact retracted");
        Ok(removed)
    }

    /// Mutual and one-way connections of a participant across the whole event.
    pub async fn connections_for<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        participant_id: ParticipantId,
    ) -> Result<ConnectionsView, DomainError> {
        let participant = participants::find_by_id(conn, participant_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Participant,
                    format!("Participant {participant_id} not found"),
                )
            })?;

        let edges = saves::edges_touching(conn, participant.event_id, participant_id).await?;
        let Connections { mutual, one_way } = domain::connections_for(participant_id, edges);

        let roster = participants::list_by_event(conn, participant.event_id).await?;
        let pick = |ids: &std::collections::BTreeSet<ParticipantId>| -> Vec<Participant> {
            roster
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect()
        };

        Ok(ConnectionsView {
            mutual: pick(&mutual),
            one_way: pick(&one_way),
            participant,
        })
    }
}

impl Default for ConnectionService {
    fn default() -> Self {
        Self::new()
    }
}

async fn require_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    participant_id: ParticipantId,
) -> Result<(), DomainError> {
    match participants::find_by_id(conn, participant_id).await? {
        Some(p) if p.event_id == event_id => Ok(()),
        _ => Err(DomainError::validation(
            ValidationKind::NotInEvent,
            format!("Participant {participant_id} is not in event {event_id}"),
        )),
    }
}
