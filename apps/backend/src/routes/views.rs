//! JSON shapes shared by the route handlers.

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::EventStatus;
use crate::error::AppError;
use crate::repos::events::Event;
use crate::repos::groups::Group;
use crate::repos::participants::Participant;
use crate::repos::rounds::Round;

pub(crate) fn rfc3339(at: OffsetDateTime) -> Result<String, AppError> {
    at.format(&Rfc3339)
        .map_err(|e| AppError::internal(format!("Failed to format timestamp: {e}")))
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub total_rounds: i16,
    pub status: EventStatus,
    pub current_round: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    pub created_at: String,
}

impl EventView {
    pub fn from_event(event: Event) -> Result<Self, AppError> {
        Ok(Self {
            created_at: rfc3339(event.created_at)?,
            id: event.id,
            code: event.code,
            name: event.name,
            total_rounds: event.total_rounds,
            status: event.status,
            current_round: event.current_round,
            organizer_email: event.organizer_email,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ParticipantView {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub company: String,
    pub role: String,
    pub offers: Vec<String>,
    pub seeks: Vec<String>,
    pub industries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub joined_at: String,
}

impl ParticipantView {
    pub fn from_participant(p: Participant) -> Result<Self, AppError> {
        Ok(Self {
            joined_at: rfc3339(p.joined_at)?,
            id: p.id,
            event_id: p.event_id,
            name: p.name,
            company: p.company,
            role: p.role,
            offers: p.offers,
            seeks: p.seeks,
            industries: p.industries,
            bio: p.bio,
        })
    }

    pub fn list(participants: Vec<Participant>) -> Result<Vec<Self>, AppError> {
        participants
            .into_iter()
            .map(Self::from_participant)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub id: i64,
    pub event_id: i64,
    pub round_no: i16,
    pub group_size: i16,
    pub duration_minutes: i16,
    pub matcher: String,
    /// Absolute start; clients derive the countdown from this and `duration_minutes`
    pub started_at: String,
    pub ends_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

impl RoundView {
    pub fn from_round(round: Round) -> Result<Self, AppError> {
        Ok(Self {
            started_at: rfc3339(round.started_at)?,
            ends_at: rfc3339(round.clock().ends_at())?,
            ended_at: round.ended_at.map(rfc3339).transpose()?,
            id: round.id,
            event_id: round.event_id,
            round_no: round.round_no,
            group_size: round.group_size,
            duration_minutes: round.duration_minutes,
            matcher: round.matcher,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub id: i64,
    pub group_no: i16,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub participant_ids: Vec<i64>,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            group_no: group.group_no,
            name: group.name,
            rationale: group.rationale,
            participant_ids: group.member_ids,
        }
    }
}
