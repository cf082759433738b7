//! Participant repository functions.
//!
//! Tag lists are JSON arrays in text columns; they are encoded and decoded
//! here so nothing above this layer sees the storage format.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::participants_sea as participants_adapter;
use crate::domain::ParticipantProfile;
use crate::entities::participants;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Participant domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub company: String,
    pub role: String,
    pub offers: Vec<String>,
    pub seeks: Vec<String>,
    pub industries: Vec<String>,
    pub bio: Option<String>,
    pub joined_at: OffsetDateTime,
}

impl Participant {
    pub fn profile(&self) -> ParticipantProfile {
        ParticipantProfile {
            id: self.id,
            name: self.name.clone(),
            company: self.company.clone(),
            role: self.role.clone(),
            offers: self.offers.clone(),
            seeks: self.seeks.clone(),
            industries: self.industries.clone(),
        }
    }
}

/// Fields supplied when joining an event.
#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
    pub name: String,
    pub company: String,
    pub role: String,
    pub offers: Vec<String>,
    pub seeks: Vec<String>,
    pub industries: Vec<String>,
    pub bio: Option<String>,
}

fn encode_tags(tags: &[String]) -> Result<String, DomainError> {
    serde_json::to_string(tags)
        .map_err(|e| DomainError::infra(InfraErrorKind::Other("Json".into()), e.to_string()))
}

fn decode_tags(raw: &str, column: &str, id: i64) -> Result<Vec<String>, DomainError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("participant {id} has unreadable {column}: {e}"),
        )
    })
}

impl TryFrom<participants::Model> for Participant {
    type Error = DomainError;

    fn try_from(model: participants::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            offers: decode_tags(&model.offers, "offers", model.id)?,
            seeks: decode_tags(&model.seeks, "seeks", model.id)?,
            industries: decode_tags(&model.industries, "industries", model.id)?,
            id: model.id,
            event_id: model.event_id,
            name: model.name,
            company: model.company,
            role: model.role,
            bio: model.bio,
            joined_at: model.joined_at,
        })
    }
}

pub async fn create_participant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    new: NewParticipant,
) -> Result<Participant, DomainError> {
    let dto = participants_adapter::ParticipantCreate {
        event_id,
        offers_json: encode_tags(&new.offers)?,
        seeks_json: encode_tags(&new.seeks)?,
        industries_json: encode_tags(&new.industries)?,
        name: new.name,
        company: new.company,
        role: new.role,
        bio: new.bio,
    };
    let model = participants_adapter::create_participant(conn, dto).await?;
    Participant::try_from(model)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
) -> Result<Option<Participant>, DomainError> {
    participants_adapter::find_by_id(conn, participant_id)
        .await?
        .map(Participant::try_from)
        .transpose()
}

pub async fn list_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<Vec<Participant>, DomainError> {
    participants_adapter::list_by_event(conn, event_id)
        .await?
        .into_iter()
        .map(Participant::try_from)
        .collect()
}

pub async fn count_by_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<u64, DomainError> {
    Ok(participants_adapter::count_by_event(conn, event_id).await?)
}
