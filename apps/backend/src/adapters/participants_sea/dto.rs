//! DTOs for participants_sea adapter.

/// DTO for inserting a participant. Tag lists arrive already JSON-encoded.
#[derive(Debug, Clone)]
pub struct ParticipantCreate {
    pub event_id: i64,
    pub name: String,
    pub company: String,
    pub role: String,
    pub offers_json: String,
    pub seeks_json: String,
    pub industries_json: String,
    pub bio: Option<String>,
}
