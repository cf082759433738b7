//! DTOs for saves_sea adapter.

/// DTO for recording a directed save.
#[derive(Debug, Clone)]
pub struct SaveCreate {
    pub event_id: i64,
    pub round_id: i64,
    pub from_participant_id: i64,
    pub to_participant_id: i64,
}
