//! DTOs for events_sea adapter.

use crate::entities::events::EventStatus;

/// DTO for creating a new event.
#[derive(Debug, Clone)]
pub struct EventCreate {
    pub code: String,
    pub name: String,
    pub total_rounds: i16,
    pub organizer_email: Option<String>,
}

/// Conditional update of the round counter and status.
///
/// Applied only while the row still carries `expected_round` and
/// `expected_lock_version`; otherwise the write affects nothing.
#[derive(Debug, Clone)]
pub struct EventAdvance {
    pub id: i64,
    pub expected_round: i16,
    pub expected_lock_version: i32,
    pub next_round: i16,
    pub status: EventStatus,
}
