//! DTOs for rounds_sea adapter.

use time::OffsetDateTime;

/// DTO for creating a new round.
#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub event_id: i64,
    pub round_no: i16,
    pub group_size: i16,
    pub duration_minutes: i16,
    pub matcher: String,
    pub started_at: OffsetDateTime,
}
