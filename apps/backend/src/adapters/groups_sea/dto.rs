//! DTOs for groups_sea adapter.

/// One group of a round together with its members.
#[derive(Debug, Clone)]
pub struct GroupCreate {
    pub event_id: i64,
    pub round_id: i64,
    pub group_no: i16,
    pub name: String,
    pub rationale: Option<String>,
    pub member_ids: Vec<i64>,
}
