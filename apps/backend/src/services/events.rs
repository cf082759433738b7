//! Event creation, joining and overview.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::domain::RoundPhase;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::events::{self, Event};
use crate::repos::participants::{self, NewParticipant, Participant};
use crate::repos::rounds::{self, Round};
use crate::utils::join_code::{generate_event_code, normalize_event_code};

pub const DEFAULT_TOTAL_ROUNDS: i16 = 4;
pub const MAX_TOTAL_ROUNDS: i16 = 20;
const CODE_ATTEMPTS: usize = 5;

/// Input for creating an event.
#[derive(Debug, Clone, Default)]
pub struct CreateEvent {
    pub name: String,
    /// Defaults to four rounds
    pub total_rounds: Option<i16>,
    pub organizer_email: Option<String>,
}

/// Public view of an event for lobby and display screens.
#[derive(Debug, Clone)]
pub struct EventOverview {
    pub event: Event,
    pub phase: RoundPhase,
    pub participant_count: u64,
    pub current_round: Option<Round>,
    /// `ceil(participants / group_size)` for the current round's size
    pub expected_groups: Option<u64>,
}

/// Event lifecycle outside of rounds.
pub struct EventService;

impl EventService {
    pub fn new() -> Self {
        Self
    }

    /// Create an event in the lobby with a fresh code.
    ///
    /// A code collision is retried with a new code a few times before the
    /// conflict is surfaced.
    pub async fn create_event<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cmd: CreateEvent,
    ) -> Result<Event, DomainError> {
        let name = cmd.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::MissingField,
                "Event name is required",
            ));
        }

        let total_rounds = cmd.total_rounds.unwrap_or(DEFAULT_TOTAL_ROUNDS);
        if !(1..=MAX_TOTAL_ROUNDS).contains(&total_rounds) {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundCount,
                format!("Total rounds must be between 1 and {MAX_TOTAL_ROUNDS}, got {total_rounds}"),
            ));
        }

        let organizer_email = cmd
            .organizer_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let mut attempt = 0;
        loop {
            attempt += 1;
            let code = generate_event_code();
            match events::create_event(
                conn,
                code.clone(),
                name.clone(),
                total_rounds,
                organizer_email.clone(),
            )
            .await
            {
                Ok(event) => {
                    info!(event_id = event.id, code = %event.code, total_rounds, "Event created");
                    return Ok(event);
                }
                Err(DomainError::Conflict(ConflictKind::EventCodeConflict, _))
                    if attempt < CODE_ATTEMPTS =>
                {
                    warn!(attempt, "Event code collision, retrying with a new code");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Add a participant to an event by code.
    ///
    /// Joining is open in the lobby and while rounds run; late joiners are
    /// partitioned from the next round on. Ended events reject joins.
    pub async fn join_event<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
        new: NewParticipant,
    ) -> Result<(Event, Participant), DomainError> {
        let event = self.require_by_code(conn, code).await?;
        if event.status == crate::domain::EventStatus::Ended {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("Event {} has ended", event.code),
            ));
        }

        let new = NewParticipant {
            name: new.name.trim().to_string(),
            company: new.company.trim().to_string(),
            role: new.role.trim().to_string(),
            offers: clean_tags(new.offers),
            seeks: clean_tags(new.seeks),
            industries: clean_tags(new.industries),
            bio: new.bio.filter(|b| !b.trim().is_empty()),
        };
        if new.name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::MissingField,
                "Participant name is required",
            ));
        }

        let participant = participants::create_participant(conn, event.id, new).await?;
        info!(
            event_id = event.id,
            participant_id = participant.id,
            current_round = event.current_round,
            "Participant joined"
        );
        Ok((event, participant))
    }

    /// Event state plus counts for the lobby and display screens.
    pub async fn event_overview<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<EventOverview, DomainError> {
        let event = self.require_by_code(conn, code).await?;
        let phase =
            RoundPhase::from_persisted(event.status, event.current_round, event.total_rounds)?;
        let participant_count = participants::count_by_event(conn, event.id).await?;

        let current_round = if event.current_round > 0 {
            rounds::find_by_event_and_round(conn, event.id, event.current_round).await?
        } else {
            None
        };
        let expected_groups = current_round
            .as_ref()
            .map(|r| participant_count.div_ceil(r.group_size.max(1) as u64));

        Ok(EventOverview {
            event,
            phase,
            participant_count,
            current_round,
            expected_groups,
        })
    }

    async fn require_by_code<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<Event, DomainError> {
        let code = normalize_event_code(code);
        events::find_by_code(conn, &code).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Event, format!("Event {code} not found"))
        })
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
