//! Round lifecycle orchestration: reads, matching, then one atomic write.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::OffsetDateTime;
use tracing::info;

use crate::db::txn::with_txn;
use crate::domain::lifecycle::replay_transitions;
use crate::domain::{EventStatus, PairHistory, RoundPhase, RoundTransition};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::matcher::MatchRequest;
use crate::repos::events::{self, Event};
use crate::repos::groups::{self, Group};
use crate::repos::participants::{self, Participant};
use crate::repos::rounds::{self, NewRound, Round};
use crate::services::matching::MatchingService;

pub const MIN_GROUP_SIZE: i16 = 2;
pub const MAX_GROUP_SIZE: i16 = 12;
pub const MAX_DURATION_MINUTES: i16 = 120;

/// Input for starting the next round.
#[derive(Debug, Clone)]
pub struct StartRound {
    pub event_id: i64,
    pub group_size: i16,
    pub duration_minutes: i16,
    /// Round counter the caller last saw; a mismatch is a conflict
    pub expected_round: Option<i16>,
}

/// Everything a successful start committed.
#[derive(Debug, Clone)]
pub struct RoundStarted {
    pub event: Event,
    pub round: Round,
    pub groups: Vec<Group>,
    pub transitions: Vec<RoundTransition>,
    pub fell_back: bool,
}

/// Current round plus the clock values every client derives its countdown from.
#[derive(Debug, Clone)]
pub struct CurrentRound {
    pub event: Event,
    pub phase: RoundPhase,
    pub round: Option<Round>,
    pub remaining_seconds: Option<i64>,
    pub ends_at: Option<OffsetDateTime>,
    pub server_now: OffsetDateTime,
}

/// A participant's group in a round, with the other members resolved.
#[derive(Debug, Clone)]
pub struct ParticipantGroup {
    pub round: Round,
    /// `None` when the participant sits this round out
    pub group: Option<Group>,
    pub members: Vec<Participant>,
}

pub struct RoundService {
    matching: Arc<MatchingService>,
}

impl RoundService {
    pub fn new(matching: Arc<MatchingService>) -> Self {
        Self { matching }
    }

    /// Start round 1 from the lobby or round n+1 from round n.
    ///
    /// Participants, history and the partition are computed before the
    /// transaction opens. The transaction then advances the event counter
    /// conditionally, closes the previous round and writes the new round with
    /// all of its groups; any failure leaves the event as it was.
    pub async fn start_round(
        &self,
        db: &DatabaseConnection,
        cmd: StartRound,
    ) -> Result<RoundStarted, DomainError> {
        validate_round_settings(cmd.group_size, cmd.duration_minutes)?;

        let event = events::require_event(db, cmd.event_id).await?;
        check_expected_round(&event, cmd.expected_round)?;

        let phase =
            RoundPhase::from_persisted(event.status, event.current_round, event.total_rounds)?;
        let plan = phase.plan_start(event.total_rounds)?;

        let roster = participants::list_by_event(db, event.id).await?;
        if roster.len() < 2 {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughParticipants,
                format!(
                    "At least 2 participants are needed to start a round, event has {}",
                    roster.len()
                ),
            ));
        }

        let history = if plan.next_round == 1 {
            PairHistory::new()
        } else {
            groups::pair_history_for_event(db, event.id).await?
        };

        let request = MatchRequest::new(
            roster.iter().map(Participant::profile).collect(),
            cmd.group_size as usize,
        )
        .with_history(history)
        .with_seed(self.matching.round_seed(event.id, plan.next_round));
        let outcome = self.matching.partition(&request).await;

        let now = OffsetDateTime::now_utc();
        let event_id = event.id;
        let next_round = plan.next_round;
        let closes_round = plan.closes_round;
        let new_round = NewRound {
            event_id,
            round_no: next_round,
            group_size: cmd.group_size,
            duration_minutes: cmd.duration_minutes,
            matcher: outcome.matcher.to_string(),
            started_at: now,
        };
        let proposal = outcome.proposal;

        let (event, round, groups) = with_txn(db, move |txn| {
            Box::pin(async move {
                let event = events::advance(txn, &event, next_round, EventStatus::Active).await?;
                if let Some(prev) = closes_round {
                    rounds::mark_ended(txn, event_id, prev, now).await?;
                }
                let round = rounds::create_round(txn, new_round).await?;
                let groups = groups::create_groups(txn, event_id, round.id, &proposal).await?;
                Ok::<_, DomainError>((event, round, groups))
            })
        })
        .await?;

        info!(
            event_id,
            round_no = round.round_no,
            groups = groups.len(),
            participants = roster.len(),
            matcher = %round.matcher,
            fell_back = outcome.fell_back,
            "Round started"
        );

        Ok(RoundStarted {
            event,
            round,
            groups,
            transitions: plan.transitions,
            fell_back: outcome.fell_back,
        })
    }

    /// Close the last round and end the event.
    pub async fn complete_event(
        &self,
        db: &DatabaseConnection,
        event_id: i64,
        expected_round: Option<i16>,
    ) -> Result<(Event, Vec<RoundTransition>), DomainError> {
        let event = events::require_event(db, event_id).await?;
        check_expected_round(&event, expected_round)?;

        let phase =
            RoundPhase::from_persisted(event.status, event.current_round, event.total_rounds)?;
        let plan = phase.plan_complete(event.total_rounds)?;
        let now = OffsetDateTime::now_utc();

        let event = with_txn(db, move |txn| {
            Box::pin(async move {
                let event =
                    events::advance(txn, &event, plan.expected_round, EventStatus::Ended).await?;
                rounds::mark_ended(txn, event_id, plan.closes_round, now).await?;
                Ok::<_, DomainError>(event)
            })
        })
        .await?;

        info!(event_id, total_rounds = event.total_rounds, "Event ended");
        Ok((event, vec![RoundTransition::EventEnded]))
    }

    /// The event's current round with clock values computed at `now`.
    pub async fn current_round<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        event_id: i64,
        now: OffsetDateTime,
    ) -> Result<CurrentRound, DomainError> {
        let event = events::require_event(conn, event_id).await?;
        let phase =
            RoundPhase::from_persisted(event.status, event.current_round, event.total_rounds)?;

        let round = if event.current_round > 0 {
            rounds::find_by_event_and_round(conn, event.id, event.current_round).await?
        } else {
            None
        };
        let clock = round.as_ref().map(Round::clock);

        Ok(CurrentRound {
            remaining_seconds: clock.map(|c| c.remaining_seconds(now)),
            ends_at: clock.map(|c| c.ends_at()),
            event,
            phase,
            round,
            server_now: now,
        })
    }

    /// Which group a participant is in for a round.
    pub async fn group_for_participant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        round_id: i64,
        participant_id: i64,
    ) -> Result<ParticipantGroup, DomainError> {
        let round = rounds::find_by_id(conn, round_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Round, format!("Round {round_id} not found"))
        })?;
        let participant = participants::find_by_id(conn, participant_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Participant,
                    format!("Participant {participant_id} not found"),
                )
            })?;
        if participant.event_id != round.event_id {
            return Err(DomainError::validation(
                ValidationKind::NotInEvent,
                format!("Participant {participant_id} is not in round {round_id}'s event"),
            ));
        }

        let group = groups::group_for_participant(conn, round.id, participant_id).await?;
        let members = match &group {
            Some(g) => participants::list_by_event(conn, round.event_id)
                .await?
                .into_iter()
                .filter(|p| g.member_ids.contains(&p.id))
                .collect(),
            None => Vec::new(),
        };

        Ok(ParticipantGroup {
            round,
            group,
            members,
        })
    }

    /// Committed lifecycle transitions, oldest first.
    pub async fn transitions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        event_id: i64,
    ) -> Result<Vec<RoundTransition>, DomainError> {
        let event = events::require_event(conn, event_id).await?;
        let round_nos: Vec<i16> = rounds::find_all_by_event(conn, event_id)
            .await?
            .into_iter()
            .map(|r| r.round_no)
            .collect();
        Ok(replay_transitions(
            &round_nos,
            event.status == EventStatus::Ended,
        ))
    }
}

fn validate_round_settings(group_size: i16, duration_minutes: i16) -> Result<(), DomainError> {
    if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&group_size) {
        return Err(DomainError::validation(
            ValidationKind::InvalidGroupSize,
            format!("Group size must be between {MIN_GROUP_SIZE} and {MAX_GROUP_SIZE}, got {group_size}"),
        ));
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        return Err(DomainError::validation(
            ValidationKind::InvalidDuration,
            format!(
                "Round duration must be between 1 and {MAX_DURATION_MINUTES} minutes, got {duration_minutes}"
            ),
        ));
    }
    Ok(())
}

fn check_expected_round(event: &Event, expected: Option<i16>) -> Result<(), DomainError> {
    match expected {
        Some(expected) if expected != event.current_round => Err(DomainError::conflict(
            ConflictKind::RoundConflict,
            format!(
                "Expected event {} at round {expected}, it is at round {}",
                event.id, event.current_round
            ),
        )),
        _ => Ok(()),
    }
}
