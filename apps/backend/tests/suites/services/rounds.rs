use std::collections::BTreeSet;

use mingle::adapters::rounds_sea::{self, RoundCreate};
use mingle::db::require_db;
use mingle::domain::{EventStatus, RoundPhase, RoundTransition};
use mingle::errors::domain::{DomainError, ValidationKind};
use mingle::repos::{events, groups, rounds};
use mingle::services::rounds::StartRound;
use mingle::AppError;
use time::{Duration, OffsetDateTime};

use crate::support::build_test_state;
use crate::support::factory::{create_test_event, join_test_participant, join_test_participants};

fn start(event_id: i64, group_size: i16) -> StartRound {
    StartRound {
        event_id,
        group_size,
        duration_minutes: 10,
        expected_round: None,
    }
}

#[tokio::test]
async fn seven_participants_at_four_make_groups_of_four_and_three() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    let joined = join_test_participants(db, &event, 7).await?;

    let started = state.round_service().start_round(db, start(event.id, 4)).await?;

    let mut sizes: Vec<usize> = started.groups.iter().map(|g| g.member_ids.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 4]);

    let placed: BTreeSet<i64> = started
        .groups
        .iter()
        .flat_map(|g| g.member_ids.iter().copied())
        .collect();
    let expected: BTreeSet<i64> = joined.iter().map(|p| p.id).collect();
    assert_eq!(placed, expected);

    let group_nos: Vec<i16> = started.groups.iter().map(|g| g.group_no).collect();
    assert_eq!(group_nos, vec![1, 2]);

    assert_eq!(started.event.current_round, 1);
    assert_eq!(started.event.status, EventStatus::Active);
    assert_eq!(
        started.transitions,
        vec![
            RoundTransition::EventStarted,
            RoundTransition::RoundStarted { round_no: 1 }
        ]
    );
    assert!(!started.fell_back);
    assert_eq!(started.round.matcher, "balanced");
    Ok(())
}

#[tokio::test]
async fn next_round_closes_previous_and_includes_late_joiners() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 3).await?;
    join_test_participants(db, &event, 4).await?;

    let first = service.start_round(db, start(event.id, 2)).await?;
    let late = join_test_participant(db, &event, "Late Lou", "Latecomers Inc").await?;

    // Late joiner sits out the running round
    let sitting_out = service
        .group_for_participant(db, first.round.id, late.id)
        .await?;
    assert!(sitting_out.group.is_none());
    assert!(sitting_out.members.is_empty());

    let second = service.start_round(db, start(event.id, 2)).await?;
    assert_eq!(second.round.round_no, 2);
    assert_eq!(
        second.transitions,
        vec![RoundTransition::RoundStarted { round_no: 2 }]
    );
    assert!(second
        .groups
        .iter()
        .any(|g| g.member_ids.contains(&late.id)));
    let total: usize = second.groups.iter().map(|g| g.member_ids.len()).sum();
    assert_eq!(total, 5);

    let closed = rounds::find_by_id(db, first.round.id).await?.unwrap();
    assert!(closed.ended_at.is_some());
    let open = rounds::find_by_id(db, second.round.id).await?.unwrap();
    assert!(open.ended_at.is_none());
    Ok(())
}

#[tokio::test]
async fn round_two_avoids_repeat_pairs_when_possible() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 6).await?;

    service.start_round(db, start(event.id, 2)).await?;
    let history = groups::pair_history_for_event(db, event.id).await?;
    let second = service.start_round(db, start(event.id, 2)).await?;

    // Six people in pairs: a repeat-free second round always exists
    for group in &second.groups {
        assert_eq!(history.repeat_pairs_in(&group.member_ids), 0, "{group:?}");
    }
    Ok(())
}

#[tokio::test]
async fn group_lookup_returns_fellow_members() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    let joined = join_test_participants(db, &event, 6).await?;

    let started = service.start_round(db, start(event.id, 3)).await?;
    let found = service
        .group_for_participant(db, started.round.id, joined[0].id)
        .await?;

    let group = found.group.unwrap();
    assert!(group.member_ids.contains(&joined[0].id));
    let member_ids: BTreeSet<i64> = found.members.iter().map(|p| p.id).collect();
    assert_eq!(member_ids, group.member_ids.iter().copied().collect());
    Ok(())
}

#[tokio::test]
async fn group_lookup_rejects_participant_of_other_event() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 2).await?;
    let other = create_test_event(db, 2).await?;
    let stranger = join_test_participant(db, &other, "Stranger", "Elsewhere").await?;

    let started = service.start_round(db, start(event.id, 2)).await?;
    let err = service
        .group_for_participant(db, started.round.id, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotInEvent, _)
    ));
    Ok(())
}

#[tokio::test]
async fn start_requires_two_participants() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 1).await?;

    let err = state
        .round_service()
        .start_round(db, start(event.id, 2))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotEnoughParticipants, _)
    ));

    let unchanged = events::require_event(db, event.id).await?;
    assert_eq!(unchanged.current_round, 0);
    Ok(())
}

#[tokio::test]
async fn start_rejects_out_of_range_settings() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 4).await?;

    let err = service.start_round(db, start(event.id, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidGroupSize, _)
    ));

    let err = service
        .start_round(
            db,
            StartRound {
                duration_minutes: 0,
                ..start(event.id, 2)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidDuration, _)
    ));
    Ok(())
}

#[tokio::test]
async fn cannot_start_past_last_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 1).await?;
    join_test_participants(db, &event, 4).await?;

    service.start_round(db, start(event.id, 2)).await?;
    let err = service.start_round(db, start(event.id, 2)).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
    Ok(())
}

#[tokio::test]
async fn complete_event_ends_last_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 4).await?;

    // Completing from the lobby is not allowed
    let err = service.complete_event(db, event.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));

    service.start_round(db, start(event.id, 2)).await?;
    let second = service.start_round(db, start(event.id, 2)).await?;
    let (ended, transitions) = service.complete_event(db, event.id, Some(2)).await?;

    assert_eq!(ended.status, EventStatus::Ended);
    assert_eq!(ended.current_round, 2);
    assert_eq!(transitions, vec![RoundTransition::EventEnded]);
    let last = rounds::find_by_id(db, second.round.id).await?.unwrap();
    assert!(last.ended_at.is_some());

    let replayed = service.transitions(db, event.id).await?;
    assert_eq!(
        replayed,
        vec![
            RoundTransition::EventStarted,
            RoundTransition::RoundStarted { round_no: 1 },
            RoundTransition::RoundStarted { round_no: 2 },
            RoundTransition::EventEnded,
        ]
    );

    let err = service.complete_event(db, event.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
    Ok(())
}

#[tokio::test]
async fn current_round_reports_clock() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 3).await?;

    let lobby = service
        .current_round(db, event.id, OffsetDateTime::now_utc())
        .await?;
    assert_eq!(lobby.phase, RoundPhase::Lobby);
    assert!(lobby.round.is_none());
    assert!(lobby.remaining_seconds.is_none());

    let started = service.start_round(db, start(event.id, 3)).await?;
    let started_at = started.round.started_at;

    let early = service
        .current_round(db, event.id, started_at + Duration::seconds(90))
        .await?;
    assert_eq!(early.phase, RoundPhase::RoundActive(1));
    assert_eq!(early.remaining_seconds, Some(10 * 60 - 90));
    assert_eq!(early.ends_at, Some(started_at + Duration::minutes(10)));

    // Past the end the countdown clamps at zero
    let late = service
        .current_round(db, event.id, started_at + Duration::hours(2))
        .await?;
    assert_eq!(late.remaining_seconds, Some(0));
    Ok(())
}

#[tokio::test]
async fn failed_start_leaves_event_untouched() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = state.round_service();
    let event = create_test_event(db, 3).await?;
    join_test_participants(db, &event, 4).await?;

    let first = service.start_round(db, start(event.id, 2)).await?;
    let before = events::require_event(db, event.id).await?;

    // A stray round 2 row makes the insert inside the transaction fail
    rounds_sea::create_round(
        db,
        RoundCreate {
            event_id: event.id,
            round_no: 2,
            group_size: 2,
            duration_minutes: 10,
            matcher: "manual".to_string(),
            started_at: OffsetDateTime::now_utc(),
        },
    )
    .await?;

    let result = service.start_round(db, start(event.id, 2)).await;
    assert!(result.is_err());

    let after = events::require_event(db, event.id).await?;
    assert_eq!(after.current_round, 1);
    assert_eq!(after.lock_version, before.lock_version);
    assert_eq!(after.status, EventStatus::Active);

    let round_one = rounds::find_by_id(db, first.round.id).await?.unwrap();
    assert!(round_one.ended_at.is_none());

    let stray = rounds::find_by_event_and_round(db, event.id, 2).await?.unwrap();
    assert!(groups::groups_for_round(db, stray.id).await?.is_empty());
    Ok(())
}
