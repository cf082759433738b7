use mingle::db::require_db;
use mingle::domain::{EventStatus, RoundPhase};
use mingle::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use mingle::repos::participants::NewParticipant;
use mingle::services::events::{CreateEvent, EventService, DEFAULT_TOTAL_ROUNDS};
use mingle::services::rounds::StartRound;
use mingle::AppError;

use crate::support::build_test_state;
use crate::support::factory::{create_test_event, join_test_participants};

fn guest(name: &str) -> NewParticipant {
    NewParticipant {
        name: name.to_string(),
        ..NewParticipant::default()
    }
}

#[tokio::test]
async fn create_event_starts_in_lobby_with_default_rounds() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let event = EventService::new()
        .create_event(
            db,
            CreateEvent {
                name: "  Rust Meetup  ".to_string(),
                total_rounds: None,
                organizer_email: Some("   ".to_string()),
            },
        )
        .await?;

    assert_eq!(event.name, "Rust Meetup");
    assert_eq!(event.total_rounds, DEFAULT_TOTAL_ROUNDS);
    assert_eq!(event.status, EventStatus::Lobby);
    assert_eq!(event.current_round, 0);
    assert_eq!(event.code.len(), 6);
    assert!(event.organizer_email.is_none());
    Ok(())
}

#[tokio::test]
async fn create_event_rejects_bad_input() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = EventService::new();

    let blank = service
        .create_event(
            db,
            CreateEvent {
                name: " ".to_string(),
                total_rounds: None,
                organizer_email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blank,
        DomainError::Validation(ValidationKind::MissingField, _)
    ));

    let zero_rounds = service
        .create_event(
            db,
            CreateEvent {
                name: "Meetup".to_string(),
                total_rounds: Some(0),
                organizer_email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        zero_rounds,
        DomainError::Validation(ValidationKind::InvalidRoundCount, _)
    ));
    Ok(())
}

#[tokio::test]
async fn join_accepts_lowercase_code_and_trims_tags() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;

    let (joined_event, participant) = EventService::new()
        .join_event(
            db,
            &event.code.to_lowercase(),
            NewParticipant {
                name: " Ada ".to_string(),
                offers: vec![" mentoring ".to_string(), "".to_string()],
                ..NewParticipant::default()
            },
        )
        .await?;

    assert_eq!(joined_event.id, event.id);
    assert_eq!(participant.name, "Ada");
    assert_eq!(participant.offers, vec!["mentoring".to_string()]);
    assert!(participant.seeks.is_empty());
    Ok(())
}

#[tokio::test]
async fn join_unknown_code_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = EventService::new()
        .join_event(db, "ZZZZZZ", guest("Ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Event, _)));
    Ok(())
}

#[tokio::test]
async fn join_without_name_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;

    let err = EventService::new()
        .join_event(db, &event.code, guest("   "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MissingField, _)
    ));
    Ok(())
}

#[tokio::test]
async fn join_after_event_ended_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let rounds = state.round_service();
    let event = create_test_event(db, 1).await?;
    join_test_participants(db, &event, 3).await?;

    rounds
        .start_round(
            db,
            StartRound {
                event_id: event.id,
                group_size: 3,
                duration_minutes: 10,
                expected_round: None,
            },
        )
        .await?;
    rounds.complete_event(db, event.id, None).await?;

    let err = EventService::new()
        .join_event(db, &event.code, guest("Latecomer"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
    Ok(())
}

#[tokio::test]
async fn overview_counts_participants_and_expected_groups() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    join_test_participants(db, &event, 7).await?;

    let service = EventService::new();
    let lobby = service.event_overview(db, &event.code).await?;
    assert_eq!(lobby.phase, RoundPhase::Lobby);
    assert_eq!(lobby.participant_count, 7);
    assert!(lobby.current_round.is_none());
    assert!(lobby.expected_groups.is_none());

    state
        .round_service()
        .start_round(
            db,
            StartRound {
                event_id: event.id,
                group_size: 4,
                duration_minutes: 15,
                expected_round: Some(0),
            },
        )
        .await?;

    let running = service.event_overview(db, &event.code).await?;
    assert_eq!(running.phase, RoundPhase::RoundActive(1));
    assert_eq!(running.expected_groups, Some(2));
    assert_eq!(running.current_round.map(|r| r.round_no), Some(1));
    Ok(())
}
