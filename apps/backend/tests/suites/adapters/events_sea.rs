use backend_test_support::unique_helpers::unique_str;
use mingle::adapters::events_sea::{self, EventAdvance, EventCreate};
use mingle::db::require_db;
use mingle::entities::events::EventStatus;
use mingle::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use mingle::infra::db_errors::map_db_err;
use mingle::AppError;

use crate::support::build_test_state;

fn new_event(code: &str) -> EventCreate {
    EventCreate {
        code: code.to_string(),
        name: unique_str("event"),
        total_rounds: 3,
        organizer_email: None,
    }
}

#[tokio::test]
async fn create_then_find_by_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let created = events_sea::create_event(db, new_event("ABC234")).await?;
    assert_eq!(created.status, EventStatus::Lobby);
    assert_eq!(created.current_round, 0);
    assert_eq!(created.lock_version, 1);

    let found = events_sea::find_by_code(db, "ABC234").await?.unwrap();
    assert_eq!(found.id, created.id);
    assert!(events_sea::find_by_code(db, "ZZZ999").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_code_maps_to_code_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    events_sea::create_event(db, new_event("DUP234")).await?;
    let err = events_sea::create_event(db, new_event("DUP234"))
        .await
        .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::EventCodeConflict, _)
    ));
    Ok(())
}

#[tokio::test]
async fn advance_applies_once_per_observed_version() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = events_sea::create_event(db, new_event("ADV234")).await?;

    let step = EventAdvance {
        id: event.id,
        expected_round: 0,
        expected_lock_version: event.lock_version,
        next_round: 1,
        status: EventStatus::Active,
    };
    let advanced = events_sea::advance(db, step.clone()).await?;
    assert_eq!(advanced.current_round, 1);
    assert_eq!(advanced.status, EventStatus::Active);
    assert_eq!(advanced.lock_version, event.lock_version + 1);

    // Replaying the same observation matches no row
    let err = events_sea::advance(db, step).await.unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::OptimisticLock, _)
    ));
    Ok(())
}

#[tokio::test]
async fn advance_of_missing_event_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = events_sea::advance(
        db,
        EventAdvance {
            id: 999,
            expected_round: 0,
            expected_lock_version: 1,
            next_round: 1,
            status: EventStatus::Active,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::NotFound(NotFoundKind::Event, _)
    ));
    Ok(())
}
