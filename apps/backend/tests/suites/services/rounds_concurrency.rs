use mingle::db::require_db;
use mingle::errors::domain::{ConflictKind, DomainError};
use mingle::repos::{events, rounds};
use mingle::services::rounds::StartRound;
use mingle::AppError;

use crate::support::build_test_state;
use crate::support::factory::{create_test_event, join_test_participants};

fn start_from(event_id: i64, expected_round: i16) -> StartRound {
    StartRound {
        event_id,
        group_size: 2,
        duration_minutes: 5,
        expected_round: Some(expected_round),
    }
}

#[tokio::test]
async fn concurrent_starts_commit_exactly_one_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 4).await?;
    join_test_participants(db, &event, 6).await?;

    state
        .round_service()
        .start_round(db, start_from(event.id, 0))
        .await?;

    let a = state.round_service();
    let b = state.round_service();
    let (first, second) = tokio::join!(
        a.start_round(db, start_from(event.id, 1)),
        b.start_round(db, start_from(event.id, 1)),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1, "{outcomes:?}");
    let loser = first.err().or(second.err()).unwrap();
    assert!(matches!(loser, DomainError::Conflict(_, _)), "{loser:?}");

    let after = events::require_event(db, event.id).await?;
    assert_eq!(after.current_round, 2);
    assert_eq!(rounds::find_all_by_event(db, event.id).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unguarded_concurrent_starts_are_settled_by_the_round_counter() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 4).await?;
    join_test_participants(db, &event, 6).await?;

    let unguarded = |event_id| StartRound {
        expected_round: None,
        ..start_from(event_id, 0)
    };
    state.round_service().start_round(db, unguarded(event.id)).await?;

    let a = state.round_service();
    let b = state.round_service();
    let (first, second) = tokio::join!(
        a.start_round(db, unguarded(event.id)),
        b.start_round(db, unguarded(event.id)),
    );

    let winner = first.as_ref().or(second.as_ref()).map_err(Clone::clone)?;
    assert_eq!(winner.round.round_no, 2);
    let loser = first.err().or(second.err()).unwrap();
    assert!(
        matches!(
            loser,
            DomainError::Conflict(ConflictKind::OptimisticLock | ConflictKind::RoundConflict, _)
        ),
        "{loser:?}"
    );

    let numbers: Vec<i16> = rounds::find_all_by_event(db, event.id)
        .await?
        .iter()
        .map(|r| r.round_no)
        .collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(events::require_event(db, event.id).await?.current_round, 2);
    Ok(())
}

#[tokio::test]
async fn stale_expected_round_is_a_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 4).await?;
    join_test_participants(db, &event, 4).await?;
    let service = state.round_service();

    service.start_round(db, start_from(event.id, 0)).await?;
    let err = service
        .start_round(db, start_from(event.id, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_, _)));
    Ok(())
}
