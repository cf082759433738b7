use mingle::adapters::rounds_sea::{self, RoundCreate};
use mingle::db::require_db;
use mingle::errors::domain::{ConflictKind, DomainError};
use mingle::infra::db_errors::map_db_err;
use mingle::AppError;
use time::{Duration, OffsetDateTime};

use crate::support::build_test_state;
use crate::support::factory::create_test_event;

fn round(event_id: i64, round_no: i16) -> RoundCreate {
    RoundCreate {
        event_id,
        round_no,
        group_size: 3,
        duration_minutes: 8,
        matcher: "shuffle".to_string(),
        started_at: OffsetDateTime::now_utc(),
    }
}

#[tokio::test]
async fn round_numbers_are_unique_per_event() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    let other = create_test_event(db, 3).await?;

    rounds_sea::create_round(db, round(event.id, 1)).await?;
    rounds_sea::create_round(db, round(other.id, 1)).await?;

    let err = rounds_sea::create_round(db, round(event.id, 1))
        .await
        .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::RoundConflict, _)
    ));
    Ok(())
}

#[tokio::test]
async fn mark_ended_stamps_only_open_rounds() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    rounds_sea::create_round(db, round(event.id, 1)).await?;

    let first_end = OffsetDateTime::now_utc();
    assert_eq!(rounds_sea::mark_ended(db, event.id, 1, first_end).await?, 1);
    let again = rounds_sea::mark_ended(db, event.id, 1, first_end + Duration::minutes(5)).await?;
    assert_eq!(again, 0);

    let stored = rounds_sea::find_by_event_and_round(db, event.id, 1)
        .await?
        .unwrap();
    assert!(stored.ended_at.is_some());
    Ok(())
}

#[tokio::test]
async fn rounds_list_in_order() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    rounds_sea::create_round(db, round(event.id, 2)).await?;
    rounds_sea::create_round(db, round(event.id, 1)).await?;

    let nos: Vec<i16> = rounds_sea::find_all_by_event(db, event.id)
        .await?
        .into_iter()
        .map(|r| r.round_no)
        .collect();
    assert_eq!(nos, vec![1, 2]);
    Ok(())
}
