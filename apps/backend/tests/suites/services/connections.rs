use mingle::db::require_db;
use mingle::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use mingle::repos::saves;
use mingle::services::connections::{ConnectionService, SaveContact};
use mingle::services::rounds::{RoundStarted, StartRound};
use mingle::state::app_state::AppState;
use mingle::AppError;

use crate::support::build_test_state;
use crate::support::factory::{create_test_event, join_test_participant, join_test_participants};

async fn start_next(state: &AppState, event_id: i64) -> Result<RoundStarted, AppError> {
    let db = require_db(state)?;
    let started = state
        .round_service()
        .start_round(
            db,
            StartRound {
                event_id,
                group_size: 2,
                duration_minutes: 5,
                expected_round: None,
            },
        )
        .await?;
    Ok(started)
}

#[tokio::test]
async fn saves_in_different_rounds_become_mutual() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    let joined = join_test_participants(db, &event, 4).await?;
    let (ada, bob, cy) = (&joined[0], &joined[1], &joined[2]);
    let service = ConnectionService::new();

    let round_one = start_next(&state, event.id).await?;
    let created = service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: round_one.round.id,
                from: ada.id,
                to: bob.id,
            },
        )
        .await?;
    assert!(created);

    service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: round_one.round.id,
                from: ada.id,
                to: cy.id,
            },
        )
        .await?;

    let round_two = start_next(&state, event.id).await?;
    service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: round_two.round.id,
                from: bob.id,
                to: ada.id,
            },
        )
        .await?;

    let view = service.connections_for(db, ada.id).await?;
    let mutual: Vec<i64> = view.mutual.iter().map(|p| p.id).collect();
    let one_way: Vec<i64> = view.one_way.iter().map(|p| p.id).collect();
    assert_eq!(mutual, vec![bob.id]);
    assert_eq!(one_way, vec![cy.id]);

    // Cy never saved anyone and sees nothing mutual
    let cy_view = service.connections_for(db, cy.id).await?;
    assert!(cy_view.mutual.is_empty());
    assert!(cy_view.one_way.is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_save_is_idempotent_and_retract_removes_it() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    let joined = join_test_participants(db, &event, 2).await?;
    let service = ConnectionService::new();
    let round_one = start_next(&state, event.id).await?;
    let round_two = start_next(&state, event.id).await?;

    let save = |round_id| SaveContact {
        event_id: event.id,
        round_id,
        from: joined[0].id,
        to: joined[1].id,
    };
    assert!(service.save_contact(db, save(round_one.round.id)).await?);
    assert!(!service.save_contact(db, save(round_one.round.id)).await?);
    // Same edge from a later round is still one edge
    assert!(!service.save_contact(db, save(round_two.round.id)).await?);
    assert_eq!(saves::count_by_event(db, event.id).await?, 1);

    assert!(
        service
            .retract_contact(db, event.id, joined[0].id, joined[1].id)
            .await?
    );
    assert!(
        !service
            .retract_contact(db, event.id, joined[0].id, joined[1].id)
            .await?
    );
    assert_eq!(saves::count_by_event(db, event.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn self_save_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let joined = join_test_participants(db, &event, 2).await?;
    let round = start_next(&state, event.id).await?;

    let err = ConnectionService::new()
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: round.round.id,
                from: joined[0].id,
                to: joined[0].id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::SelfSave, _)
    ));
    Ok(())
}

#[tokio::test]
async fn save_across_events_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let joined = join_test_participants(db, &event, 2).await?;
    let other = create_test_event(db, 2).await?;
    let outsider = join_test_participant(db, &other, "Outsider", "Elsewhere").await?;
    join_test_participants(db, &other, 1).await?;
    let round = start_next(&state, event.id).await?;
    let other_round = start_next(&state, other.id).await?;
    let service = ConnectionService::new();

    let err = service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: round.round.id,
                from: joined[0].id,
                to: outsider.id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotInEvent, _)
    ));

    let err = service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: other_round.round.id,
                from: joined[0].id,
                to: joined[1].id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotInEvent, _)
    ));

    let err = service
        .save_contact(
            db,
            SaveContact {
                event_id: event.id,
                round_id: i64::MAX,
                from: joined[0].id,
                to: joined[1].id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Round, _)));
    Ok(())
}

#[tokio::test]
async fn connections_of_unknown_participant_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = ConnectionService::new()
        .connections_for(db, 4242)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Participant, _)
    ));
    Ok(())
}
