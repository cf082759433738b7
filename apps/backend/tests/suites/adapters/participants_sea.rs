use mingle::adapters::participants_sea::{self, ParticipantCreate};
use mingle::db::require_db;
use mingle::errors::domain::{DomainError, InfraErrorKind};
use mingle::repos::participants;
use mingle::AppError;

use crate::support::build_test_state;
use crate::support::factory::create_test_event;

fn raw(event_id: i64, name: &str, offers_json: &str) -> ParticipantCreate {
    ParticipantCreate {
        event_id,
        name: name.to_string(),
        company: "Acme".to_string(),
        role: "PM".to_string(),
        offers_json: offers_json.to_string(),
        seeks_json: "[]".to_string(),
        industries_json: "".to_string(),
        bio: None,
    }
}

#[tokio::test]
async fn participants_list_and_count_per_event() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let other = create_test_event(db, 2).await?;

    participants_sea::create_participant(db, raw(event.id, "Ada", "[\"rust\"]")).await?;
    participants_sea::create_participant(db, raw(event.id, "Bob", "[]")).await?;
    participants_sea::create_participant(db, raw(other.id, "Cy", "[]")).await?;

    let names: Vec<String> = participants::list_by_event(db, event.id)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Ada".to_string(), "Bob".to_string()]);
    assert_eq!(participants::count_by_event(db, event.id).await?, 2);
    assert_eq!(participants::count_by_event(db, other.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn tag_columns_decode_and_blank_means_empty() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;

    let row =
        participants_sea::create_participant(db, raw(event.id, "Ada", "[\"rust\",\"go\"]")).await?;
    let ada = participants::find_by_id(db, row.id).await?.unwrap();
    assert_eq!(ada.offers, vec!["rust".to_string(), "go".to_string()]);
    assert!(ada.industries.is_empty());
    Ok(())
}

#[tokio::test]
async fn garbled_tags_are_data_corruption() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;

    let row = participants_sea::create_participant(db, raw(event.id, "Ada", "{not json")).await?;
    let err = participants::find_by_id(db, row.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Infra(InfraErrorKind::DataCorruption, _)
    ));
    Ok(())
}

#[tokio::test]
async fn participant_requires_existing_event() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let result = participants_sea::create_participant(db, raw(777, "Ghost", "[]")).await;
    assert!(result.is_err());
    Ok(())
}
