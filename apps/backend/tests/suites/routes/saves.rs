use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use mingle::db::require_db;
use mingle::services::rounds::StartRound;
use mingle::AppError;
use serde_json::{json, Value};

use crate::support::factory::{create_test_event, join_test_participants};
use crate::support::{build_test_state, create_test_app};

#[tokio::test]
async fn save_both_ways_shows_mutual_connection() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let people = join_test_participants(db, &event, 3).await?;
    let started = state
        .round_service()
        .start_round(
            db,
            StartRound {
                event_id: event.id,
                group_size: 3,
                duration_minutes: 5,
                expected_round: None,
            },
        )
        .await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let save = |from: i64, to: i64| {
        test::TestRequest::post()
            .uri("/api/saves")
            .set_json(json!({
                "event_id": event.id,
                "round_id": started.round.id,
                "from_participant_id": from,
                "to_participant_id": to,
            }))
            .to_request()
    };

    let resp = test::call_service(&app, save(people[0].id, people[1].id)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["created"], true);

    let resp = test::call_service(&app, save(people[0].id, people[1].id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["created"], false);

    test::call_service(&app, save(people[1].id, people[0].id)).await;
    test::call_service(&app, save(people[0].id, people[2].id)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/participants/{}/connections", people[0].id))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["mutual"].as_array().unwrap().len(), 1);
    assert_eq!(view["mutual"][0]["id"], people[1].id);
    assert_eq!(view["one_way"][0]["id"], people[2].id);

    let req = test::TestRequest::delete()
        .uri("/api/saves")
        .set_json(json!({
            "event_id": event.id,
            "from_participant_id": people[1].id,
            "to_participant_id": people[0].id,
        }))
        .to_request();
    let removed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(removed["removed"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/participants/{}/connections", people[0].id))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert!(view["mutual"].as_array().unwrap().is_empty());
    assert_eq!(view["one_way"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn self_save_is_unprocessable() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let people = join_test_participants(db, &event, 2).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/saves")
        .set_json(json!({
            "event_id": event.id,
            "round_id": 1,
            "from_participant_id": people[0].id,
            "to_participant_id": people[0].id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "SELF_SAVE",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;
    Ok(())
}
