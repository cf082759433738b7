use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use mingle::db::require_db;
use mingle::AppError;
use serde_json::{json, Value};

use crate::support::factory::{create_test_event, join_test_participants};
use crate::support::{build_test_state, create_test_app};

#[tokio::test]
async fn start_round_then_look_up_group() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 2).await?;
    let people = join_test_participants(db, &event, 7).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/rounds", event.id))
        .set_json(json!({ "group_size": 4, "duration_minutes": 12, "expected_round": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let started: Value = test::read_body_json(resp).await;
    assert_eq!(started["round"]["round_no"], 1);
    assert_eq!(started["event"]["current_round"], 1);
    assert_eq!(started["groups"].as_array().unwrap().len(), 2);
    assert_eq!(started["transitions"][0]["type"], "event_started");
    assert_eq!(started["fell_back"], false);
    let round_id = started["round"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/rounds/{round_id}/participants/{}/group",
            people[0].id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Value = test::read_body_json(resp).await;
    let ids = found["group"]["participant_ids"].as_array().unwrap();
    assert!(ids.iter().any(|id| id.as_i64() == Some(people[0].id)));
    assert_eq!(found["members"].as_array().unwrap().len(), ids.len());

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/rounds/current", event.id))
        .to_request();
    let current: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(current["phase"]["phase"], "round_active");
    assert_eq!(current["phase"]["round_no"], 1);
    let remaining = current["remaining_seconds"].as_i64().unwrap();
    assert!((0..=12 * 60).contains(&remaining));
    Ok(())
}

#[tokio::test]
async fn stale_expected_round_is_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    join_test_participants(db, &event, 4).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let body = json!({ "group_size": 2, "duration_minutes": 5, "expected_round": 0 });
    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/rounds", event.id))
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    // Second click from the same stale screen
    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/rounds", event.id))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "ROUND_CONFLICT",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    Ok(())
}

#[tokio::test]
async fn invalid_group_size_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 3).await?;
    join_test_participants(db, &event, 4).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/rounds", event.id))
        .set_json(json!({ "group_size": 40, "duration_minutes": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_GROUP_SIZE",
        StatusCode::BAD_REQUEST,
        Some("40"),
    )
    .await;
    Ok(())
}

#[tokio::test]
async fn complete_event_and_replay_transitions() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let event = create_test_event(db, 1).await?;
    join_test_participants(db, &event, 3).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/rounds", event.id))
        .set_json(json!({ "group_size": 3, "duration_minutes": 5 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    // No body at all is accepted
    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/complete", event.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Value = test::read_body_json(resp).await;
    assert_eq!(completed["event"]["status"], "ENDED");
    assert_eq!(completed["transitions"], json!([{ "type": "event_ended" }]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}/transitions", event.id))
        .to_request();
    let replay: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        replay["transitions"],
        json!([
            { "type": "event_started" },
            { "type": "round_started", "round_no": 1 },
            { "type": "event_ended" },
        ])
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/events/{}/complete", event.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "PHASE_MISMATCH",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    Ok(())
}
