use actix_web::http::StatusCode;
use actix_web::test;
use mingle::AppError;
use serde_json::{json, Value};

use crate::support::{build_test_state, create_test_app};

#[tokio::test]
async fn create_join_and_view_event() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(json!({ "name": "Founders Breakfast", "total_rounds": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let code = created["event"]["code"].as_str().unwrap().to_string();
    assert_eq!(created["event"]["status"], "LOBBY");
    assert_eq!(created["event"]["total_rounds"], 3);

    let req = test::TestRequest::post()
        .uri("/api/events/join")
        .set_json(json!({
            "event_code": code.to_lowercase(),
            "name": "Ada",
            "company": "Analytical Engines",
            "offers": ["mentoring"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let joined: Value = test::read_body_json(resp).await;
    assert_eq!(joined["participant"]["name"], "Ada");
    assert_eq!(joined["participant"]["offers"], json!(["mentoring"]));
    assert_eq!(joined["event"]["code"], code);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{code}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let overview: Value = test::read_body_json(resp).await;
    assert_eq!(overview["participant_count"], 1);
    assert_eq!(overview["phase"]["phase"], "lobby");
    assert!(overview.get("current_round").is_none());
    Ok(())
}

#[tokio::test]
async fn join_without_name_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(json!({ "name": "Meetup" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let code = created["event"]["code"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/events/join")
        .set_json(json!({ "event_code": code, "name": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MISSING_FIELD");
    Ok(())
}
