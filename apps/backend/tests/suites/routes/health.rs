use actix_web::http::StatusCode;
use actix_web::test;
use mingle::config::engine::EngineConfig;
use mingle::state::app_state::AppState;
use mingle::AppError;
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[tokio::test]
async fn health_reports_db_and_matcher() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["matcher"], "balanced");
    assert_ne!(body["migrations"], "unknown");
    Ok(())
}

#[tokio::test]
async fn health_without_db_still_answers() -> Result<(), AppError> {
    let state = AppState::without_db(EngineConfig::default());
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "error");
    assert!(body["db_error"].as_str().is_some());
    Ok(())
}
