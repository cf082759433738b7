use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::connections::{ConnectionService, SaveContact};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub event_id: i64,
    pub round_id: i64,
    pub from_participant_id: i64,
    pub to_participant_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RetractRequest {
    pub event_id: i64,
    pub from_participant_id: i64,
    pub to_participant_id: i64,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    created: bool,
}

#[derive(Debug, Serialize)]
struct RetractResponse {
    removed: bool,
}

/// POST /api/saves
///
/// Idempotent: repeating a save answers 200 with `created: false`.
async fn save_contact(
    body: ValidatedJson<SaveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let created = ConnectionService::new()
        .save_contact(
            db,
            SaveContact {
                event_id: body.event_id,
                round_id: body.round_id,
                from: body.from_participant_id,
                to: body.to_participant_id,
            },
        )
        .await?;

    let response = SaveResponse { created };
    Ok(if created {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}

/// DELETE /api/saves
async fn retract_contact(
    body: ValidatedJson<RetractRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let removed = ConnectionService::new()
        .retract_contact(
            db,
            body.event_id,
            body.from_participant_id,
            body.to_participant_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(RetractResponse { removed }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(save_contact))
        .route("", web::delete().to(retract_contact));
}
