use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::db::require_db;
use crate::error::AppError;
use crate::routes::views::ParticipantView;
use crate::services::connections::ConnectionService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct ConnectionsResponse {
    participant_id: i64,
    event_id: i64,
    mutual: Vec<ParticipantView>,
    one_way: Vec<ParticipantView>,
}

/// GET /api/participants/{participant_id}/connections
async fn connections(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let view = ConnectionService::new()
        .connections_for(db, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ConnectionsResponse {
        participant_id: view.participant.id,
        event_id: view.participant.event_id,
        mutual: ParticipantView::list(view.mutual)?,
        one_way: ParticipantView::list(view.one_way)?,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{participant_id}/connections", web::get().to(connections));
}
