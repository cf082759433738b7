use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::domain::{RoundPhase, RoundTransition};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::routes::views::{rfc3339, EventView, GroupView, ParticipantView, RoundView};
use crate::services::rounds::StartRound;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartRoundRequest {
    pub group_size: i16,
    pub duration_minutes: i16,
    /// Round counter the organizer screen last showed
    #[serde(default)]
    pub expected_round: Option<i16>,
}

#[derive(Debug, Serialize)]
struct RoundStartedResponse {
    event: EventView,
    round: RoundView,
    groups: Vec<GroupView>,
    transitions: Vec<RoundTransition>,
    fell_back: bool,
}

/// POST /api/events/{event_id}/rounds
async fn start_round(
    path: web::Path<i64>,
    body: ValidatedJson<StartRoundRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let started = app_state
        .round_service()
        .start_round(
            db,
            StartRound {
                event_id: path.into_inner(),
                group_size: body.group_size,
                duration_minutes: body.duration_minutes,
                expected_round: body.expected_round,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(RoundStartedResponse {
        event: EventView::from_event(started.event)?,
        round: RoundView::from_round(started.round)?,
        groups: started.groups.into_iter().map(GroupView::from).collect(),
        transitions: started.transitions,
        fell_back: started.fell_back,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteEventRequest {
    #[serde(default)]
    pub expected_round: Option<i16>,
}

#[derive(Debug, Serialize)]
struct EventCompletedResponse {
    event: EventView,
    transitions: Vec<RoundTransition>,
}

/// POST /api/events/{event_id}/complete
async fn complete_event(
    path: web::Path<i64>,
    body: Option<ValidatedJson<CompleteEventRequest>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let expected_round = body.and_then(|b| b.into_inner().expected_round);
    let (event, transitions) = app_state
        .round_service()
        .complete_event(db, path.into_inner(), expected_round)
        .await?;

    Ok(HttpResponse::Ok().json(EventCompletedResponse {
        event: EventView::from_event(event)?,
        transitions,
    }))
}

#[derive(Debug, Serialize)]
struct CurrentRoundResponse {
    event_id: i64,
    phase: RoundPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<RoundView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_seconds: Option<i64>,
    server_now: String,
}

/// GET /api/events/{event_id}/rounds/current
async fn current_round(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let current = app_state
        .round_service()
        .current_round(db, path.into_inner(), OffsetDateTime::now_utc())
        .await?;

    Ok(HttpResponse::Ok().json(CurrentRoundResponse {
        event_id: current.event.id,
        phase: current.phase,
        round: current.round.map(RoundView::from_round).transpose()?,
        remaining_seconds: current.remaining_seconds,
        server_now: rfc3339(current.server_now)?,
    }))
}

#[derive(Debug, Serialize)]
struct TransitionsResponse {
    event_id: i64,
    transitions: Vec<RoundTransition>,
}

/// GET /api/events/{event_id}/transitions
async fn transitions(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let event_id = path.into_inner();
    let transitions = app_state.round_service().transitions(db, event_id).await?;

    Ok(HttpResponse::Ok().json(TransitionsResponse {
        event_id,
        transitions,
    }))
}

#[derive(Debug, Serialize)]
struct ParticipantGroupResponse {
    round: RoundView,
    /// Absent when the participant sits this round out
    group: Option<GroupView>,
    members: Vec<ParticipantView>,
}

/// GET /api/rounds/{round_id}/participants/{participant_id}/group
async fn participant_group(
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let (round_id, participant_id) = path.into_inner();
    let found = app_state
        .round_service()
        .group_for_participant(db, round_id, participant_id)
        .await?;

    Ok(HttpResponse::Ok().json(ParticipantGroupResponse {
        round: RoundView::from_round(found.round)?,
        group: found.group.map(GroupView::from),
        members: ParticipantView::list(found.members)?,
    }))
}

/// Routes nested under `/api/events`.
pub fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{event_id}/rounds", web::post().to(start_round))
        .route("/{event_id}/rounds/current", web::get().to(current_round))
        .route("/{event_id}/complete", web::post().to(complete_event))
        .route("/{event_id}/transitions", web::get().to(transitions));
}

/// Routes under `/api/rounds`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/{round_id}/participants/{participant_id}/group",
        web::get().to(participant_group),
    );
}
