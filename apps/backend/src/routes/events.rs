use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::domain::RoundPhase;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::repos::participants::NewParticipant;
use crate::routes::views::{EventView, ParticipantView, RoundView};
use crate::services::events::{CreateEvent, EventService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub total_rounds: Option<i16>,
    #[serde(default)]
    pub organizer_email: Option<String>,
}

#[derive(Debug, Serialize)]
struct EventResponse {
    event: EventView,
}

/// POST /api/events
async fn create_event(
    body: ValidatedJson<CreateEventRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let event = EventService::new()
        .create_event(
            db,
            CreateEvent {
                name: body.name,
                total_rounds: body.total_rounds,
                organizer_email: body.organizer_email,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(EventResponse {
        event: EventView::from_event(event)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct JoinEventRequest {
    pub event_code: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub offers: Vec<String>,
    #[serde(default)]
    pub seeks: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
struct JoinEventResponse {
    participant: ParticipantView,
    event: EventView,
}

/// POST /api/events/join
async fn join_event(
    body: ValidatedJson<JoinEventRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let (event, participant) = EventService::new()
        .join_event(
            db,
            &body.event_code,
            NewParticipant {
                name: body.name,
                company: body.company,
                role: body.role,
                offers: body.offers,
                seeks: body.seeks,
                industries: body.industries,
                bio: body.bio,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(JoinEventResponse {
        participant: ParticipantView::from_participant(participant)?,
        event: EventView::from_event(event)?,
    }))
}

#[derive(Debug, Serialize)]
struct EventOverviewResponse {
    event: EventView,
    phase: RoundPhase,
    participant_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_round: Option<RoundView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_groups: Option<u64>,
}

/// GET /api/events/{code}
async fn event_overview(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let overview = EventService::new().event_overview(db, &path).await?;

    Ok(HttpResponse::Ok().json(EventOverviewResponse {
        event: EventView::from_event(overview.event)?,
        phase: overview.phase,
        participant_count: overview.participant_count,
        current_round: overview.current_round.map(RoundView::from_round).transpose()?,
        expected_groups: overview.expected_groups,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_event))
        .route("/join", web::post().to(join_event))
        .route("/{code}", web::get().to(event_overview));
}
