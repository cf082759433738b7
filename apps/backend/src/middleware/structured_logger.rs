//! Access log keyed by route rather than raw path.
//!
//! Raw paths embed event, round and participant ids, so every request would
//! be a distinct "endpoint" in log aggregation. The logger records the
//! matched pattern (`/api/events/{event_id}/rounds`) and lifts the ids into
//! their own fields instead.

use std::future::{ready, Ready};
use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, StatusCode};
use actix_web::{Error as ActixError, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

/// Requests slower than this log at `warn` even when they succeed. Round
/// starts that wait on an oracle are the usual culprits.
pub const SLOW_REQUEST: Duration = Duration::from_secs(2);

/// Pattern recorded for requests no resource matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route identity of a handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFields {
    pub route: String,
    pub event_id: Option<String>,
    pub round_id: Option<String>,
    pub participant_id: Option<String>,
}

impl RouteFields {
    /// Read after routing; before that the request has no match info.
    pub fn from_request(req: &HttpRequest) -> Self {
        let info = req.match_info();
        let param = |name: &str| info.get(name).map(str::to_owned);
        Self {
            route: req
                .match_pattern()
                .unwrap_or_else(|| UNMATCHED_ROUTE.to_string()),
            event_id: param("event_id").or_else(|| param("code")),
            round_id: param("round_id"),
            participant_id: param("participant_id"),
        }
    }

    fn unmatched() -> Self {
        Self {
            route: UNMATCHED_ROUTE.to_string(),
            event_id: None,
            round_id: None,
            participant_id: None,
        }
    }
}

/// One `request_completed` line per request.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let trace_id = req.extensions().get::<String>().cloned();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, fields) = match &result {
                Ok(res) => (res.status(), RouteFields::from_request(res.request())),
                Err(err) => (
                    err.as_response_error().status_code(),
                    RouteFields::unmatched(),
                ),
            };
            log_completed(
                &method,
                status,
                &fields,
                start.elapsed(),
                trace_id.as_deref().unwrap_or("unknown"),
            );

            result
        })
    }
}

fn log_completed(
    method: &Method,
    status: StatusCode,
    fields: &RouteFields,
    elapsed: Duration,
    trace_id: &str,
) {
    let duration_ms = elapsed.as_millis() as u64;
    let slow = elapsed >= SLOW_REQUEST;

    macro_rules! emit {
        ($level:ident) => {
            $level!(
                http.method = %method,
                http.route = %fields.route,
                http.status_code = status.as_u16(),
                event_id = fields.event_id.as_deref(),
                round_id = fields.round_id.as_deref(),
                participant_id = fields.participant_id.as_deref(),
                duration_ms,
                slow,
                trace_id,
                "request_completed"
            )
        };
    }

    if status.is_server_error() {
        emit!(error);
    } else if status.is_client_error() || slow {
        emit!(warn);
    } else {
        emit!(info);
    }
}
