//! HTTP API routes and handlers.
//!
//! Four GET routes over shared [`AppState`]:
//!
//! - `/lookup/{username}` - run a scan and return found profiles
//! - `/status` - uptime and request counters
//! - `/platforms` - static platform sample (scanner probe gated)
//! - `/health` - scanner availability (503 when the executable is gone)
//!
//! Every route carries the permissive CORS policy the frontend expects.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, warn};

use sleuth_core::error::LookupError;
use sleuth_core::types::{SERVICE_NAME, utc_timestamp};

use crate::state::AppState;

/// Static platform sample returned by `/platforms`.
///
/// The scanner does not expose its site list programmatically; the probe
/// only proves the executable responds.
const PLATFORM_SAMPLE: [&str; 11] = [
    "Twitter",
    "Instagram",
    "GitHub",
    "LinkedIn",
    "Facebook",
    "YouTube",
    "TikTok",
    "Reddit",
    "Discord",
    "Telegram",
    "And 390+ more...",
];

/// Build the API router with all routes and the CORS layer.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/lookup/{username}", get(lookup_username))
        .route("/status", get(service_status))
        .route("/platforms", get(platform_list))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// `GET /lookup/{username}` - scan for the username across platforms.
///
/// Validation failures return 400 with the raw username echoed back;
/// scanner timeouts and launch failures still return 200 with zero
/// results (the degraded path is not an error to callers).
async fn lookup_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Response {
    let _guard = state.counters.track_request();

    match state.service.lookup(&username).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => lookup_error_response(&username, &err),
    }
}

/// Map a lookup error onto the wire shape for its status code.
fn lookup_error_response(username: &str, err: &LookupError) -> Response {
    match err.status_code() {
        400 => {
            debug!(username, error = %err, "rejected lookup request");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": err.to_string(),
                    "username": username,
                })),
            )
                .into_response()
        }
        _ => {
            error!(username, error = %err, "lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": err.to_string(),
                    "username": username,
                    "timestamp": utc_timestamp(),
                })),
            )
                .into_response()
        }
    }
}

/// `GET /status` - service liveness, uptime, and request counters.
async fn service_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = state.uptime();

    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "uptime_seconds": round2(uptime.as_secs_f64()),
        "uptime": format_uptime(uptime.as_secs()),
        "total_requests": state.counters.total_requests(),
        "active_requests": state.counters.active_requests(),
        "timestamp": utc_timestamp(),
    }))
}

/// `GET /platforms` - platform sample, gated on a `--help` probe.
///
/// Exit code is not inspected; a probe that reaches exit proves the
/// executable can answer, which is all this endpoint promises.
async fn platform_list(State(state): State<Arc<AppState>>) -> Response {
    let outcome = state.service.platforms_probe().await;

    if outcome.completed() {
        (
            StatusCode::OK,
            Json(json!({
                "platforms": PLATFORM_SAMPLE,
                "total_platforms": "400+",
                "note": "Sherlock checks 400+ platforms automatically",
            })),
        )
            .into_response()
    } else {
        let error = if outcome.timed_out {
            "scanner platform probe timed out"
        } else {
            "scanner executable could not be launched"
        };
        warn!(error, "platform probe failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": error,
                "platforms": [],
                "total_platforms": "unknown",
            })),
        )
            .into_response()
    }
}

/// `GET /health` - scanner availability via a `--version` probe.
///
/// Healthy and degraded both answer 200 (the HTTP server itself works);
/// only an unlaunchable or hanging scanner yields 503.
async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let health = state.service.health_check().await;

    if health.status.is_unhealthy() {
        let error = health
            .error
            .unwrap_or_else(|| "scanner unavailable".to_owned());
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "error": error,
                "sherlock_available": false,
                "timestamp": utc_timestamp(),
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": health.status.to_string(),
                "sherlock_available": health.available,
                "runtime_working": true,
                "server_working": true,
                "timestamp": utc_timestamp(),
            })),
        )
            .into_response()
    }
}

/// Format an uptime as total minutes and seconds, e.g. `"72m 9s"`.
///
/// Minutes are not wrapped into hours; long uptimes keep growing the
/// minute count.
fn format_uptime(total_secs: u64) -> String {
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}

/// Round to two decimal places for wire payloads.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
