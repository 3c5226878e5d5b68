use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

use crate::error::HttpError;
use crate::middleware::authorize;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct ReadyReport {
    pub status: &'static str,
    pub event_log: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

/// Ready once the event log answers a ping within the request timeout.
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyReport>) {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let event_log = match timeout(Duration::from_secs(timeout_secs), state.event_repo.ping()).await {
        Ok(Ok(())) => "ok",
        Ok(Err(err)) => {
            error!("event log ping failed: {}", err);
            "error"
        }
        Err(_) => {
            error!("event log ping timed out after {}s", timeout_secs);
            "timeout"
        }
    };
    if event_log == "ok" {
        (StatusCode::OK, Json(ReadyReport { status: "ready", event_log }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyReport { status: "unavailable", event_log }),
        )
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<([(header::HeaderName, &'static str); 1], String), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok((
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render_prometheus(),
    ))
}
