//! Health endpoints.
//!
//! - `GET /health` - process is up
//! - `GET /health/live` - liveness
//! - `GET /health/ready` - database reachable, with registry sizes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::startup::AppState;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Pin the uptime origin to server startup rather than the first readiness call.
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
    pub cached_rooms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
}

impl ReadinessResponse {
    fn status_code(&self) -> StatusCode {
        if self.database_error.is_none() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 200 while the database answers, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let database_error = sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .err()
        .map(|e| e.to_string());

    let response = ReadinessResponse {
        status: if database_error.is_none() { "ready" } else { "unavailable" },
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        active_sessions: state.hub.presence().session_count(),
        cached_rooms: state.hub.rooms().len(),
        database_error,
    };

    (response.status_code(), Json(response))
}
