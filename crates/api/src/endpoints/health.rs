//! Liveness check.

use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}
