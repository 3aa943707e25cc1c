use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::Ctx;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/health", get(health))
}
