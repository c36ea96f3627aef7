//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health check response: status, module name and version
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// `GET /health` for one service; requires no request context
pub fn health_routes<S>(module: &'static str, version: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok".to_string(),
                module: module.to_string(),
                version: version.to_string(),
            })
        }),
    )
}
