//! mfg-resources library - Resources module
//!
//! Locations and employees, work centers with their rates, maintenance
//! dispatches against work centers, and trainings with assignments,
//! completions and the per-employee status rollup.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod models;
pub mod services;
pub mod validators;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .merge(mfg_common::api::health_routes(
            "mfg-resources",
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
