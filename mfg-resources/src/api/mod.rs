//! HTTP API handlers for mfg-resources

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub mod locations;
pub mod maintenance_dispatches;
pub mod options;
pub mod trainings;
pub mod work_centers;

pub(crate) use crate::services::MODULE;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route("/api/locations/:id", get(locations::get_location))
        .route(
            "/api/employees",
            get(locations::list_employees).post(locations::create_employee),
        )
        .route("/api/employees/:id", get(locations::get_employee))
        .route(
            "/api/work-centers",
            get(work_centers::list_work_centers).post(work_centers::create_work_center),
        )
        .route(
            "/api/work-centers/:id",
            get(work_centers::get_work_center).put(work_centers::update_work_center),
        )
        .route("/api/work-centers/:id/deactivate", post(work_centers::deactivate_work_center))
        .route(
            "/api/maintenance-dispatches",
            get(maintenance_dispatches::list_maintenance_dispatches)
                .post(maintenance_dispatches::create_maintenance_dispatch),
        )
        .route(
            "/api/maintenance-dispatches/:id",
            get(maintenance_dispatches::get_maintenance_dispatch)
                .patch(maintenance_dispatches::update_maintenance_dispatch),
        )
        .route(
            "/api/maintenance-dispatches/:id/status",
            post(maintenance_dispatches::update_status),
        )
        .route("/api/trainings", get(trainings::list_trainings).post(trainings::create_training))
        .route(
            "/api/trainings/:id",
            get(trainings::get_training).put(trainings::update_training),
        )
        .route("/api/trainings/:id/assignments", post(trainings::assign_training))
        .route("/api/trainings/:id/completions", post(trainings::record_completion))
        .route("/api/training-assignment-status", get(trainings::assignment_status))
        .route(
            "/api/options/maintenance-dispatch-statuses",
            get(options::maintenance_dispatch_statuses),
        )
        .route("/api/options/maintenance-priorities", get(options::maintenance_priorities))
        .route("/api/options/maintenance-sources", get(options::maintenance_sources))
        .route("/api/options/training-frequencies", get(options::training_frequencies))
        .route("/api/options/training-types", get(options::training_types))
        .route("/api/options/training-statuses", get(options::training_statuses))
}
