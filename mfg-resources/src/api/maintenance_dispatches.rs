//! Maintenance dispatch endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, DocumentRef, FormInput, FormReader, RequestContext};
use serde_json::Value;

use super::MODULE;
use crate::db::maintenance_dispatches::{self as db, MaintenanceDispatchFilters};
use crate::models::{MaintenanceDispatch, MaintenanceDispatchStatus};
use crate::services;
use crate::validators;
use crate::AppState;

/// GET /api/maintenance-dispatches
///
/// Accepts the list parameters, `status`, `workCenterId` and `assignee`.
pub async fn list_maintenance_dispatches(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<MaintenanceDispatchFilters>,
) -> ApiResult<Json<Page<MaintenanceDispatch>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_dispatches(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/maintenance-dispatches
pub async fn create_maintenance_dispatch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<DocumentRef>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_maintenance_dispatch(&FormInput::from_json(body))?;
    let created = services::create_maintenance_dispatch(&state.db, &ctx.company_id, &ctx.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/maintenance-dispatches/:id
pub async fn get_maintenance_dispatch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MaintenanceDispatch>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(
        services::get_maintenance_dispatch(&state.db, &ctx.company_id, &id).await?,
    ))
}

/// PATCH /api/maintenance-dispatches/:id
pub async fn update_maintenance_dispatch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DocumentRef>> {
    ctx.require(MODULE, Action::Update)?;
    let patch = validators::validate_maintenance_dispatch_patch(&FormInput::from_json(body))?;
    let updated =
        services::update_maintenance_dispatch(&state.db, &ctx.company_id, &id, patch, &ctx.user_id).await?;
    Ok(Json(updated))
}

/// POST /api/maintenance-dispatches/:id/status
///
/// Body: `{ "status": "In Progress" }`
pub async fn update_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<MaintenanceDispatch>> {
    let input = FormInput::from_json(body);
    let mut reader = FormReader::new(&input);
    let status: MaintenanceDispatchStatus = reader.required_enum("status");
    reader.into_rules()?.finish()?;

    let dispatch = services::update_maintenance_dispatch_status(&state.db, &ctx, &id, status).await?;
    Ok(Json(dispatch))
}
