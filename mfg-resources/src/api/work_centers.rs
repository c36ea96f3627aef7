//! Work center endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, FormInput, RequestContext, Upsert};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::work_centers::{self as db, WorkCenterFilters};
use crate::models::WorkCenter;
use crate::services;
use crate::services::{WorkCenterCreate, WorkCenterUpdate};
use crate::validators;
use crate::AppState;

/// GET /api/work-centers
///
/// Accepts the list parameters, `locationId` and `active`.
pub async fn list_work_centers(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<WorkCenterFilters>,
) -> ApiResult<Json<Page<WorkCenter>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_work_centers(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/work-centers
pub async fn create_work_center(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_work_center(&FormInput::from_json(body))?;
    let id = services::upsert_work_center(
        &state.db,
        &ctx.company_id,
        Upsert::Create(WorkCenterCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/work-centers/:id
pub async fn get_work_center(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkCenter>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(services::get_work_center(&state.db, &ctx.company_id, &id).await?))
}

/// PUT /api/work-centers/:id
pub async fn update_work_center(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_work_center(&FormInput::from_json(body))?;
    services::upsert_work_center(
        &state.db,
        &ctx.company_id,
        Upsert::Update(WorkCenterUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/work-centers/:id/deactivate
pub async fn deactivate_work_center(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    services::deactivate_work_center(&state.db, &ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
