//! Location and employee endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, Error, FormInput, RequestContext};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::locations as db;
use crate::models::{Employee, Location};
use crate::services;
use crate::validators;
use crate::AppState;

/// GET /api/locations
pub async fn list_locations(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<Location>>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(db::list_locations(&state.db, &ctx.company_id, &params).await?))
}

/// POST /api/locations
pub async fn create_location(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_location(&FormInput::from_json(body))?;
    let id = services::create_location(&state.db, &ctx.company_id, &ctx.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/locations/:id
pub async fn get_location(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Location>> {
    ctx.require(MODULE, Action::View)?;
    let location = db::get_location(&state.db, &ctx.company_id, &id)
        .await?
        .ok_or_else(|| Error::not_found("location", &id))?;
    Ok(Json(location))
}

/// GET /api/employees
///
/// `search` matches first name, last name and email.
pub async fn list_employees(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<Employee>>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(db::list_employees(&state.db, &ctx.company_id, &params).await?))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_employee(&FormInput::from_json(body))?;
    let id = services::create_employee(&state.db, &ctx.company_id, &ctx.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    ctx.require(MODULE, Action::View)?;
    let employee = db::get_employee(&state.db, &ctx.company_id, &id)
        .await?
        .ok_or_else(|| Error::not_found("employee", &id))?;
    Ok(Json(employee))
}
