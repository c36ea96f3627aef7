//! Gauge and calibration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, DocumentRef, FormInput, RequestContext, Upsert};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::gauges::{self as db, GaugeFilters};
use crate::models::{Gauge, GaugeCalibrationRecord};
use crate::services::gauges as register;
use crate::services::{GaugeCreate, GaugeUpdate};
use crate::validators;
use crate::AppState;

/// GET /api/gauges
///
/// Accepts the list parameters and `gaugeCalibrationStatus`.
pub async fn list_gauges(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<GaugeFilters>,
) -> ApiResult<Json<Page<Gauge>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_gauges(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/gauges
pub async fn create_gauge(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<DocumentRef>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_gauge(&FormInput::from_json(body))?;
    let created = register::upsert_gauge(
        &state.db,
        &ctx.company_id,
        Upsert::Create(GaugeCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/gauges/:id
pub async fn get_gauge(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Gauge>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(register::get_gauge(&state.db, &ctx.company_id, &id).await?))
}

/// PUT /api/gauges/:id
pub async fn update_gauge(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DocumentRef>> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_gauge(&FormInput::from_json(body))?;
    let updated = register::upsert_gauge(
        &state.db,
        &ctx.company_id,
        Upsert::Update(GaugeUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok(Json(updated))
}

/// GET /api/gauges/:id/calibrations
pub async fn list_calibrations(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<GaugeCalibrationRecord>>> {
    ctx.require(MODULE, Action::View)?;
    register::get_gauge(&state.db, &ctx.company_id, &id).await?;
    let page = db::list_calibration_records(&state.db, &ctx.company_id, Some(id.as_str()), &params).await?;
    Ok(Json(page))
}

/// POST /api/gauges/:id/calibrations
pub async fn record_calibration(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if let Some(fields) = body.as_object_mut() {
        fields.insert("gaugeId".to_string(), json!(id));
    }
    let form = validators::validate_calibration_record(&FormInput::from_json(body))?;
    let record_id = register::record_gauge_calibration(&state.db, &ctx, form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": record_id }))))
}

/// GET /api/gauge-calibration-records
///
/// Every gauge's history, newest first; `search` matches notes.
pub async fn list_calibration_records(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<GaugeCalibrationRecord>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_calibration_records(&state.db, &ctx.company_id, None, &params).await?;
    Ok(Json(page))
}
