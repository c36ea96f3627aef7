//! Training, assignment and completion endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, FormInput, RequestContext, Upsert};
use serde::Deserialize;
use serde_json::{json, Value};

use super::MODULE;
use crate::db::trainings::{self as db, TrainingFilters};
use crate::models::{Training, TrainingAssignmentStatus, TrainingCompletion};
use crate::services;
use crate::services::{TrainingCreate, TrainingUpdate};
use crate::validators;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStatusQuery {
    pub training_id: Option<String>,
}

/// GET /api/trainings
///
/// Accepts the list parameters, `status` and `type`.
pub async fn list_trainings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<TrainingFilters>,
) -> ApiResult<Json<Page<Training>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_trainings(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/trainings
pub async fn create_training(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_training(&FormInput::from_json(body))?;
    let id = services::upsert_training(
        &state.db,
        &ctx.company_id,
        Upsert::Create(TrainingCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/trainings/:id
pub async fn get_training(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Training>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(services::get_training(&state.db, &ctx.company_id, &id).await?))
}

/// PUT /api/trainings/:id
pub async fn update_training(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_training(&FormInput::from_json(body))?;
    services::upsert_training(
        &state.db,
        &ctx.company_id,
        Upsert::Update(TrainingUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/trainings/:id/assignments
///
/// Body: `{ "employeeIds": ["..."] }`; responds with the number newly assigned.
pub async fn assign_training(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let employee_ids = validators::validate_training_assignment(&FormInput::from_json(body))?;
    let assigned = services::assign_training(&state.db, &ctx, &id, &employee_ids).await?;
    Ok(Json(json!({ "assigned": assigned })))
}

/// POST /api/trainings/:id/completions
pub async fn record_completion(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<TrainingCompletion>)> {
    let form = validators::validate_training_completion(&FormInput::from_json(body))?;
    let completion = services::record_training_completion(&state.db, &ctx, &id, form).await?;
    Ok((StatusCode::CREATED, Json(completion)))
}

/// GET /api/training-assignment-status
///
/// One row per active assignment; `trainingId` narrows to one training.
pub async fn assignment_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<AssignmentStatusQuery>,
) -> ApiResult<Json<Vec<TrainingAssignmentStatus>>> {
    let rows = services::training_assignment_status(&state.db, &ctx, query.training_id.as_deref()).await?;
    Ok(Json(rows))
}
