//! Quality document and step endpoints

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
use crate::db::quality_documents::{self as db, QualityDocumentFilters};
use crate::models::{QualityDocument, QualityDocumentStep};
use crate::services::quality_documents as documents;
use crate::services::{
    QualityDocumentCreate, QualityDocumentStepCreate, QualityDocumentStepUpdate, QualityDocumentUpdate,
};
use crate::validators;
use crate::AppState;

/// GET /api/quality-documents
pub async fn list_quality_documents(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<QualityDocumentFilters>,
) -> ApiResult<Json<Page<QualityDocument>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_quality_documents(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/quality-documents
pub async fn create_quality_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_quality_document(&FormInput::from_json(body))?;
    let id = documents::upsert_quality_document(
        &state.db,
        &ctx.company_id,
        Upsert::Create(QualityDocumentCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/quality-documents/:id
pub async fn get_quality_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<QualityDocument>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(documents::get_quality_document(&state.db, &ctx.company_id, &id).await?))
}

/// PUT /api/quality-documents/:id
pub async fn update_quality_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_quality_document(&FormInput::from_json(body))?;
    documents::upsert_quality_document(
        &state.db,
        &ctx.company_id,
        Upsert::Update(QualityDocumentUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/quality-documents/:id
pub async fn delete_quality_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    documents::delete_quality_document(&state.db, &ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The document id comes from the path, not the body
fn step_input(document_id: &str, mut body: Value) -> FormInput {
    if let Some(fields) = body.as_object_mut() {
        fields.insert("qualityDocumentId".to_string(), json!(document_id));
    }
    FormInput::from_json(body)
}

/// GET /api/quality-documents/:id/steps
pub async fn list_steps(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<QualityDocumentStep>>> {
    ctx.require(MODULE, Action::View)?;
    let steps = documents::list_quality_document_steps(&state.db, &ctx.company_id, &id).await?;
    Ok(Json(steps))
}

/// POST /api/quality-documents/:id/steps
pub async fn create_step(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_quality_document_step(&step_input(&id, body))?;
    let step_id = documents::upsert_quality_document_step(
        &state.db,
        &ctx.company_id,
        Upsert::Create(QualityDocumentStepCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": step_id }))))
}

/// PUT /api/quality-documents/:id/steps/:step_id
pub async fn update_step(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, step_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_quality_document_step(&step_input(&id, body))?;
    documents::upsert_quality_document_step(
        &state.db,
        &ctx.company_id,
        Upsert::Update(QualityDocumentStepUpdate {
            id: step_id,
            updated_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/quality-documents/:id/steps/:step_id
pub async fn delete_step(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((_id, step_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    documents::delete_quality_document_step(&state.db, &ctx, &step_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
