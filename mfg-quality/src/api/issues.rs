//! Issue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, CatalogEnum, DocumentRef, Error, FormInput, FormReader, RequestContext};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::issues::{self as db, IssueFilters};
use crate::models::{Issue, IssueAssociationKind, IssueAssociations, IssueStatus};
use crate::services;
use crate::validators;
use crate::AppState;

/// GET /api/issues
///
/// Accepts `search`, `page`, `pageSize`, `sort`, `order`, `status`,
/// `priority` and `assignee`.
pub async fn list_issues(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<IssueFilters>,
) -> ApiResult<Json<Page<Issue>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_issues(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/issues
pub async fn create_issue(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<DocumentRef>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_issue(&FormInput::from_json(body))?;
    let created = services::create_issue(&state.db, &ctx.company_id, &ctx.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/issues/:id
pub async fn get_issue(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Issue>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(services::get_issue(&state.db, &ctx.company_id, &id).await?))
}

/// PATCH /api/issues/:id
pub async fn update_issue(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DocumentRef>> {
    ctx.require(MODULE, Action::Update)?;
    let patch = validators::validate_issue_patch(&FormInput::from_json(body))?;
    let updated = services::update_issue(&state.db, &ctx.company_id, &id, patch, &ctx.user_id).await?;
    Ok(Json(updated))
}

/// DELETE /api/issues/:id
pub async fn delete_issue(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    services::delete_issue(&state.db, &ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/issues/:id/status
///
/// Body: `{ "status": "Closed" }`
pub async fn update_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Issue>> {
    let input = FormInput::from_json(body);
    let mut reader = FormReader::new(&input);
    let status: IssueStatus = reader.required_enum("status");
    reader.into_rules()?.finish()?;

    let issue = services::update_issue_status(&state.db, &ctx, &id, status).await?;
    Ok(Json(issue))
}

fn association_kind(label: &str) -> Result<IssueAssociationKind, Error> {
    IssueAssociationKind::parse_label(label)
        .ok_or_else(|| Error::NotFound(format!("Unknown issue association kind {}", label)))
}

/// GET /api/issues/:id/associations
pub async fn list_associations(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<IssueAssociations>> {
    let associations = services::list_issue_associations(&state.db, &ctx, &id).await?;
    Ok(Json(associations))
}

/// POST /api/issues/:id/associations/:kind
///
/// Body: `{ "targetId": "..." }`
pub async fn add_association(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, kind)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let kind = association_kind(&kind)?;
    let input = FormInput::from_json(body);
    let mut reader = FormReader::new(&input);
    let target_id = reader.required_str("targetId");
    reader.into_rules()?.finish()?;

    let association_id = services::add_issue_association(&state.db, &ctx, kind, &id, &target_id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": association_id }))))
}

/// DELETE /api/issues/:id/associations/:kind/:association_id
pub async fn delete_association(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((_id, kind, association_id)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let kind = association_kind(&kind)?;
    services::delete_issue_association(&state.db, &ctx, kind, &association_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
