//! Supplier quote endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, DocumentRef, Error, FormInput, RequestContext, Upsert};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::supplier_quotes::{self as db, SupplierQuoteFilters};
use crate::models::{SupplierQuote, SupplierQuoteLine};
use crate::services::supplier_quote_upsert as quotes;
use crate::services::{SupplierQuoteCreate, SupplierQuoteUpdate};
use crate::validators;
use crate::AppState;

/// GET /api/supplier-quotes
pub async fn list_supplier_quotes(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<SupplierQuoteFilters>,
) -> ApiResult<Json<Page<SupplierQuote>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_supplier_quotes(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/supplier-quotes
pub async fn create_supplier_quote(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<DocumentRef>)> {
    ctx.require(MODULE, Action::Create)?;
    let today = ctx.today();
    let form = validators::validate_supplier_quote(&FormInput::from_json(body), today)?;

    let created = quotes::upsert_supplier_quote(
        &state.db,
        &ctx.company_id,
        today,
        Upsert::Create(SupplierQuoteCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/supplier-quotes/:id
pub async fn get_supplier_quote(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<SupplierQuote>> {
    ctx.require(MODULE, Action::View)?;
    db::get_supplier_quote(&state.db, &ctx.company_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("supplier quote", &id))
}

/// PATCH /api/supplier-quotes/:id
pub async fn update_supplier_quote(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DocumentRef>> {
    ctx.require(MODULE, Action::Update)?;
    let today = ctx.today();
    let patch = validators::validate_supplier_quote_patch(&FormInput::from_json(body), today)?;

    let updated = quotes::upsert_supplier_quote(
        &state.db,
        &ctx.company_id,
        today,
        Upsert::Update(SupplierQuoteUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            patch,
        }),
    )
    .await?;
    Ok(Json(updated))
}

/// GET /api/supplier-quotes/:id/lines
pub async fn list_lines(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SupplierQuoteLine>>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(quotes::list_supplier_quote_lines(&state.db, &ctx, &id).await?))
}

/// POST /api/supplier-quotes/:id/lines
pub async fn create_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let form = validators::validate_supplier_quote_line(&FormInput::from_json(body))?;
    let line_id = quotes::create_supplier_quote_line(&state.db, &ctx, &id, form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": line_id }))))
}

/// PUT /api/supplier-quotes/:id/lines/:line_id
pub async fn update_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, line_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    let form = validators::validate_supplier_quote_line(&FormInput::from_json(body))?;
    quotes::update_supplier_quote_line(&state.db, &ctx, &id, &line_id, form).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/supplier-quotes/:id/lines/:line_id
pub async fn delete_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, line_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    quotes::delete_supplier_quote_line(&state.db, &ctx, &id, &line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
