//! Purchase order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, DocumentRef, Error, FormInput, FormReader, RequestContext, Upsert};
use serde_json::{json, Value};

use super::MODULE;
use crate::db::purchase_orders::{self as db, PurchaseOrderFilters};
use crate::models::{PurchaseOrder, PurchaseOrderDetail, PurchaseOrderLine, PurchaseOrderStatus};
use crate::services::{self, purchase_order_lines as lines, PurchaseOrderCreate, PurchaseOrderUpdate};
use crate::validators;
use crate::AppState;

/// GET /api/purchase-orders
///
/// Accepts `search`, `page`, `pageSize`, `sort`, `order`, `status` and
/// `supplierId`.
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
    Query(filters): Query<PurchaseOrderFilters>,
) -> ApiResult<Json<Page<PurchaseOrder>>> {
    ctx.require(MODULE, Action::View)?;
    let page = db::list_purchase_orders(&state.db, &ctx.company_id, &params, &filters).await?;
    Ok(Json(page))
}

/// POST /api/purchase-orders
pub async fn create_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<DocumentRef>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_purchase_order(&FormInput::from_json(body))?;

    let created = services::upsert_purchase_order(
        &state.db,
        &ctx.company_id,
        Upsert::Create(PurchaseOrderCreate {
            created_by: ctx.user_id.clone(),
            form,
        }),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/purchase-orders/:id
pub async fn get_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrderDetail>> {
    ctx.require(MODULE, Action::View)?;
    services::get_purchase_order(&state.db, &ctx.company_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("purchase order", &id))
}

/// PATCH /api/purchase-orders/:id
pub async fn update_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<DocumentRef>> {
    ctx.require(MODULE, Action::Update)?;
    let patch = validators::validate_purchase_order_patch(&FormInput::from_json(body))?;

    let updated = services::upsert_purchase_order(
        &state.db,
        &ctx.company_id,
        Upsert::Update(PurchaseOrderUpdate {
            id,
            updated_by: ctx.user_id.clone(),
            patch,
        }),
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/purchase-orders/:id
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    services::delete_purchase_order(&state.db, &ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/purchase-orders/:id/status
///
/// Body: `{ "status": "Closed" }`
pub async fn update_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PurchaseOrder>> {
    let input = FormInput::from_json(body);
    let mut reader = FormReader::new(&input);
    let status: PurchaseOrderStatus = reader.required_enum("status");
    reader.into_rules()?.finish()?;

    let order = services::update_purchase_order_status(&state.db, &ctx, &id, status).await?;
    Ok(Json(order))
}

/// POST /api/purchase-orders/:id/release
pub async fn release(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PurchaseOrder>> {
    let form = validators::validate_release(&FormInput::from_json(body))?;
    let order = services::release_purchase_order(&state.db, &ctx, &id, form).await?;
    Ok(Json(order))
}

/// GET /api/purchase-orders/:id/lines
pub async fn list_lines(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PurchaseOrderLine>>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(lines::list_purchase_order_lines(&state.db, &ctx, &id).await?))
}

/// POST /api/purchase-orders/:id/lines
pub async fn create_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let form = validators::validate_purchase_order_line(&FormInput::from_json(body))?;
    let line_id = lines::create_purchase_order_line(&state.db, &ctx, &id, form).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": line_id }))))
}

/// PUT /api/purchase-orders/:id/lines/:line_id
pub async fn update_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, line_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    let form = validators::validate_purchase_order_line(&FormInput::from_json(body))?;
    lines::update_purchase_order_line(&state.db, &ctx, &id, &line_id, form).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/purchase-orders/:id/lines/:line_id
pub async fn delete_line(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, line_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    lines::delete_purchase_order_line(&state.db, &ctx, &id, &line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
