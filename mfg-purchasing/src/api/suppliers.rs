//! Supplier endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::query::{ListParams, Page};
use mfg_common::{Action, Error, FormInput, RequestContext};
use serde::Serialize;
use serde_json::{json, Value};

use super::MODULE;
use crate::db::suppliers as db;
use crate::models::{Supplier, SupplierPayment, SupplierShipping};
use crate::services::suppliers as service;
use crate::validators;
use crate::AppState;

/// Supplier with its default terms
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub payment: Option<SupplierPayment>,
    pub shipping: Option<SupplierShipping>,
}

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<Supplier>>> {
    ctx.require(MODULE, Action::View)?;
    Ok(Json(db::list_suppliers(&state.db, &ctx.company_id, &params).await?))
}

/// POST /api/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require(MODULE, Action::Create)?;
    let form = validators::validate_supplier(&FormInput::from_json(body))?;
    let id = service::create_supplier(&state.db, &ctx.company_id, form, &ctx.user_id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /api/suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<SupplierDetail>> {
    ctx.require(MODULE, Action::View)?;
    let (supplier, payment, shipping) = tokio::try_join!(
        db::get_supplier(&state.db, &ctx.company_id, &id),
        db::get_supplier_payment(&state.db, &ctx.company_id, &id),
        db::get_supplier_shipping(&state.db, &ctx.company_id, &id),
    )?;
    let supplier = supplier.ok_or_else(|| Error::not_found("supplier", &id))?;
    Ok(Json(SupplierDetail {
        supplier,
        payment,
        shipping,
    }))
}

/// PATCH /api/suppliers/:id
pub async fn update_supplier(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let patch = validators::validate_supplier_patch(&FormInput::from_json(body))?;
    service::update_supplier(&state.db, &ctx.company_id, &id, patch, &ctx.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/suppliers/:id/payment
pub async fn put_supplier_payment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_supplier_payment(&FormInput::from_json(body))?;
    service::upsert_supplier_payment(&state.db, &ctx.company_id, &id, form, &ctx.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/suppliers/:id/shipping
pub async fn put_supplier_shipping(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    ctx.require(MODULE, Action::Update)?;
    let form = validators::validate_supplier_shipping(&FormInput::from_json(body))?;
    service::upsert_supplier_shipping(&state.db, &ctx.company_id, &id, form, &ctx.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
