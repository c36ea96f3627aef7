//! Purchase order attachments

use axum::{
    extract::{Path, State},
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::storage::FileMetadata;
use mfg_common::{Action, Error, RequestContext};

use super::MODULE;
use crate::db::purchase_orders;
use crate::AppState;

const BUCKET: &str = "purchase-orders";

/// GET /api/purchase-orders/:id/files
pub async fn list_purchase_order_files(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<FileMetadata>>> {
    ctx.require(MODULE, Action::View)?;
    purchase_orders::get_purchase_order(&state.db, &ctx.company_id, &id)
        .await?
        .ok_or_else(|| Error::not_found("purchase order", &id))?;

    let files = state.documents.list(&ctx.company_id, BUCKET, &id).await?;
    Ok(Json(files))
}
