//! Issue attachments

use axum::{
    extract::{Path, State},
    Json,
};
use mfg_common::api::ApiResult;
use mfg_common::storage::FileMetadata;
use mfg_common::{Action, RequestContext};

use super::MODULE;
use crate::services;
use crate::AppState;

const BUCKET: &str = "issues";

/// GET /api/issues/:id/files
pub async fn list_issue_files(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<FileMetadata>>> {
    ctx.require(MODULE, Action::View)?;
    services::get_issue(&state.db, &ctx.company_id, &id).await?;
    Ok(Json(state.documents.list(&ctx.company_id, BUCKET, &id).await?))
}
