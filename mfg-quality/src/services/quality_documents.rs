//! Quality documents and their inspection steps

use mfg_common::{Action, CompanyId, Error, RequestContext, Result, Upsert, UserId};
use sqlx::SqlitePool;
use tracing::info;

use super::issues::MODULE;
use crate::db::quality_documents;
use crate::models::{QualityDocument, QualityDocumentStep};
use crate::validators::{QualityDocumentForm, QualityDocumentStepForm};

#[derive(Debug, Clone)]
pub struct QualityDocumentCreate {
    pub created_by: UserId,
    pub form: QualityDocumentForm,
}

#[derive(Debug, Clone)]
pub struct QualityDocumentUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub form: QualityDocumentForm,
}

/// Returns the document's row id
pub async fn upsert_quality_document(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<QualityDocumentCreate, QualityDocumentUpdate>,
) -> Result<String> {
    match request {
        Upsert::Create(QualityDocumentCreate { created_by, form }) => {
            let id = quality_documents::insert_quality_document(pool, company_id, &form, &created_by).await?;
            info!("Created quality document {} v{} ({})", form.name, form.version, id);
            Ok(id)
        }
        Upsert::Update(QualityDocumentUpdate { id, updated_by, form }) => {
            if quality_documents::update_quality_document(pool, company_id, &id, form, &updated_by).await? == 0 {
                return Err(Error::not_found("quality document", &id));
            }
            Ok(id)
        }
    }
}

pub async fn get_quality_document(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<QualityDocument> {
    quality_documents::get_quality_document(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("quality document", id))
}

/// Steps cascade with the document
pub async fn delete_quality_document(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    let document = get_quality_document(pool, &ctx.company_id, id).await?;
    quality_documents::delete_quality_document(pool, &ctx.company_id, id).await?;
    info!("Deleted quality document {} ({})", document.name, id);
    Ok(())
}

#[derive(Debug, Clone)]
pub struct QualityDocumentStepCreate {
    pub created_by: UserId,
    pub form: QualityDocumentStepForm,
}

#[derive(Debug, Clone)]
pub struct QualityDocumentStepUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub form: QualityDocumentStepForm,
}

pub async fn upsert_quality_document_step(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<QualityDocumentStepCreate, QualityDocumentStepUpdate>,
) -> Result<String> {
    match request {
        Upsert::Create(QualityDocumentStepCreate { created_by, form }) => {
            get_quality_document(pool, company_id, &form.quality_document_id).await?;
            quality_documents::insert_step(pool, company_id, &form, &created_by).await
        }
        Upsert::Update(QualityDocumentStepUpdate { id, updated_by, form }) => {
            if quality_documents::update_step(pool, company_id, &id, form, &updated_by).await? == 0 {
                return Err(Error::not_found("quality document step", &id));
            }
            Ok(id)
        }
    }
}

pub async fn delete_quality_document_step(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    if quality_documents::delete_step(pool, &ctx.company_id, id).await? == 0 {
        return Err(Error::not_found("quality document step", id));
    }
    Ok(())
}

pub async fn list_quality_document_steps(
    pool: &SqlitePool,
    company_id: &CompanyId,
    quality_document_id: &str,
) -> Result<Vec<QualityDocumentStep>> {
    get_quality_document(pool, company_id, quality_document_id).await?;
    quality_documents::list_steps(pool, company_id, quality_document_id).await
}
