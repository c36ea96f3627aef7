//! Work centers

use mfg_common::{Action, CompanyId, Error, RequestContext, Result, Upsert, UserId};
use sqlx::SqlitePool;
use tracing::info;

use super::MODULE;
use crate::db::{locations, work_centers};
use crate::models::WorkCenter;
use crate::validators::WorkCenterForm;

#[derive(Debug, Clone)]
pub struct WorkCenterCreate {
    pub created_by: UserId,
    pub form: WorkCenterForm,
}

#[derive(Debug, Clone)]
pub struct WorkCenterUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub form: WorkCenterForm,
}

/// Returns the work center's row id
pub async fn upsert_work_center(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<WorkCenterCreate, WorkCenterUpdate>,
) -> Result<String> {
    let form = match &request {
        Upsert::Create(create) => &create.form,
        Upsert::Update(update) => &update.form,
    };
    locations::get_location(pool, company_id, &form.location_id)
        .await?
        .ok_or_else(|| Error::not_found("location", &form.location_id))?;

    match request {
        Upsert::Create(WorkCenterCreate { created_by, form }) => {
            let id = work_centers::insert_work_center(pool, company_id, &form, &created_by).await?;
            info!("Created work center {} ({}) in company {}", form.name, id, company_id);
            Ok(id)
        }
        Upsert::Update(WorkCenterUpdate { id, updated_by, form }) => {
            if work_centers::update_work_center(pool, company_id, &id, form, &updated_by).await? == 0 {
                return Err(Error::not_found("work center", &id));
            }
            Ok(id)
        }
    }
}

pub async fn get_work_center(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<WorkCenter> {
    work_centers::get_work_center(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("work center", id))
}

/// Work centers are never deleted; dispatches and routings keep pointing at them
pub async fn deactivate_work_center(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    let work_center = get_work_center(pool, &ctx.company_id, id).await?;
    if !work_center.active {
        return Ok(());
    }
    work_centers::set_active(pool, &ctx.company_id, id, false, &ctx.user_id).await?;
    info!("Deactivated work center {} ({})", work_center.name, id);
    Ok(())
}
