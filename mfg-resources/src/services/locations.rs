//! Locations and employees

use mfg_common::db::{set_default_location, RollbackLog};
use mfg_common::{CompanyId, Error, Result, UserId};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::locations;
use crate::validators::{EmployeeForm, LocationForm};

pub async fn create_location(
    pool: &SqlitePool,
    company_id: &CompanyId,
    created_by: &UserId,
    form: LocationForm,
) -> Result<String> {
    let id = locations::insert_location(pool, company_id, &form, created_by).await?;
    info!("Created location {} ({}) in company {}", form.name, id, company_id);
    Ok(id)
}

/// Insert the employee and their job row carrying the default location
///
/// The job row is part of the employee; if it cannot be written the
/// employee is removed again.
pub async fn create_employee(
    pool: &SqlitePool,
    company_id: &CompanyId,
    created_by: &UserId,
    form: EmployeeForm,
) -> Result<String> {
    if let Some(location_id) = form.location_id.as_deref() {
        locations::get_location(pool, company_id, location_id)
            .await?
            .ok_or_else(|| Error::not_found("location", location_id))?;
    }

    let mut written = RollbackLog::new(company_id);

    let id = locations::insert_employee(pool, company_id, &form, created_by)
        .await
        .map_err(|e| Error::orchestration("insert employee", e))?;
    written.record("employee", &id);

    if let Err(e) = set_default_location(pool, company_id, &id, form.location_id.as_deref(), created_by).await {
        return Err(written.abort(pool, "insert employee job", e).await);
    }

    info!(
        "Created employee {} {} ({}) in company {}",
        form.first_name, form.last_name, id, company_id
    );
    Ok(id)
}
