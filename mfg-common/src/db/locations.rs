//! Employee default locations

use sqlx::SqlitePool;

use crate::context::{CompanyId, UserId};
use crate::Result;

/// Location of the user's employee job; `None` when the user has no job row
/// or no location on it
pub async fn get_default_location(
    pool: &SqlitePool,
    company_id: &CompanyId,
    user_id: &UserId,
) -> Result<Option<String>> {
    let location: Option<Option<String>> = sqlx::query_scalar(
        "SELECT location_id FROM employee_job WHERE employee_id = ? AND company_id = ?",
    )
    .bind(user_id.as_str())
    .bind(company_id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(location.flatten())
}

/// Create or replace the user's default location
pub async fn set_default_location(
    pool: &SqlitePool,
    company_id: &CompanyId,
    employee_id: &str,
    location_id: Option<&str>,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO employee_job (employee_id, company_id, location_id, updated_by, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (employee_id, company_id)
        DO UPDATE SET location_id = excluded.location_id,
                      updated_by = excluded.updated_by,
                      updated_at = excluded.updated_at
        "#,
    )
    .bind(employee_id)
    .bind(company_id.as_str())
    .bind(location_id)
    .bind(actor.as_str())
    .bind(crate::time::now())
    .execute(pool)
    .await?;
    Ok(())
}
