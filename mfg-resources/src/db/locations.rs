//! Location and employee queries

use mfg_common::query::{ListParams, ListQuery, Page, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use sqlx::SqlitePool;

use crate::models::{Employee, Location};
use crate::validators::{EmployeeForm, LocationForm};

const LOCATION_SORT: &[&str] = &["name", "city", "created_at"];
const EMPLOYEE_SORT: &[&str] = &["last_name", "first_name", "created_at"];

/// Employees joined to their job location; `ListQuery` reads it like a table
const EMPLOYEE_VIEW: &str = "employee_with_location";

pub async fn insert_location(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &LocationForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO location (
            id, company_id, name, timezone, address_line_1, city, country_code, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.name)
    .bind(&form.timezone)
    .bind(&form.address_line_1)
    .bind(&form.city)
    .bind(&form.country_code)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn get_location(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Location>> {
    let location = sqlx::query_as("SELECT * FROM location WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(location)
}

pub async fn list_locations(pool: &SqlitePool, company_id: &CompanyId, params: &ListParams) -> Result<Page<Location>> {
    ListQuery::new("location", company_id)
        .search(&["name", "city"], params.search.as_deref())
        .sort(LOCATION_SORT, "name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}

pub async fn insert_employee(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &EmployeeForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO employee (id, company_id, first_name, last_name, email, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.first_name)
    .bind(&form.last_name)
    .bind(&form.email)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn get_employee(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Employee>> {
    let employee = sqlx::query_as(&format!("SELECT * FROM {} WHERE id = ? AND company_id = ?", EMPLOYEE_VIEW))
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn list_employees(pool: &SqlitePool, company_id: &CompanyId, params: &ListParams) -> Result<Page<Employee>> {
    ListQuery::new(EMPLOYEE_VIEW, company_id)
        .search(&["first_name", "last_name", "email"], params.search.as_deref())
        .sort(EMPLOYEE_SORT, "last_name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}
