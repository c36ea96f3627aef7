//! Database schema migrations
//!
//! Versioned, idempotent migrations tracked in `schema_version`. Tables are
//! created by [`crate::db::init::create_schema`]; migrations only transform
//! what already exists.
//!
//! Never modify an existing migration; add a new `migrate_vN` and bump
//! [`CURRENT_SCHEMA_VERSION`].

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::Result;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Tables queried by tenant in list views
const TENANT_INDEXED_TABLES: [&str; 14] = [
    "location",
    "employee",
    "supplier",
    "purchase_order",
    "purchase_order_line",
    "supplier_quote",
    "supplier_quote_line",
    "issue",
    "quality_document",
    "gauge",
    "gauge_calibration_record",
    "work_center",
    "maintenance_dispatch",
    "training",
];

/// Latest applied version, 0 when nothing has been applied
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("Migration v2 completed");
    }

    Ok(())
}

/// Migration v1: tenant indexes on every listed table
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    for table in TENANT_INDEXED_TABLES {
        let statement = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_company ON {table}(company_id)"
        );
        sqlx::query(&statement).execute(pool).await?;
    }

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_purchase_order_line_order ON purchase_order_line(purchase_order_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_supplier_quote_line_quote ON supplier_quote_line(supplier_quote_id)",
    )
    .execute(pool)
    .await?;

    info!("  Created tenant indexes on {} tables", TENANT_INDEXED_TABLES.len());
    Ok(())
}

/// Migration v2: documents written before rate stamping get the neutral rate
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    let mut backfilled = 0;
    for table in ["purchase_order", "supplier_quote"] {
        let statement = format!(
            "UPDATE {table} SET exchange_rate = 1 WHERE exchange_rate IS NULL OR exchange_rate <= 0"
        );
        backfilled += sqlx::query(&statement).execute(pool).await?.rows_affected();
    }

    if backfilled > 0 {
        info!("  Backfilled exchange rate on {} documents", backfilled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_database_reaches_current_version() {
        let pool = crate::db::init::init_memory_database().await.unwrap();
        assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_tenant_indexes_exist() {
        let pool = crate::db::init::init_memory_database().await.unwrap();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%_company'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, TENANT_INDEXED_TABLES.len() as i64);
    }
}
