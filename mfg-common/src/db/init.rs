//! Database initialization
//!
//! Creates the database file on first run and the full schema idempotently
//! (`CREATE TABLE IF NOT EXISTS`), then runs versioned migrations. Every table
//! carries `company_id`; satellites and child rows cascade from their header.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::Result;

/// Issue association tables and the column naming the associated entity
pub const ISSUE_ASSOCIATION_TABLES: [(&str, &str); 9] = [
    ("issue_item", "item_id"),
    ("issue_customer", "customer_id"),
    ("issue_supplier", "supplier_id"),
    ("issue_job_operation", "job_operation_id"),
    ("issue_purchase_order_line", "purchase_order_line_id"),
    ("issue_sales_order_line", "sales_order_line_id"),
    ("issue_shipment_line", "shipment_line_id"),
    ("issue_receipt_line", "receipt_line_id"),
    ("issue_tracked_entity", "tracked_entity_id"),
];

/// Open (creating if needed) the database file and bring the schema up to date
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    crate::db::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the full schema
///
/// Each `sqlite::memory:` connection is its own database, so the pool is
/// capped at one connection.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    crate::db::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

/// Create every table (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_reference_tables(pool).await?;
    create_purchasing_tables(pool).await?;
    create_quality_tables(pool).await?;
    create_resources_tables(pool).await?;
    Ok(())
}

async fn execute_all(pool: &SqlitePool, statements: &[&str]) -> Result<()> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Sequences, currencies, locations, employees and suppliers
async fn create_reference_tables(pool: &SqlitePool) -> Result<()> {
    execute_all(
        pool,
        &[
            r#"
            CREATE TABLE IF NOT EXISTS sequence (
                company_id TEXT NOT NULL,
                table_name TEXT NOT NULL,
                prefix TEXT NOT NULL,
                next_value INTEGER NOT NULL,
                size INTEGER NOT NULL DEFAULT 5,
                PRIMARY KEY (company_id, table_name)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS currency (
                company_id TEXT NOT NULL,
                code TEXT NOT NULL,
                name TEXT,
                exchange_rate REAL NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (company_id, code)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS location (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                timezone TEXT,
                address_line_1 TEXT,
                city TEXT,
                country_code TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS employee (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS employee_job (
                employee_id TEXT NOT NULL REFERENCES employee(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL,
                location_id TEXT REFERENCES location(id) ON DELETE SET NULL,
                title TEXT,
                updated_by TEXT,
                updated_at TEXT,
                PRIMARY KEY (employee_id, company_id)
            )
            "#,
            r#"
            CREATE VIEW IF NOT EXISTS employee_with_location AS
            SELECT e.id, e.company_id, e.first_name, e.last_name, e.email, e.active,
                   j.location_id, e.created_by, e.created_at
            FROM employee e
            LEFT JOIN employee_job j
                ON j.employee_id = e.id AND j.company_id = e.company_id
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                currency_code TEXT,
                tax_id TEXT,
                website TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier_payment (
                supplier_id TEXT PRIMARY KEY REFERENCES supplier(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL,
                payment_term_id TEXT,
                invoice_supplier_id TEXT,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier_shipping (
                supplier_id TEXT PRIMARY KEY REFERENCES supplier(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL,
                shipping_method_id TEXT,
                shipping_term_id TEXT,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier_interaction (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                supplier_id TEXT NOT NULL REFERENCES supplier(id) ON DELETE CASCADE,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        ],
    )
    .await?;

    info!("Reference tables ready");
    Ok(())
}

async fn create_purchasing_tables(pool: &SqlitePool) -> Result<()> {
    execute_all(
        pool,
        &[
            r#"
            CREATE TABLE IF NOT EXISTS purchase_order (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                purchase_order_id TEXT NOT NULL,
                purchase_order_type TEXT NOT NULL DEFAULT 'Purchase',
                status TEXT NOT NULL DEFAULT 'Draft',
                supplier_id TEXT NOT NULL REFERENCES supplier(id),
                supplier_interaction_id TEXT REFERENCES supplier_interaction(id),
                supplier_contact_id TEXT,
                supplier_location_id TEXT,
                supplier_reference TEXT,
                order_date TEXT,
                currency_code TEXT,
                exchange_rate REAL NOT NULL DEFAULT 1,
                exchange_rate_updated_at TEXT,
                notes TEXT,
                closed_at TEXT,
                closed_by TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT,
                UNIQUE (company_id, purchase_order_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS purchase_order_delivery (
                id TEXT PRIMARY KEY REFERENCES purchase_order(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL,
                location_id TEXT,
                shipping_method_id TEXT,
                shipping_term_id TEXT,
                receipt_requested_date TEXT,
                receipt_promised_date TEXT,
                drop_shipment INTEGER NOT NULL DEFAULT 0,
                customer_id TEXT,
                customer_location_id TEXT,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS purchase_order_payment (
                id TEXT PRIMARY KEY REFERENCES purchase_order(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL,
                payment_term_id TEXT,
                invoice_supplier_id TEXT,
                payment_complete INTEGER NOT NULL DEFAULT 0,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS purchase_order_line (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                purchase_order_id TEXT NOT NULL REFERENCES purchase_order(id) ON DELETE CASCADE,
                purchase_order_line_type TEXT NOT NULL,
                item_id TEXT,
                description TEXT,
                purchase_quantity REAL,
                unit_price REAL,
                location_id TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier_quote (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                supplier_quote_id TEXT NOT NULL,
                supplier_id TEXT NOT NULL REFERENCES supplier(id),
                supplier_interaction_id TEXT REFERENCES supplier_interaction(id),
                supplier_reference TEXT,
                status TEXT NOT NULL DEFAULT 'Active',
                quoted_date TEXT,
                expiration_date TEXT,
                currency_code TEXT,
                exchange_rate REAL NOT NULL DEFAULT 1,
                exchange_rate_updated_at TEXT,
                notes TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT,
                UNIQUE (company_id, supplier_quote_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS supplier_quote_line (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                supplier_quote_id TEXT NOT NULL REFERENCES supplier_quote(id) ON DELETE CASCADE,
                item_id TEXT NOT NULL,
                description TEXT,
                quantity REAL NOT NULL,
                unit_price REAL NOT NULL DEFAULT 0,
                lead_time INTEGER NOT NULL DEFAULT 0,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
        ],
    )
    .await?;

    info!("Purchasing tables ready");
    Ok(())
}

async fn create_quality_tables(pool: &SqlitePool) -> Result<()> {
    execute_all(
        pool,
        &[
            r#"
            CREATE TABLE IF NOT EXISTS issue (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                issue_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'Registered',
                priority TEXT NOT NULL DEFAULT 'Medium',
                location_id TEXT,
                assignee TEXT,
                open_date TEXT NOT NULL,
                due_date TEXT,
                close_date TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT,
                UNIQUE (company_id, issue_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS quality_document (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'Draft',
                content TEXT,
                assignee TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS quality_document_step (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                quality_document_id TEXT NOT NULL REFERENCES quality_document(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                type TEXT NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0,
                unit_of_measure_code TEXT,
                min_value REAL,
                max_value REAL,
                list_values TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS gauge (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                gauge_id TEXT NOT NULL,
                description TEXT,
                serial_number TEXT,
                location_id TEXT,
                gauge_status TEXT NOT NULL DEFAULT 'Active',
                gauge_calibration_status TEXT NOT NULL DEFAULT 'Pending',
                calibration_interval_in_months INTEGER NOT NULL DEFAULT 12,
                last_calibration_date TEXT,
                next_calibration_date TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT,
                UNIQUE (company_id, gauge_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS gauge_calibration_record (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                gauge_id TEXT NOT NULL REFERENCES gauge(id) ON DELETE CASCADE,
                date_calibrated TEXT NOT NULL,
                inspection_status TEXT NOT NULL,
                requires_action INTEGER NOT NULL DEFAULT 0,
                requires_adjustment INTEGER NOT NULL DEFAULT 0,
                requires_repair INTEGER NOT NULL DEFAULT 0,
                notes TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
        ],
    )
    .await?;

    for (table, column) in ISSUE_ASSOCIATION_TABLES {
        let statement = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                issue_id TEXT NOT NULL REFERENCES issue(id) ON DELETE CASCADE,
                {column} TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (issue_id, {column})
            )
            "#
        );
        sqlx::query(&statement).execute(pool).await?;
    }

    info!("Quality tables ready");
    Ok(())
}

async fn create_resources_tables(pool: &SqlitePool) -> Result<()> {
    execute_all(
        pool,
        &[
            r#"
            CREATE TABLE IF NOT EXISTS work_center (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                location_id TEXT NOT NULL REFERENCES location(id),
                labor_rate REAL NOT NULL DEFAULT 0,
                machine_rate REAL NOT NULL DEFAULT 0,
                overhead_rate REAL NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 1,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS maintenance_dispatch (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                maintenance_dispatch_id TEXT NOT NULL,
                work_center_id TEXT NOT NULL REFERENCES work_center(id),
                status TEXT NOT NULL DEFAULT 'Open',
                priority TEXT NOT NULL DEFAULT 'Medium',
                source TEXT NOT NULL DEFAULT 'Reactive',
                description TEXT,
                assignee TEXT,
                planned_start_time TEXT,
                planned_end_time TEXT,
                actual_start_time TEXT,
                actual_end_time TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT,
                UNIQUE (company_id, maintenance_dispatch_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS training (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                frequency TEXT NOT NULL DEFAULT 'Once',
                type TEXT NOT NULL DEFAULT 'Mandatory',
                status TEXT NOT NULL DEFAULT 'Draft',
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS training_assignment (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                training_id TEXT NOT NULL REFERENCES training(id) ON DELETE CASCADE,
                employee_id TEXT NOT NULL REFERENCES employee(id) ON DELETE CASCADE,
                assigned_on TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (training_id, employee_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS training_completion (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                training_id TEXT NOT NULL REFERENCES training(id) ON DELETE CASCADE,
                employee_id TEXT NOT NULL REFERENCES employee(id) ON DELETE CASCADE,
                completed_on TEXT NOT NULL,
                period TEXT NOT NULL,
                notes TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        ],
    )
    .await?;

    info!("Resources tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_memory_database_has_full_schema() {
        let pool = init_memory_database().await.unwrap();
        let tables = table_names(&pool).await;
        for expected in [
            "sequence",
            "currency",
            "employee_job",
            "supplier_interaction",
            "purchase_order",
            "purchase_order_delivery",
            "purchase_order_payment",
            "supplier_quote",
            "issue",
            "gauge_calibration_record",
            "maintenance_dispatch",
            "training_completion",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {}", expected);
        }
        for (table, _) in ISSUE_ASSOCIATION_TABLES {
            assert!(tables.iter().any(|t| t == table), "missing {}", table);
        }
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        create_schema(&pool).await.unwrap();
        crate::db::migrations::run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = init_memory_database().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO purchase_order_delivery (id, company_id) VALUES ('missing', 'acme')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
