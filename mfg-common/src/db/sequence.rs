//! Per-tenant human-readable document numbers

use sqlx::SqlitePool;
use tracing::debug;

use crate::context::CompanyId;
use crate::Result;

/// Documents numbered from the `sequence` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    PurchaseOrder,
    SupplierQuote,
    Issue,
    MaintenanceDispatch,
}

impl SequenceKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            SequenceKind::PurchaseOrder => "purchase_order",
            SequenceKind::SupplierQuote => "supplier_quote",
            SequenceKind::Issue => "issue",
            SequenceKind::MaintenanceDispatch => "maintenance_dispatch",
        }
    }

    /// Prefix used when the tenant has no sequence row yet
    pub fn default_prefix(&self) -> &'static str {
        match self {
            SequenceKind::PurchaseOrder => "PO-",
            SequenceKind::SupplierQuote => "SQ-",
            SequenceKind::Issue => "NCR-",
            SequenceKind::MaintenanceDispatch => "MAINT-",
        }
    }
}

const DEFAULT_SIZE: i64 = 5;

/// Allocate the next readable id, e.g. `PO-00042`
///
/// Allocation is one atomic statement, so concurrent callers never receive
/// the same number. A missing sequence row is created starting at 1.
pub async fn next_sequence(
    pool: &SqlitePool,
    company_id: &CompanyId,
    kind: SequenceKind,
) -> Result<String> {
    let (prefix, value, size): (String, i64, i64) = sqlx::query_as(
        r#"
        INSERT INTO sequence (company_id, table_name, prefix, next_value, size)
        VALUES (?, ?, ?, 1, ?)
        ON CONFLICT (company_id, table_name)
        DO UPDATE SET next_value = next_value + 1
        RETURNING prefix, next_value, size
        "#,
    )
    .bind(company_id.as_str())
    .bind(kind.table_name())
    .bind(kind.default_prefix())
    .bind(DEFAULT_SIZE)
    .fetch_one(pool)
    .await?;

    let readable = format_sequence(&prefix, value, size);
    debug!("Allocated {} for {}", readable, kind.table_name());
    Ok(readable)
}

fn format_sequence(prefix: &str, value: i64, size: i64) -> String {
    let width = usize::try_from(size).unwrap_or(0);
    format!("{}{:0width$}", prefix, value, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[test]
    fn test_format_pads_to_size() {
        assert_eq!(format_sequence("PO-", 42, 5), "PO-00042");
        assert_eq!(format_sequence("NCR-", 123456, 5), "NCR-123456");
        assert_eq!(format_sequence("X", 7, -1), "X7");
    }

    #[tokio::test]
    async fn test_sequence_increments_per_tenant_and_kind() {
        let pool = init_memory_database().await.unwrap();
        let acme = CompanyId::new("acme");
        let globex = CompanyId::new("globex");

        assert_eq!(
            next_sequence(&pool, &acme, SequenceKind::PurchaseOrder).await.unwrap(),
            "PO-00001"
        );
        assert_eq!(
            next_sequence(&pool, &acme, SequenceKind::PurchaseOrder).await.unwrap(),
            "PO-00002"
        );
        assert_eq!(
            next_sequence(&pool, &globex, SequenceKind::PurchaseOrder).await.unwrap(),
            "PO-00001"
        );
        assert_eq!(
            next_sequence(&pool, &acme, SequenceKind::Issue).await.unwrap(),
            "NCR-00001"
        );
    }

    #[tokio::test]
    async fn test_existing_row_keeps_custom_prefix() {
        let pool = init_memory_database().await.unwrap();
        sqlx::query(
            "INSERT INTO sequence (company_id, table_name, prefix, next_value, size) VALUES ('acme', 'supplier_quote', 'RFQ', 9, 3)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let id = next_sequence(&pool, &CompanyId::new("acme"), SequenceKind::SupplierQuote)
            .await
            .unwrap();
        assert_eq!(id, "RFQ010");
    }
}
