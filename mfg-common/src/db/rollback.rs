//! Compensating deletes for multi-step document creation
//!
//! SQLite writes in an orchestration are issued one statement at a time so
//! each step can be named in the failure. Every successful insert is recorded
//! here; when a later step fails the recorded rows are deleted newest first.

use sqlx::SqlitePool;
use tracing::{error, info};

use crate::context::CompanyId;
use crate::Error;

#[derive(Debug, Clone)]
struct Written {
    table: &'static str,
    id: String,
}

/// Rows written so far by one orchestration
#[derive(Debug, Clone)]
pub struct RollbackLog {
    company_id: CompanyId,
    written: Vec<Written>,
}

impl RollbackLog {
    pub fn new(company_id: &CompanyId) -> Self {
        Self {
            company_id: company_id.clone(),
            written: Vec::new(),
        }
    }

    /// Record a row keyed by `id`
    pub fn record(&mut self, table: &'static str, id: impl Into<String>) {
        self.written.push(Written {
            table,
            id: id.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Delete every recorded row, newest first
    ///
    /// Never fails: a compensation that cannot be applied is logged and the
    /// remaining ones still run. Returns the number of rows deleted.
    pub async fn unwind(self, pool: &SqlitePool) -> u64 {
        let mut deleted = 0;
        for written in self.written.iter().rev() {
            let statement = format!("DELETE FROM {} WHERE id = ? AND company_id = ?", written.table);
            match sqlx::query(&statement)
                .bind(&written.id)
                .bind(self.company_id.as_str())
                .execute(pool)
                .await
            {
                Ok(result) => deleted += result.rows_affected(),
                Err(e) => error!(
                    "Rollback of {} {} failed: {}",
                    written.table, written.id, e
                ),
            }
        }
        deleted
    }

    /// Unwind, then wrap `source` as an orchestration failure of `step`
    pub async fn abort(self, pool: &SqlitePool, step: &'static str, source: Error) -> Error {
        let steps = self.len();
        let deleted = self.unwind(pool).await;
        info!(
            "{} failed, rolled back {} of {} written rows",
            step, deleted, steps
        );
        Error::orchestration(step, source)
    }
}
