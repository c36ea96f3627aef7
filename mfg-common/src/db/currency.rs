//! Currency exchange rates

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::context::CompanyId;
use crate::Result;

/// Rate applied to a document together with the moment it was stamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRateStamp {
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// Exchange rate for `code`; `None` when the tenant has no such currency
pub async fn get_exchange_rate(
    pool: &SqlitePool,
    company_id: &CompanyId,
    code: &str,
) -> Result<Option<f64>> {
    let rate = sqlx::query_scalar("SELECT exchange_rate FROM currency WHERE company_id = ? AND code = ?")
        .bind(company_id.as_str())
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(rate)
}

/// Create or replace a currency's rate
pub async fn set_exchange_rate(
    pool: &SqlitePool,
    company_id: &CompanyId,
    code: &str,
    rate: f64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO currency (company_id, code, exchange_rate, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (company_id, code)
        DO UPDATE SET exchange_rate = excluded.exchange_rate, updated_at = excluded.updated_at
        "#,
    )
    .bind(company_id.as_str())
    .bind(code)
    .bind(rate)
    .bind(crate::time::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Rate to stamp on a document: the currency's rate, or 1 when no currency
/// is given or the tenant has no rate for it
pub async fn resolve_exchange_rate(
    pool: &SqlitePool,
    company_id: &CompanyId,
    code: Option<&str>,
) -> Result<ExchangeRateStamp> {
    let rate = match code {
        Some(code) => get_exchange_rate(pool, company_id, code).await?,
        None => None,
    };

    if rate.is_none() {
        debug!("No exchange rate for {:?}, using 1", code);
    }

    Ok(ExchangeRateStamp {
        rate: rate.unwrap_or(1.0),
        updated_at: crate::time::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn test_unknown_currency_defaults_to_one() {
        let pool = init_memory_database().await.unwrap();
        let acme = CompanyId::new("acme");

        assert_eq!(get_exchange_rate(&pool, &acme, "EUR").await.unwrap(), None);
        let stamp = resolve_exchange_rate(&pool, &acme, Some("EUR")).await.unwrap();
        assert_eq!(stamp.rate, 1.0);
        let stamp = resolve_exchange_rate(&pool, &acme, None).await.unwrap();
        assert_eq!(stamp.rate, 1.0);
    }

    #[tokio::test]
    async fn test_rates_are_per_tenant() {
        let pool = init_memory_database().await.unwrap();
        let acme = CompanyId::new("acme");
        set_exchange_rate(&pool, &acme, "EUR", 0.92).await.unwrap();
        set_exchange_rate(&pool, &acme, "EUR", 0.9).await.unwrap();

        let stamp = resolve_exchange_rate(&pool, &acme, Some("EUR")).await.unwrap();
        assert_eq!(stamp.rate, 0.9);
        assert_eq!(
            get_exchange_rate(&pool, &CompanyId::new("globex"), "EUR")
                .await
                .unwrap(),
            None
        );
    }
}
