//! Tenant-scoped list query composition and partial updates
//!
//! Every [`ListQuery`] starts from `WHERE company_id = ?`; there is no way to
//! build one without a [`CompanyId`]. Search terms become an OR of
//! case-insensitive partial matches over a fixed column set, equality filters
//! are ANDed on, and the sort column is checked against an allow-list with a
//! per-query default. `id` is always the final tie-breaker so pages never
//! reshuffle between requests.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Encode, QueryBuilder, Sqlite, SqlitePool, Type};
use tracing::debug;

use crate::context::{CompanyId, UserId};
use crate::pagination::{calculate_pagination, clamp_page_size};
use crate::Result;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Generic search/sort/pagination parameters from the query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

/// One page of rows plus the exact total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Value of an equality filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::Text(value.clone())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Integer(value as i64)
    }
}

#[derive(Debug, Clone)]
enum Filter {
    Eq(&'static str, FilterValue),
    Search(&'static [&'static str], String),
}

/// Builder for one tenant-scoped, filtered, sorted, paginated read
#[derive(Debug, Clone)]
pub struct ListQuery {
    table: &'static str,
    columns: &'static str,
    company_id: CompanyId,
    filters: Vec<Filter>,
    sortable: &'static [&'static str],
    default_sort: (&'static str, SortOrder),
}

impl ListQuery {
    /// Start a query over `table` (a table or view with `id` and `company_id`)
    pub fn new(table: &'static str, company_id: &CompanyId) -> Self {
        Self {
            table,
            columns: "*",
            company_id: company_id.clone(),
            filters: Vec::new(),
            sortable: &[],
            default_sort: ("created_at", SortOrder::Desc),
        }
    }

    pub fn columns(mut self, columns: &'static str) -> Self {
        self.columns = columns;
        self
    }

    /// OR of case-insensitive partial matches; blank terms are ignored
    pub fn search(mut self, columns: &'static [&'static str], term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            if !columns.is_empty() {
                self.filters.push(Filter::Search(columns, term.to_lowercase()));
            }
        }
        self
    }

    /// Equality filter; `None` leaves the query unfiltered
    pub fn eq<V: Into<FilterValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.filters.push(Filter::Eq(column, value.into()));
        }
        self
    }

    /// Allowed sort columns and the default sort
    pub fn sort(
        mut self,
        sortable: &'static [&'static str],
        default_column: &'static str,
        default_order: SortOrder,
    ) -> Self {
        self.sortable = sortable;
        self.default_sort = (default_column, default_order);
        self
    }

    fn resolve_sort(&self, params: &ListParams) -> (&'static str, SortOrder) {
        let requested = params
            .sort
            .as_deref()
            .and_then(|s| self.sortable.iter().copied().find(|c| *c == s));
        match requested {
            Some(column) => (column, params.order.unwrap_or(SortOrder::Asc)),
            None => self.default_sort,
        }
    }

    fn push_where<'args>(&self, qb: &mut QueryBuilder<'args, Sqlite>) {
        qb.push(" WHERE company_id = ")
            .push_bind(self.company_id.as_str().to_string());

        for filter in &self.filters {
            match filter {
                Filter::Eq(column, FilterValue::Text(value)) => {
                    qb.push(" AND ").push(column).push(" = ").push_bind(value.clone());
                }
                Filter::Eq(column, FilterValue::Integer(value)) => {
                    qb.push(" AND ").push(column).push(" = ").push_bind(*value);
                }
                Filter::Search(columns, term) => {
                    let pattern = format!("%{}%", escape_like(term));
                    qb.push(" AND (");
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            qb.push(" OR ");
                        }
                        qb.push("LOWER(")
                            .push(column)
                            .push(") LIKE ")
                            .push_bind(pattern.clone())
                            .push(" ESCAPE '\\'");
                    }
                    qb.push(")");
                }
            }
        }
    }

    /// SQL text of the page query (binds shown as `?`)
    pub fn to_sql(&self, params: &ListParams) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            self.columns, self.table
        ));
        self.push_where(&mut qb);
        let (column, order) = self.resolve_sort(params);
        qb.push(format!(" ORDER BY {} {}, id ASC LIMIT ? OFFSET ?", column, order.sql()));
        qb.into_sql()
    }

    /// Run the count and page queries
    pub async fn fetch_page<T>(&self, pool: &SqlitePool, params: &ListParams) -> Result<Page<T>>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut count_qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", self.table));
        self.push_where(&mut count_qb);
        let count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let page_size = clamp_page_size(params.page_size);
        let p = calculate_pagination(count, params.page.unwrap_or(1), page_size);
        let (column, order) = self.resolve_sort(params);

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            self.columns, self.table
        ));
        self.push_where(&mut qb);
        qb.push(format!(" ORDER BY {} {}, id ASC", column, order.sql()));
        qb.push(" LIMIT ").push_bind(page_size);
        qb.push(" OFFSET ").push_bind(p.offset);

        debug!("List query on {}: {}", self.table, qb.sql());

        let rows = qb.build_query_as::<T>().fetch_all(pool).await?;

        Ok(Page {
            rows,
            count,
            page: p.page,
            page_size,
            total_pages: p.total_pages,
        })
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `UPDATE` touching only the supplied columns plus the audit columns
///
/// Columns whose value is `None` are left untouched; pass `Some(None)` for an
/// optional column to clear it.
pub struct PartialUpdate {
    builder: QueryBuilder<'static, Sqlite>,
    assignments: usize,
}

impl PartialUpdate {
    pub fn new(table: &'static str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            assignments: 0,
        }
    }

    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'static + Encode<'static, Sqlite> + Type<Sqlite> + Send,
    {
        if let Some(value) = value {
            if self.assignments > 0 {
                self.builder.push(", ");
            }
            self.builder.push(column).push(" = ").push_bind(value);
            self.assignments += 1;
        }
        self
    }

    /// Whether any non-audit column was set
    pub fn has_changes(&self) -> bool {
        self.assignments > 0
    }

    /// Execute against one tenant row, returning rows affected
    pub async fn execute(
        mut self,
        pool: &SqlitePool,
        company_id: &CompanyId,
        id: &str,
        actor: &UserId,
    ) -> Result<u64> {
        if self.assignments > 0 {
            self.builder.push(", ");
        }
        self.builder
            .push("updated_by = ")
            .push_bind(actor.as_str().to_string())
            .push(", updated_at = ")
            .push_bind(crate::time::now());
        self.builder
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND company_id = ")
            .push_bind(company_id.as_str().to_string());

        let result = self.builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE widget (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                name TEXT NOT NULL,
                colour TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_by TEXT,
                updated_at TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let rows = [
            ("w1", "acme", "Bolt", "red", 1, "2026-01-01"),
            ("w2", "acme", "Big bolt", "blue", 1, "2026-01-02"),
            ("w3", "acme", "Nut", "red", 0, "2026-01-03"),
            ("w4", "globex", "Bolt", "red", 1, "2026-01-04"),
            ("w5", "acme", "50%_off", "green", 1, "2026-01-05"),
        ];
        for (id, company, name, colour, active, created) in rows {
            sqlx::query(
                "INSERT INTO widget (id, company_id, name, colour, active, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(company)
            .bind(name)
            .bind(colour)
            .bind(active)
            .bind(created)
            .execute(&pool)
            .await
            .unwrap();
        }
        pool
    }

    #[derive(Debug, sqlx::FromRow)]
    struct Widget {
        id: String,
        name: String,
    }

    fn ids(page: &Page<Widget>) -> Vec<&str> {
        page.rows.iter().map(|w| w.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_tenant_filter_always_applied() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let page: Page<Widget> = ListQuery::new("widget", &acme)
            .fetch_page(&pool, &ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.count, 4);
        assert!(!ids(&page).contains(&"w4"));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_or() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let params = ListParams {
            search: Some("BOLT".to_string()),
            ..Default::default()
        };
        let page: Page<Widget> = ListQuery::new("widget", &acme)
            .search(&["name", "colour"], params.search.as_deref())
            .sort(&["name"], "name", SortOrder::Asc)
            .fetch_page(&pool, &params)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["w2", "w1"]);
        assert_eq!(page.rows[0].name, "Big bolt");
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let page: Page<Widget> = ListQuery::new("widget", &acme)
            .search(&["name"], Some("%_"))
            .fetch_page(&pool, &ListParams::default())
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["w5"]);
    }

    #[tokio::test]
    async fn test_equality_filters_and_default_sort() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let page: Page<Widget> = ListQuery::new("widget", &acme)
            .eq("colour", Some("red"))
            .eq("active", Some(true))
            .eq::<&str>("name", None)
            .fetch_page(&pool, &ListParams::default())
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["w1"]);
    }

    #[tokio::test]
    async fn test_unknown_sort_column_falls_back_to_default() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let params = ListParams {
            sort: Some("name; DROP TABLE widget".to_string()),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let query = ListQuery::new("widget", &acme).sort(&["name"], "created_at", SortOrder::Desc);
        assert!(query.to_sql(&params).contains("ORDER BY created_at DESC, id ASC"));

        let page: Page<Widget> = query.fetch_page(&pool, &params).await.unwrap();
        assert_eq!(ids(&page), vec!["w5", "w3", "w2", "w1"]);
    }

    #[tokio::test]
    async fn test_pagination_reports_exact_count() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let params = ListParams {
            page: Some(2),
            page_size: Some(3),
            sort: Some("created_at".to_string()),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let page: Page<Widget> = ListQuery::new("widget", &acme)
            .sort(&["created_at"], "created_at", SortOrder::Desc)
            .fetch_page(&pool, &params)
            .await
            .unwrap();
        assert_eq!(page.count, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(ids(&page), vec!["w5"]);
    }

    #[test]
    fn test_sql_always_starts_with_tenant_predicate() {
        let query = ListQuery::new("widget", &CompanyId::new("acme"))
            .search(&["name"], Some("x"))
            .eq("colour", Some("red"));
        let sql = query.to_sql(&ListParams::default());
        assert!(sql.starts_with("SELECT * FROM widget WHERE company_id = ?"));
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_given_columns() {
        let pool = setup_pool().await;
        let acme = CompanyId::new("acme");
        let mut update = PartialUpdate::new("widget");
        update
            .set("name", Some("Renamed".to_string()))
            .set::<String>("colour", None);
        assert!(update.has_changes());
        let affected = update
            .execute(&pool, &acme, "w1", &UserId::new("u9"))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let (name, colour, updated_by): (String, Option<String>, Option<String>) =
            sqlx::query_as("SELECT name, colour, updated_by FROM widget WHERE id = 'w1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name, "Renamed");
        assert_eq!(colour.as_deref(), Some("red"));
        assert_eq!(updated_by.as_deref(), Some("u9"));
    }

    #[tokio::test]
    async fn test_partial_update_is_tenant_scoped() {
        let pool = setup_pool().await;
        let mut update = PartialUpdate::new("widget");
        update.set("colour", Some(None::<String>));
        let affected = update
            .execute(&pool, &CompanyId::new("globex"), "w1", &UserId::new("u9"))
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }
}
