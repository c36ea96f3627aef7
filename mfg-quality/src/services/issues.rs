//! Non-conformance issue orchestration
//!
//! Creating an issue writes the header and its item links as one unit. The
//! customer and supplier links are informational; losing one is logged and
//! does not fail the create.

use std::collections::HashSet;

use chrono::NaiveDate;
use mfg_common::db::{next_sequence, RollbackLog, SequenceKind};
use mfg_common::query::PartialUpdate;
use mfg_common::{Action, CompanyId, DocumentRef, Error, RequestContext, Result, UserId, ValidationErrors};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::{issue_associations, issues};
use crate::models::{Issue, IssueAssociationKind, IssueStatus};
use crate::validators::issue::DUE_BEFORE_OPEN;
use crate::validators::{IssueForm, IssuePatch};

pub(crate) const MODULE: &str = "quality";

pub async fn create_issue(
    pool: &SqlitePool,
    company_id: &CompanyId,
    created_by: &UserId,
    mut form: IssueForm,
) -> Result<DocumentRef> {
    let mut seen = HashSet::new();
    form.items.retain(|item_id| seen.insert(item_id.clone()));

    let readable_id = next_sequence(pool, company_id, SequenceKind::Issue)
        .await
        .map_err(|e| Error::orchestration("allocate issue id", e))?;

    let mut written = RollbackLog::new(company_id);

    let id = issues::insert_issue(pool, company_id, &readable_id, &form, created_by)
        .await
        .map_err(|e| Error::orchestration("insert issue", e))?;
    written.record("issue", &id);

    for item_id in &form.items {
        match issue_associations::insert_association(
            pool,
            company_id,
            IssueAssociationKind::Items,
            &id,
            item_id,
            created_by,
        )
        .await
        {
            Ok(association_id) => written.record("issue_item", association_id),
            Err(e) => return Err(written.abort(pool, "insert issue items", e).await),
        }
    }

    let optional_links = [
        (IssueAssociationKind::Customers, form.customer_id.as_deref()),
        (IssueAssociationKind::Suppliers, form.supplier_id.as_deref()),
    ];
    for (kind, target) in optional_links {
        let Some(target) = target else { continue };
        if let Err(e) =
            issue_associations::insert_association(pool, company_id, kind, &id, target, created_by).await
        {
            warn!("Issue {} created without its {} link to {}: {}", readable_id, kind, target, e);
        }
    }

    info!(
        "Created issue {} ({}) with {} items in company {}",
        readable_id,
        id,
        form.items.len(),
        company_id
    );
    Ok(DocumentRef { id, readable_id })
}

pub async fn get_issue(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Issue> {
    issues::get_issue(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("issue", id))
}

/// Apply the submitted fields; dates are checked against the stored ones
pub async fn update_issue(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    patch: IssuePatch,
    updated_by: &UserId,
) -> Result<DocumentRef> {
    let current = get_issue(pool, company_id, id).await?;

    let open_date = patch.open_date.unwrap_or(current.open_date);
    let due_date = patch.due_date.unwrap_or(current.due_date);
    if !dates_in_order(open_date, due_date) {
        return Err(ValidationErrors::single("dueDate", DUE_BEFORE_OPEN).into());
    }

    let mut update = PartialUpdate::new("issue");
    update
        .set("name", patch.name)
        .set("description", patch.description)
        .set("priority", patch.priority)
        .set("location_id", patch.location_id)
        .set("assignee", patch.assignee)
        .set("open_date", patch.open_date)
        .set("due_date", patch.due_date);
    if update.execute(pool, company_id, id, updated_by).await? == 0 {
        return Err(Error::not_found("issue", id));
    }

    Ok(DocumentRef {
        id: id.to_string(),
        readable_id: current.issue_id,
    })
}

fn dates_in_order(open_date: NaiveDate, due_date: Option<NaiveDate>) -> bool {
    due_date.map_or(true, |due| due >= open_date)
}

/// Move an issue to `status`
///
/// Closing stamps today's date in the caller's zone and releases the
/// assignee. Reopening a closed issue also needs `quality_delete`.
pub async fn update_issue_status(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: &str,
    status: IssueStatus,
) -> Result<Issue> {
    ctx.require(MODULE, Action::Update)?;
    let current = get_issue(pool, &ctx.company_id, id).await?;

    let was_closed = current.status == IssueStatus::Closed;
    match (was_closed, status == IssueStatus::Closed) {
        (false, true) => {
            issues::close_issue(pool, &ctx.company_id, id, ctx.today(), &ctx.user_id).await?;
        }
        (true, false) => {
            ctx.require(MODULE, Action::Delete)?;
            let mut update = PartialUpdate::new("issue");
            update
                .set("status", Some(status))
                .set("close_date", Some(None::<NaiveDate>));
            update.execute(pool, &ctx.company_id, id, &ctx.user_id).await?;
        }
        _ => {
            let mut update = PartialUpdate::new("issue");
            update.set("status", Some(status));
            update.execute(pool, &ctx.company_id, id, &ctx.user_id).await?;
        }
    }

    info!("Issue {} status {} -> {}", current.issue_id, current.status, status);
    get_issue(pool, &ctx.company_id, id).await
}

pub async fn delete_issue(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    let current = get_issue(pool, &ctx.company_id, id).await?;
    issues::delete_issue(pool, &ctx.company_id, id).await?;
    info!("Deleted issue {}", current.issue_id);
    Ok(())
}
