//! Links between an issue and the records it concerns

use futures::future::try_join_all;
use mfg_common::{Action, CatalogEnum, Error, RequestContext, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::issues::{get_issue, MODULE};
use crate::db::issue_associations;
use crate::models::{IssueAssociationKind, IssueAssociations};

pub async fn add_issue_association(
    pool: &SqlitePool,
    ctx: &RequestContext,
    kind: IssueAssociationKind,
    issue_id: &str,
    target_id: &str,
) -> Result<String> {
    ctx.require(MODULE, Action::Create)?;
    let issue = get_issue(pool, &ctx.company_id, issue_id).await?;

    let id =
        issue_associations::insert_association(pool, &ctx.company_id, kind, issue_id, target_id, &ctx.user_id)
            .await?;
    info!("Linked {} {} to issue {}", kind, target_id, issue.issue_id);
    Ok(id)
}

pub async fn delete_issue_association(
    pool: &SqlitePool,
    ctx: &RequestContext,
    kind: IssueAssociationKind,
    association_id: &str,
) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    if issue_associations::delete_association(pool, &ctx.company_id, kind, association_id).await? == 0 {
        return Err(Error::not_found("issue association", association_id));
    }
    Ok(())
}

/// Every link of one issue; the nine tables are read concurrently
pub async fn list_issue_associations(
    pool: &SqlitePool,
    ctx: &RequestContext,
    issue_id: &str,
) -> Result<IssueAssociations> {
    ctx.require(MODULE, Action::View)?;
    get_issue(pool, &ctx.company_id, issue_id).await?;

    let reads = IssueAssociationKind::ALL.iter().map(|kind| async move {
        let rows = issue_associations::list_associations(pool, &ctx.company_id, *kind, issue_id).await?;
        Ok::<_, Error>((*kind, rows))
    });

    let mut associations = IssueAssociations::default();
    for (kind, rows) in try_join_all(reads).await? {
        *associations.slot_mut(kind) = rows;
    }
    Ok(associations)
}
