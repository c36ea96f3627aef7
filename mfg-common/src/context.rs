//! Request context: tenant, acting user and permission grants
//!
//! Authentication and permission evaluation happen upstream. Services receive
//! the resolved tenant, actor and grants with every request and must scope
//! every read and write to `company_id`.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::{Error, Result};

/// Tenant identifier carried by every row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acting user identifier, written into audit columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission action within a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Resolved permission grants, e.g. `purchasing_update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    /// Parse a comma separated grant list (`purchasing_view,purchasing_update`)
    pub fn parse(grants: &str) -> Self {
        Self(
            grants
                .split(',')
                .map(|g| g.trim().to_ascii_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
        )
    }

    pub fn can(&self, module: &str, action: Action) -> bool {
        self.0.contains(&format!("{}_{}", module, action.as_str()))
    }
}

/// Per-request tenant/actor context
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub company_id: CompanyId,
    pub user_id: UserId,
    pub permissions: Permissions,
    /// Caller's local offset from UTC, used to decide "today"
    pub utc_offset: FixedOffset,
}

impl RequestContext {
    /// Context with no grants, in UTC
    pub fn new(company_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            company_id: CompanyId::new(company_id),
            user_id: UserId::new(user_id),
            permissions: Permissions::default(),
            utc_offset: utc(),
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Current date in the caller's local time zone
    pub fn today(&self) -> NaiveDate {
        crate::time::today_in(self.utc_offset)
    }

    /// Require a grant, returning `Error::Forbidden` when missing
    pub fn require(&self, module: &str, action: Action) -> Result<()> {
        if self.permissions.can(module, action) {
            Ok(())
        } else {
            warn!(
                "Permission denied: user {} lacks {}_{} in company {}",
                self.user_id,
                module,
                action.as_str(),
                self.company_id
            );
            Err(Error::Forbidden(format!(
                "{}_{} permission required",
                module,
                action.as_str()
            )))
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}
