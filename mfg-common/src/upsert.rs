//! Create-or-update request shape for composite documents
//!
//! One orchestrator handles both lifecycle phases of a document, but the caller
//! states which phase it wants. A creation request carries the creating actor
//! and no identifier; an update request carries the identifier and the
//! updating actor. The variants are disjoint by construction.

use serde::Serialize;

/// Explicit creation or update request
#[derive(Debug, Clone)]
pub enum Upsert<C, U> {
    Create(C),
    Update(U),
}

impl<C, U> Upsert<C, U> {
    pub fn is_create(&self) -> bool {
        matches!(self, Upsert::Create(_))
    }
}

/// Identifiers of a created or updated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Opaque row identifier
    pub id: String,
    /// Human-readable sequence identifier (e.g. `PO-00123`)
    pub readable_id: String,
}
