//! Tenant-scoped quality queries

pub mod gauges;
pub mod issue_associations;
pub mod issues;
pub mod quality_documents;
