//! # MFG Common Library
//!
//! Shared code for all MFG application services including:
//! - Database schema, migrations and shared reference data
//! - Request context (tenant, actor, permission grants)
//! - Form validation with field-path attributed failures
//! - Tenant-scoped list query composition and pagination
//! - Configuration loading
//! - Document attachment listing
//! - HTTP glue shared by the service routers

pub mod api;
pub mod catalog;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod pagination;
pub mod query;
pub mod storage;
pub mod time;
pub mod upsert;
pub mod uuid_utils;
pub mod validation;

pub use catalog::CatalogEnum;
pub use context::{Action, CompanyId, Permissions, RequestContext, UserId};
pub use error::{Error, Result};
pub use upsert::{DocumentRef, Upsert};
pub use validation::{FieldError, FormInput, FormReader, ValidationErrors};

// Re-exported for `catalog_enum!` expansions in downstream crates
#[doc(hidden)]
pub use serde as __serde;
#[doc(hidden)]
pub use sqlx as __sqlx;
