//! HTTP glue shared by the service routers
//!
//! - [`error`]: `IntoResponse` for [`crate::Error`]
//! - [`context`]: [`crate::RequestContext`] extractor from request headers
//! - [`health`]: `GET /health` for every service
//! - [`options`]: option lists served from catalog enums

pub mod context;
pub mod error;
pub mod health;
pub mod options;

pub use context::{COMPANY_HEADER, PERMISSIONS_HEADER, USER_HEADER, UTC_OFFSET_HEADER};
pub use error::ApiResult;
pub use health::{health_routes, HealthResponse};
pub use options::{catalog_options, SelectOption};
