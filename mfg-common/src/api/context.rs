//! Request context extraction
//!
//! Tenant and actor arrive as headers set by the upstream gateway after
//! authentication. Handlers take [`RequestContext`] as an extractor; a request
//! without both identity headers never reaches a handler.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::FixedOffset;

use crate::context::{Permissions, RequestContext};
use crate::Error;

pub const COMPANY_HEADER: &str = "x-company-id";
pub const USER_HEADER: &str = "x-user-id";
pub const PERMISSIONS_HEADER: &str = "x-permissions";
/// Minutes east of UTC
pub const UTC_OFFSET_HEADER: &str = "x-utc-offset";

fn header<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, Error> {
    match parts.headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|v| Some(v.trim()).filter(|v| !v.is_empty()))
            .map_err(|_| Error::InvalidInput(format!("{} header is not valid text", name))),
    }
}

fn parse_offset(minutes: &str) -> Result<FixedOffset, Error> {
    minutes
        .parse::<i32>()
        .ok()
        .and_then(|m| m.checked_mul(60))
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| Error::InvalidInput(format!("{} must be minutes east of UTC", UTC_OFFSET_HEADER)))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let company_id = header(parts, COMPANY_HEADER)?
            .ok_or_else(|| Error::InvalidInput(format!("{} header required", COMPANY_HEADER)))?;
        let user_id = header(parts, USER_HEADER)?
            .ok_or_else(|| Error::InvalidInput(format!("{} header required", USER_HEADER)))?;

        let mut ctx = RequestContext::new(company_id, user_id);
        if let Some(grants) = header(parts, PERMISSIONS_HEADER)? {
            ctx = ctx.with_permissions(Permissions::parse(grants));
        }
        if let Some(offset) = header(parts, UTC_OFFSET_HEADER)? {
            ctx = ctx.with_utc_offset(parse_offset(offset)?);
        }

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Action;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> Result<RequestContext, Error> {
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        RequestContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_all_headers() {
        let ctx = extract(
            Request::builder()
                .header(COMPANY_HEADER, "acme")
                .header(USER_HEADER, "u1")
                .header(PERMISSIONS_HEADER, "purchasing_update")
                .header(UTC_OFFSET_HEADER, "-300"),
        )
        .await
        .unwrap();

        assert_eq!(ctx.company_id.as_str(), "acme");
        assert_eq!(ctx.user_id.as_str(), "u1");
        assert!(ctx.permissions.can("purchasing", Action::Update));
        assert_eq!(ctx.utc_offset.local_minus_utc(), -300 * 60);
    }

    #[tokio::test]
    async fn test_missing_company_is_rejected() {
        let err = extract(Request::builder().header(USER_HEADER, "u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains(COMPANY_HEADER)));
    }

    #[tokio::test]
    async fn test_bad_offset_is_rejected() {
        let err = extract(
            Request::builder()
                .header(COMPANY_HEADER, "acme")
                .header(USER_HEADER, "u1")
                .header(UTC_OFFSET_HEADER, "east"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
