//! Tenant resolution.
//!
//! Session handling lives in front of this service; by the time a request
//! arrives here the tenant has been resolved into the `X-Tenant-Id` header.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use tallyerp_core::TenantId;

use crate::app::errors;
use crate::context::TenantContext;

pub const TENANT_HEADER: &str = "x-tenant-id";

pub async fn tenant_middleware(mut req: Request, next: Next) -> Response {
    let tenant_id = match extract_tenant(req.headers()) {
        Ok(t) => t,
        Err(msg) => return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", msg),
    };

    req.extensions_mut().insert(TenantContext::new(tenant_id));
    next.run(req).await
}

fn extract_tenant(headers: &HeaderMap) -> Result<TenantId, &'static str> {
    let header = headers
        .get(TENANT_HEADER)
        .ok_or("missing tenant")?;

    let header = header.to_str().map_err(|_| "invalid tenant header")?;

    header.parse().map_err(|_| "invalid tenant id")
}
