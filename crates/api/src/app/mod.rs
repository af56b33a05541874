//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: invoice source + report engine wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and lenient override parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    // Tenant-scoped routes.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::tenant_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
