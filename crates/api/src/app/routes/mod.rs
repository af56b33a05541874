use axum::Router;

pub mod reports;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new().nest("/reports", reports::router())
}
