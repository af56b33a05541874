use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tallyerp_core::DomainError;
use tallyerp_infra::InvoiceSourceError;

/// `{ "success": false, "error": <message>, "code": <machine code> }`
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        DomainError::InvalidId(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
        }
        DomainError::InvalidDate { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_date", err.to_string())
        }
    }
}

pub fn source_error_to_response(err: InvoiceSourceError) -> axum::response::Response {
    tracing::error!(error = %err, "invoice fetch failed");
    match err {
        InvoiceSourceError::Unavailable(_) => {
            json_error(StatusCode::BAD_GATEWAY, "source_unavailable", err.to_string())
        }
        InvoiceSourceError::Io { .. } | InvoiceSourceError::Snapshot(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "source_error", err.to_string())
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}
