//! HTTP handlers consumed by the HRIS web client.

pub mod audit;
pub mod payroll;

use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

use crate::error::HrisError;

/// Map a service error to a response, logging server-side faults.
pub(crate) fn error_response(err: HrisError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        HrisError::ValidationError(_) | HrisError::AuditError(_) => StatusCode::BAD_REQUEST,
        HrisError::RateError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        HrisError::ConfigError(_) | HrisError::DatabaseError(_) => {
            tracing::error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(serde_json::json!({ "error": err.to_string() })))
}
