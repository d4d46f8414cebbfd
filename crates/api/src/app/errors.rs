use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tableside_auth::PolicyError;
use tableside_core::DomainError;
use tableside_infra::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Domain failures are client errors: bad input or a missing resource.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::NotFound => not_found(),
    }
}

/// Policy denials map 1:1 onto 401/403.
pub fn policy_error_to_response(err: PolicyError) -> axum::response::Response {
    match err {
        PolicyError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required")
        }
        PolicyError::Forbidden => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient rights")
        }
    }
}

/// Backend trouble is a 500 with a generic body; details go to the log only.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store operation failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}

pub fn validation_error(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
