//! # REST API Interface Layer
//!
//! | Method | Path                        | Handler                |
//! |--------|-----------------------------|------------------------|
//! | GET    | `/api/health`               | `health`               |
//! | GET    | `/api/transactions`         | `list_transactions`    |
//! | POST   | `/api/transactions`         | `create_transaction`   |
//! | POST   | `/api/transactions/import`  | `import_transactions`  |

pub mod import_apis;
pub mod mappers;
pub mod transaction_apis;

pub use import_apis::*;
pub use transaction_apis::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;

use crate::domain::FinanceError;

/// Liveness check
pub async fn health() -> &'static str {
    "ok"
}

/// Translate a domain error into a JSON error response.
/// Internal failures are reported generically; the caller logs the details.
pub fn error_response(err: &FinanceError) -> Response {
    let status = match err {
        FinanceError::InsufficientBalance { .. } | FinanceError::Validation(_) => StatusCode::BAD_REQUEST,
        err if err.is_missing_file() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    (status, Json(ErrorResponse::new(message))).into_response()
}
