//! # REST API for CSV Imports

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{ImportTransactionsRequest, Transaction};
use tracing::{error, info};

use super::error_response;
use super::mappers::TransactionMapper;
use crate::AppState;

/// Import a CSV file that was already placed in the upload directory
pub async fn import_transactions(
    State(state): State<AppState>,
    Json(request): Json<ImportTransactionsRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions/import - file: {}", request.filename);

    match state.import_service.import_transactions(&request.filename).await {
        Ok(transactions) => {
            let dtos: Vec<Transaction> = transactions.into_iter().map(TransactionMapper::to_dto).collect();
            (StatusCode::CREATED, Json(dtos)).into_response()
        }
        Err(e) => {
            error!("Failed to import {}: {}", request.filename, e);
            error_response(&e)
        }
    }
}
