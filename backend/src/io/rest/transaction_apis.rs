//! # REST API for Transactions
//!
//! Endpoints for listing and creating transactions.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{CreateTransactionRequest, TransactionListResponse};
use tracing::{error, info};

use super::error_response;
use super::mappers::TransactionMapper;
use crate::AppState;

/// List every transaction together with the current balance
pub async fn list_transactions(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/transactions");

    match state.transaction_service.list_transactions().await {
        Ok(listing) => {
            let response = TransactionListResponse {
                transactions: listing
                    .transactions
                    .into_iter()
                    .map(TransactionMapper::to_dto)
                    .collect(),
                balance: TransactionMapper::balance_to_dto(listing.balance),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            error_response(&e)
        }
    }
}

/// Create a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    let command = TransactionMapper::to_command(request);
    match state.transaction_service.create_transaction(command).await {
        Ok(transaction) => (StatusCode::CREATED, Json(TransactionMapper::to_dto(transaction))).into_response(),
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            error_response(&e)
        }
    }
}
