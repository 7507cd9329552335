//! # Domain Module
//!
//! Business rules for the finances backend.
//!
//! ## Module Organization
//!
//! - **balance_service**: Income/outcome totals and the non-negative balance rule
//! - **category_service**: Resolving category titles to stored categories, one at a
//!   time or in bulk
//! - **transaction_service**: Creating a single transaction and listing them
//! - **csv_import**: Turning an uploaded CSV file into candidate rows
//! - **import_service**: Bulk import of a CSV file with category reconciliation
//!
//! ## Business Rules
//!
//! - A new outcome may never exceed the current total balance
//! - Bulk import does not apply the balance rule
//! - There is at most one category per title; titles match exactly
//! - Malformed CSV rows are dropped, not reported
//! - Every flow that writes does so inside one database transaction

pub mod balance_service;
pub mod category_service;
pub mod csv_import;
pub mod error;
pub mod import_service;
pub mod models;
pub mod transaction_service;

pub use balance_service::BalanceService;
pub use category_service::CategoryService;
pub use error::{FinanceError, FinanceResult};
pub use import_service::ImportService;
pub use transaction_service::{CreateTransactionCommand, TransactionListing, TransactionService};
