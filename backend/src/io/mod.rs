//! # IO Module
//!
//! Adapter between HTTP clients and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: JSON endpoints for listing, creating and importing transactions
//! - **Mapping**: Converting domain models to the DTOs in the `shared` crate
//! - **Error Translation**: Converting `FinanceError` into HTTP status codes
//!
//! Business validation is not repeated here; handlers pass requests straight to
//! the domain and translate whatever comes back.

pub mod rest;

pub use rest::*;
