//! # Storage Module
//!
//! Persistence for categories and transactions (SQLite through SQLx) and
//! access to the upload directory that CSV imports are read from.
//!
//! Repositories do not own a connection. Every method takes the
//! `SqliteConnection` to run on, so a service can run several repository
//! calls inside one database transaction and commit them together.

pub mod connection;
pub mod repositories;
pub mod traits;
pub mod uploads;

pub use connection::DbConnection;
pub use repositories::{CategoryRepository, TransactionRepository};
pub use traits::UploadStorage;
pub use uploads::LocalUploadStorage;
