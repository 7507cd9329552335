//! Error type shared by every domain flow.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type FinanceResult<T> = Result<T, FinanceError>;

#[derive(Debug, Error)]
pub enum FinanceError {
    /// An outcome would drive the balance below zero
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The uploaded file could not be read or removed
    #[error("Cannot access upload file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No category resolved for title '{0}'")]
    UnresolvedCategory(String),

    /// Stored values add up past what the balance can represent
    #[error("Balance overflow while summing stored transactions")]
    BalanceOverflow,
}

impl FinanceError {
    /// True when the error came from the database reporting a competing writer
    pub fn is_write_conflict(&self) -> bool {
        match self {
            FinanceError::Persistence(sqlx::Error::Database(db_error)) => matches!(
                db_error.code().as_deref(),
                // SQLITE_BUSY, SQLITE_LOCKED, LOCKED_SHAREDCACHE, BUSY_RECOVERY, BUSY_SNAPSHOT
                Some("5") | Some("6") | Some("262") | Some("261") | Some("517")
            ),
            _ => false,
        }
    }

    /// True when the error is a missing upload file rather than some other I/O failure
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            FinanceError::FileAccess { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}
