//! Bulk import of transactions from an uploaded CSV file.
//!
//! The flow reads and parses the whole file before touching the database,
//! reconciles categories in one batch, inserts every transaction in one batch
//! and commits both inserts together. The uploaded file is deleted only after
//! the commit succeeded. Imports skip the balance rule and are not idempotent:
//! importing the same file twice stores its transactions twice.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::domain::{
    category_service::{distinct_titles, CategoryService},
    csv_import::{parse_rows, ImportRow},
    error::{FinanceError, FinanceResult},
    models::Transaction,
};
use crate::storage::{DbConnection, TransactionRepository, UploadStorage};

#[derive(Clone)]
pub struct ImportService {
    db: DbConnection,
    uploads: Arc<dyn UploadStorage>,
    category_service: CategoryService,
    transaction_repository: TransactionRepository,
}

impl ImportService {
    pub fn new(
        db: DbConnection,
        uploads: Arc<dyn UploadStorage>,
        category_service: CategoryService,
        transaction_repository: TransactionRepository,
    ) -> Self {
        Self {
            db,
            uploads,
            category_service,
            transaction_repository,
        }
    }

    /// Import `filename` from the upload directory and return the stored transactions
    pub async fn import_transactions(&self, filename: &str) -> FinanceResult<Vec<Transaction>> {
        validate_filename(filename)?;
        info!("Importing transactions from {}", self.uploads.path_of(filename).display());

        let contents = self
            .uploads
            .read(filename)
            .await
            .map_err(|source| self.file_error(filename, source))?;
        let rows: Vec<ImportRow> = parse_rows(contents.as_slice()).collect();

        let transactions = if rows.is_empty() {
            info!("No valid rows in {}", filename);
            Vec::new()
        } else {
            self.store_rows(rows).await?
        };

        self.uploads
            .remove(filename)
            .await
            .map_err(|source| self.file_error(filename, source))?;

        info!("Imported {} transactions from {}", transactions.len(), filename);
        Ok(transactions)
    }

    /// Reconcile categories and insert the transactions in one database transaction
    async fn store_rows(&self, rows: Vec<ImportRow>) -> FinanceResult<Vec<Transaction>> {
        let titles = distinct_titles(rows.iter().map(|row| row.category_title.as_str()));

        let mut tx = self.db.pool().begin().await?;

        let categories = self.category_service.reconcile(&mut tx, &titles).await?;

        let transactions = rows
            .into_iter()
            .map(|row| {
                let category = categories
                    .get(&row.category_title)
                    .cloned()
                    .ok_or_else(|| FinanceError::UnresolvedCategory(row.category_title.clone()))?;
                Ok(Transaction::new(row.title, row.value, row.transaction_type, category))
            })
            .collect::<FinanceResult<Vec<_>>>()?;

        self.transaction_repository.insert_many(&mut tx, &transactions).await?;
        tx.commit().await?;

        Ok(transactions)
    }

    fn file_error(&self, filename: &str, source: std::io::Error) -> FinanceError {
        FinanceError::FileAccess {
            path: self.uploads.path_of(filename),
            source,
        }
    }
}

/// Only bare file names are accepted, so imports cannot reach outside the upload directory
fn validate_filename(filename: &str) -> FinanceResult<()> {
    let is_bare_name = !filename.contains(&['/', '\\'][..])
        && Path::new(filename)
            .file_name()
            .map(|name| name == filename)
            .unwrap_or(false);

    if is_bare_name {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!("Invalid upload filename '{}'", filename)))
    }
}
