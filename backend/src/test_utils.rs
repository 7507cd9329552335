//! Test environment with automatic cleanup.
//!
//! Each environment owns a private in-memory database and a temporary upload
//! directory that is removed when the environment is dropped, even if the test
//! panics.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::domain::{ImportService, TransactionService};
use crate::storage::{DbConnection, LocalUploadStorage, UploadStorage};
use crate::AppState;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _upload_dir: TempDir,
    pub db: DbConnection,
    pub uploads: Arc<LocalUploadStorage>,
    pub state: AppState,
    pub transaction_service: TransactionService,
    pub import_service: ImportService,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let upload_dir = TempDir::with_prefix("finances-uploads")?;
        let db = DbConnection::init_test().await?;
        Self::build(upload_dir, db).await
    }

    /// Database file inside the temporary directory with a pool of
    /// `max_connections`, for tests where several writers race each other
    pub async fn with_database_file(max_connections: u32) -> Result<Self> {
        let upload_dir = TempDir::with_prefix("finances-uploads")?;
        let url = format!("sqlite:{}", upload_dir.path().join("finances.db").display());
        let db = DbConnection::new(&url, max_connections).await?;
        Self::build(upload_dir, db).await
    }

    async fn build(upload_dir: TempDir, db: DbConnection) -> Result<Self> {
        let uploads = Arc::new(LocalUploadStorage::new(upload_dir.path()).await?);
        let state = AppState::new(db.clone(), uploads.clone());

        Ok(Self {
            _upload_dir: upload_dir,
            transaction_service: state.transaction_service.clone(),
            import_service: state.import_service.clone(),
            db,
            uploads,
            state,
        })
    }

    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.uploads.path_of(filename)
    }

    /// Place a file in the upload directory the way the uploader would
    pub fn write_upload(&self, filename: &str, contents: &str) -> PathBuf {
        let path = self.upload_path(filename);
        std::fs::write(&path, contents).expect("Failed to write upload");
        path
    }

    pub async fn category_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count categories")
    }

    pub async fn transaction_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count transactions")
    }

    pub async fn category_id_of(&self, title: &str) -> Option<Uuid> {
        sqlx::query_scalar("SELECT id FROM categories WHERE title = ?")
            .bind(title)
            .fetch_optional(self.db.pool())
            .await
            .expect("Failed to look up category")
    }
}
