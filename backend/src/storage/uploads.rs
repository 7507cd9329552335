use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::traits::UploadStorage;

/// Upload storage backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalUploadStorage {
    directory: PathBuf,
}

impl LocalUploadStorage {
    /// Use `directory` as the upload root, creating it if it does not exist
    pub async fn new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if fs::metadata(&directory).await.is_err() {
            fs::create_dir_all(&directory).await?;
            info!("Created upload directory {}", directory.display());
        }
        Ok(Self { directory })
    }
}

#[async_trait]
impl UploadStorage for LocalUploadStorage {
    fn path_of(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }

    async fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_of(filename)).await
    }

    async fn remove(&self, filename: &str) -> io::Result<()> {
        fs::remove_file(self.path_of(filename)).await
    }
}
