//! # Storage Traits
//!
//! Seams for collaborators that live outside the database.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Access to files that an external uploader placed in the upload directory.
///
/// Implementations only read and delete; they never create uploads.
#[async_trait]
pub trait UploadStorage: Send + Sync {
    /// Full path a filename resolves to, used in error reports
    fn path_of(&self, filename: &str) -> PathBuf;

    /// Read the whole file into memory
    async fn read(&self, filename: &str) -> io::Result<Vec<u8>>;

    /// Delete the file
    async fn remove(&self, filename: &str) -> io::Result<()>;
}
