//! The remote operations the copy pipeline needs from Drive.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FileMetadata;

/// Remote Drive operations used by the resolver, expander and copier.
///
/// [`crate::client::DriveClient`] implements this against the Drive v3 REST
/// API; tests substitute an in-memory hierarchy.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Run a Drive search query and return every match across all pages.
    async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>>;

    /// Get file metadata by ID.
    async fn get_file(&self, file_id: &str) -> Result<FileMetadata>;

    /// Copy a file into the given parent folder.
    async fn copy_file(&self, file_id: &str, parent_id: &str) -> Result<FileMetadata>;
}
