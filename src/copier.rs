//! Server-side copy of a single file into a folder.

use tracing::debug;

use crate::api::DriveApi;
use crate::error::Result;
use crate::models::FileMetadata;

/// Copy `source_id` into `folder_id`, returning the new file.
///
/// Refusals from Drive (native types, shared drive restrictions) are
/// returned as errors; filtering happens during expansion.
pub async fn copy_into_folder<A: DriveApi + ?Sized>(
    api: &A,
    source_id: &str,
    folder_id: &str,
) -> Result<FileMetadata> {
    let copied = api.copy_file(source_id, folder_id).await?;
    debug!(source = source_id, copy = %copied.id, folder = folder_id, "copied file");
    Ok(copied)
}
