//! Resolve slash-delimited paths in My Drive to object identifiers.

use tracing::debug;

use crate::api::DriveApi;
use crate::error::{DriveError, Result};
use crate::models::{FileMetadata, MIME_FOLDER, MIME_SHORTCUT};

/// Well-known identifier of the My Drive root folder.
pub const ROOT_ID: &str = "root";

/// A path such as `/backups/2024`, split into name segments.
///
/// Leading and trailing slashes are ignored; an empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        for name in trimmed.split('/') {
            current.push('/');
            current.push_str(name);
            if name.is_empty() {
                return Err(DriveError::InvalidPath(current));
            }
            segments.push(name.to_string());
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Escape a value for use inside a single-quoted Drive query string.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build the query matching `name` directly under `parent_id`.
pub fn child_query(name: &str, parent_id: &str, require_folder: bool) -> String {
    let mut query = format!(
        "name = '{}' and '{}' in parents and trashed = false",
        escape_query_value(name),
        escape_query_value(parent_id)
    );
    if require_folder {
        query.push_str(&format!(
            " and (mimeType = '{}' or mimeType = '{}')",
            MIME_FOLDER, MIME_SHORTCUT
        ));
    }
    query
}

/// Resolve a path to an object ID, following shortcuts.
///
/// Every segment but the last must be a folder or a shortcut to one. Whether
/// the final object is a folder is left to the caller.
pub async fn resolve<A: DriveApi + ?Sized>(api: &A, path: &VirtualPath) -> Result<String> {
    let mut current_id = ROOT_ID.to_string();
    let mut current_path = String::new();
    let last = path.segments.len().saturating_sub(1);

    for (i, name) in path.segments.iter().enumerate() {
        current_path.push('/');
        current_path.push_str(name);

        let require_folder = i != last;
        let query = child_query(name, &current_id, require_folder);
        let mut files = api.query_files(&query).await?;

        let file = match files.len() {
            0 => return Err(DriveError::NotFound(current_path)),
            1 => files.remove(0),
            count => {
                return Err(DriveError::AmbiguousPath {
                    path: current_path,
                    count,
                })
            }
        };

        current_id = follow_shortcut(file, &current_path, require_folder)?;
        debug!(path = %current_path, id = %current_id, "resolved segment");
    }

    Ok(current_id)
}

fn follow_shortcut(file: FileMetadata, current_path: &str, require_folder: bool) -> Result<String> {
    if !file.is_shortcut() {
        // Non-shortcut intermediate segments are already folders by query.
        return Ok(file.id);
    }
    let details = file.shortcut_details.ok_or_else(|| DriveError::RemoteApi {
        status: 200,
        message: format!("shortcut {} has no shortcut details", file.id),
    })?;
    if require_folder && details.target_mime_type.as_deref() != Some(MIME_FOLDER) {
        return Err(DriveError::TypeMismatch(current_path.to_string()));
    }
    Ok(details.target_id)
}

/// Resolve a path and fetch the metadata of the object it names.
pub async fn resolve_file<A: DriveApi + ?Sized>(api: &A, path: &VirtualPath) -> Result<FileMetadata> {
    let file_id = resolve(api, path).await?;
    api.get_file(&file_id).await
}
