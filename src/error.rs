//! Error types for the drive_copy crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving, expanding or copying Drive objects.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Missing or invalid environment variable: {0}")]
    ConfigMissing(String),

    #[error("Invalid input, empty directory or file name: {0}")]
    InvalidPath(String),

    #[error("Path {0} is missing")]
    NotFound(String),

    #[error("Path {path} is not singular: {count} files have the same path")]
    AmbiguousPath { path: String, count: usize },

    #[error("Path {0} is expected to be a folder, but is not")]
    TypeMismatch(String),

    #[error("Given path {0} found, but it is not a folder")]
    NotAFolder(String),

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Failed to copy {id}: {source}")]
    CopyFailed {
        id: String,
        #[source]
        source: Box<DriveError>,
    },

    #[error("State file {path:?} is unreadable: {reason}")]
    StateCorrupt { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Authorization state does not match")]
    StateMismatch,

    #[error("No authorization callback received within {0} seconds")]
    AuthTimeout(u64),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Usage(String),
}

impl DriveError {
    /// Build a `StateCorrupt` error for the given file.
    pub fn state_corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DriveError::StateCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
