//! Data models for Google Drive API responses and local token storage.

use serde::{Deserialize, Serialize};

/// MIME type of a Drive folder.
pub const MIME_FOLDER: &str = "application/vnd.google-apps.folder";

/// MIME type of a Drive shortcut.
pub const MIME_SHORTCUT: &str = "application/vnd.google-apps.shortcut";

/// Prefix shared by all Google-native types (Docs, Sheets, folders, ...).
/// Objects of these types cannot be copied as plain files. Google Earth
/// uploads (`application/vnd.google-earth.*`) are ordinary files.
pub const MIME_NATIVE_PREFIX: &str = "application/vnd.google-apps.";

/// Metadata for a file, folder or shortcut in Google Drive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub shortcut_details: Option<ShortcutDetails>,
}

/// Target of a shortcut object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutDetails {
    pub target_id: String,
    #[serde(default)]
    pub target_mime_type: Option<String>,
}

impl FileMetadata {
    pub fn is_shortcut(&self) -> bool {
        self.mime_type.as_deref() == Some(MIME_SHORTCUT)
    }

    /// MIME type of the object, or of the shortcut's target for shortcuts.
    pub fn effective_mime_type(&self) -> Option<&str> {
        if self.is_shortcut() {
            self.shortcut_details
                .as_ref()
                .and_then(|d| d.target_mime_type.as_deref())
        } else {
            self.mime_type.as_deref()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.effective_mime_type() == Some(MIME_FOLDER)
    }

    /// Whether this is a Google-native object the copy endpoint refuses.
    pub fn is_native(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with(MIME_NATIVE_PREFIX))
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// OAuth2 token endpoint response for the authorization-code grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Token persisted to the token file by `auth` and read by `copy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
}

impl StoredToken {
    /// Build a stored token from a token response received at `now` (Unix seconds).
    pub fn from_response(response: TokenResponse, now: u64) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            expiry: response.expires_in.map(|secs| now + secs),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expiry.is_some_and(|exp| exp <= now)
    }
}
