//! Google Drive API client for the copy pipeline.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::api::DriveApi;
use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested for every file, enough to resolve shortcuts and parents.
const FILE_FIELDS: &str = "id, name, mimeType, shortcutDetails, parents";

/// Page size for files.list requests.
const PAGE_SIZE: &str = "100";

/// Client for interacting with Google Drive.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
}

impl DriveClient {
    /// Create a new DriveClient against the public Drive API.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_base_url(auth, DRIVE_API_BASE)
    }

    /// Create a client against a different API root, e.g. a mock server.
    pub fn with_base_url(auth: Authenticator, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Turn a non-success response into an `ApiError`, preferring the
/// structured Google error body when present.
async fn error_from_response(response: Response) -> DriveError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return DriveError::RemoteApi {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }
    DriveError::RemoteApi {
        status: status.as_u16(),
        message: error_body,
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        let token = self.auth.get_access_token()?;
        let fields = format!("nextPageToken, files({})", FILE_FIELDS);
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        debug!(query, "listing files");

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(token)
                .query(&[
                    ("q", query),
                    ("pageSize", PAGE_SIZE),
                    ("includeItemsFromAllDrives", "true"),
                    ("supportsAllDrives", "true"),
                    ("fields", fields.as_str()),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let list_response: FileListResponse = response.json().await?;
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(query, count = all_files.len(), "listed files");
        Ok(all_files)
    }

    async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        let token = self.auth.get_access_token()?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true"), ("fields", FILE_FIELDS)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let metadata: FileMetadata = response.json().await?;
        Ok(metadata)
    }

    async fn copy_file(&self, file_id: &str, parent_id: &str) -> Result<FileMetadata> {
        let token = self.auth.get_access_token()?;
        let body = serde_json::json!({ "parents": [parent_id] });

        let response = self
            .http
            .post(format!("{}/files/{}/copy", self.base_url, file_id))
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true"), ("fields", FILE_FIELDS)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let metadata: FileMetadata = response.json().await?;
        Ok(metadata)
    }
}
