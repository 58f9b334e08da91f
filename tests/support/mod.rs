//! In-memory Drive used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use drive_copy::models::{ShortcutDetails, MIME_FOLDER, MIME_SHORTCUT};
use drive_copy::{DriveApi, DriveError, FileMetadata, Result};
use tokio_util::sync::CancellationToken;

/// Answers queries from a table keyed by the exact query string.
#[derive(Default)]
pub struct FakeDrive {
    responses: HashMap<String, Vec<FileMetadata>>,
    files: HashMap<String, FileMetadata>,
    failing_copies: HashSet<String>,
    cancel_after: Option<(String, CancellationToken)>,
    pub queries: Mutex<Vec<String>>,
    pub copies: Mutex<Vec<(String, String)>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>, files: Vec<FileMetadata>) -> Self {
        self.responses.insert(query.into(), files);
        self
    }

    pub fn with_file(mut self, file: FileMetadata) -> Self {
        self.files.insert(file.id.clone(), file);
        self
    }

    pub fn failing_copy(mut self, id: &str) -> Self {
        self.failing_copies.insert(id.to_string());
        self
    }

    /// Cancel `token` right after `id` has been copied.
    pub fn cancel_after(mut self, id: &str, token: CancellationToken) -> Self {
        self.cancel_after = Some((id.to_string(), token));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn copied_ids(&self) -> Vec<String> {
        self.copies
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn copies(&self) -> Vec<(String, String)> {
        self.copies.lock().unwrap().clone()
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }

    async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| DriveError::RemoteApi {
                status: 404,
                message: format!("File not found: {}.", file_id),
            })
    }

    async fn copy_file(&self, file_id: &str, parent_id: &str) -> Result<FileMetadata> {
        if self.failing_copies.contains(file_id) {
            return Err(DriveError::RemoteApi {
                status: 403,
                message: "This file cannot be copied by the user.".to_string(),
            });
        }
        self.copies
            .lock()
            .unwrap()
            .push((file_id.to_string(), parent_id.to_string()));
        if let Some((id, token)) = &self.cancel_after {
            if id == file_id {
                token.cancel();
            }
        }
        Ok(FileMetadata {
            id: format!("copy-of-{}", file_id),
            parents: vec![parent_id.to_string()],
            ..Default::default()
        })
    }
}

pub fn folder(id: &str, name: &str, parent: &str) -> FileMetadata {
    FileMetadata {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: Some(MIME_FOLDER.to_string()),
        parents: vec![parent.to_string()],
        shortcut_details: None,
    }
}

pub fn file(id: &str, name: &str, mime: &str, parent: &str) -> FileMetadata {
    FileMetadata {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: Some(mime.to_string()),
        parents: vec![parent.to_string()],
        shortcut_details: None,
    }
}

pub fn shortcut(id: &str, name: &str, parent: &str, target_id: &str, target_mime: &str) -> FileMetadata {
    FileMetadata {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: Some(MIME_SHORTCUT.to_string()),
        parents: vec![parent.to_string()],
        shortcut_details: Some(ShortcutDetails {
            target_id: target_id.to_string(),
            target_mime_type: Some(target_mime.to_string()),
        }),
    }
}
