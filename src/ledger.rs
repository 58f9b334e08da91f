//! Persisted record of ids already copied, so interrupted runs resume.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DriveError, Result};

/// Default ledger file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "state.json";

/// Set of copied ids backed by a JSON array file.
#[derive(Debug)]
pub struct ProgressLedger {
    path: PathBuf,
    done: BTreeSet<String>,
}

impl ProgressLedger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let done = match fs::read_to_string(&path) {
            Ok(content) => {
                let ids: Vec<String> = serde_json::from_str(&content)
                    .map_err(|e| DriveError::state_corrupt(&path, e))?;
                ids.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(DriveError::state_corrupt(&path, e)),
        };
        debug!(path = ?path, entries = done.len(), "loaded progress ledger");
        Ok(Self { path, done })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    pub fn mark_done(&mut self, id: impl Into<String>) {
        self.done.insert(id.into());
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.done.iter().map(String::as_str)
    }

    /// Write the whole set, replacing the file atomically.
    pub fn flush(&self) -> Result<()> {
        let ids: Vec<&str> = self.iter().collect();
        let content = serde_json::to_string(&ids)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = ?self.path, entries = ids.len(), "flushed progress ledger");
        Ok(())
    }
}
