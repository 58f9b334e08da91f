//! Token file persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{DriveError, Result};
use crate::models::StoredToken;

/// Default token file, relative to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// File-backed store for the OAuth token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write the token, replacing any previous one.
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        let content = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Read the token written by the `auth` command.
    ///
    /// A missing file is reported as `Usage` since the fix is to authorize
    /// first; an unreadable one is `StateCorrupt`.
    pub fn load(&self) -> Result<StoredToken> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriveError::Usage(format!(
                    "token file {:?} not found, please authorize with the `auth` command first",
                    self.path
                )))
            }
            Err(e) => return Err(DriveError::state_corrupt(&self.path, e)),
        };

        serde_json::from_str(&content).map_err(|e| DriveError::state_corrupt(&self.path, e))
    }
}
