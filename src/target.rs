//! Seed identifiers given on the command line and the set of ids to copy.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DriveError, Result};

/// Drive share links: `/drive/[u/N/]folders/<ID>`, `/file/d/<ID>`, `/open?id=<ID>`.
static DRIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://drive\.google\.com/(?:drive/(?:u/\d+/)?folders/|file/d/|open\?id=)([A-Za-z0-9_-]+)",
    )
    .expect("Invalid Drive URL regex")
});

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid ID regex"));

/// Accept a raw object ID or a Drive link and return the ID.
pub fn parse_seed(arg: &str) -> Result<String> {
    let trimmed = arg.trim();
    if let Some(id) = DRIVE_URL_REGEX.captures(trimmed).and_then(|c| c.get(1)) {
        return Ok(id.as_str().to_string());
    }
    if ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }
    Err(DriveError::InvalidUrlOrId(arg.to_string()))
}

/// Unique object IDs, iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    ids: BTreeSet<String>,
}

impl TargetSet {
    /// Build a set from command-line seeds. At least one seed is required.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.is_empty() {
            return Err(DriveError::Usage("please give at least one id".to_string()));
        }
        let ids = args
            .iter()
            .map(|a| parse_seed(a.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { ids })
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TargetSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
