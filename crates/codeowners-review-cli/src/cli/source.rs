//! File-backed review source.
//!
//! Reads the changed paths and the review snapshot from local files, for
//! use in CI jobs that export them ahead of time.

use async_trait::async_trait;
use codeowners_review_core::source::{ReviewSource, SourceError};
use codeowners_review_core::ReviewSnapshot;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A [`ReviewSource`] over local files.
#[derive(Debug, Clone)]
pub struct LocalSource {
    changed_files: PathBuf,
    snapshot: Option<PathBuf>,
}

impl LocalSource {
    /// Creates a source reading the given changed files list and snapshot.
    pub fn new(changed_files: PathBuf, snapshot: Option<PathBuf>) -> Self {
        Self {
            changed_files,
            snapshot,
        }
    }
}

async fn read(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
        _ => SourceError::Io(e),
    })
}

/// Parses a changed files list, one path per line.
///
/// Surrounding whitespace is trimmed; blank lines and `#` comments are
/// skipped.
pub fn parse_changed_files(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ReviewSource for LocalSource {
    async fn changed_files(&self) -> Result<Vec<String>, SourceError> {
        trace!("Reading changed files from {}", self.changed_files.display());
        let content = read(&self.changed_files).await?;
        Ok(parse_changed_files(&content))
    }

    async fn review_snapshot(&self) -> Result<ReviewSnapshot, SourceError> {
        match &self.snapshot {
            Some(path) => {
                trace!("Reading review snapshot from {}", path.display());
                let content = read(path).await?;
                Ok(ReviewSnapshot::from_json(&content)?)
            }
            None => {
                debug!("No review snapshot given - starting from an empty one");
                Ok(ReviewSnapshot::default())
            }
        }
    }

    async fn team_members(&self, org: &str, slug: &str) -> Result<Vec<String>, SourceError> {
        // Membership only comes from the snapshot file.
        debug!("No member list for @{}/{} in the snapshot", org, slug);
        Ok(Vec::new())
    }
}
