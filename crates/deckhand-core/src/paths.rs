//! Work root and per-invocation staging directories.
//!
//! Every invocation gets its own directory under a shared work root:
//!
//! ```text
//! <work-root>/
//! ├── 1b4e28ba-2fa1-11d2-883f-0016d3cca427/
//! │   ├── slides.md          # input document
//! │   └── export/            # renderer output (images)
//! │       ├── 1.png
//! │       └── 2.png
//! └── 6fa459ea-ee8a-3ca4-894e-db77e160355e/
//!     ├── slides.md
//!     └── slides-export.pdf  # renderer output (document)
//! ```
//!
//! Staging directories are never removed by the server. [`WorkRoot::prune`]
//! exists for out-of-band retention and is only called from the CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier of one invocation. Also names its staging directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Process-wide directory under which all staging directories live.
///
/// The root is created lazily on the first [`WorkRoot::stage`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRoot {
    path: PathBuf,
}

impl WorkRoot {
    /// Use `path` as the work root. Nothing is created yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the work root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a fresh staging directory for `id`.
    ///
    /// The root itself is created if missing. The staging directory is
    /// created non-recursively, so an identifier collision is an error.
    pub async fn stage(&self, id: ExecutionId) -> Result<StagingDir> {
        tokio::fs::create_dir_all(&self.path)
            .await
            .map_err(|source| Error::Staging {
                path: self.path.clone(),
                source,
            })?;

        let path = self.path.join(id.to_string());
        tokio::fs::create_dir(&path)
            .await
            .map_err(|source| Error::Staging {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(execution_id = %id, path = %path.display(), "staging directory created");
        Ok(StagingDir { id, path })
    }

    /// Remove staging directories last modified more than `older_than` ago.
    ///
    /// Returns the removed directories. A missing work root is not an error.
    pub fn prune(&self, older_than: Duration) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::Staging {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let cutoff = SystemTime::now()
            .checked_sub(older_than)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let mut removed = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_dir() {
                continue;
            }
            // Only touch directories this tool created.
            let is_staging = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| Uuid::parse_str(n).is_ok());
            if !is_staging {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::now());
            if modified <= cutoff {
                std::fs::remove_dir_all(&path).map_err(|source| Error::Staging {
                    path: path.clone(),
                    source,
                })?;
                removed.push(path);
            }
        }

        Ok(removed)
    }
}

/// A staging directory exclusively owned by one invocation.
#[derive(Debug, Clone)]
pub struct StagingDir {
    id: ExecutionId,
    path: PathBuf,
}

impl StagingDir {
    /// Identifier of the owning invocation.
    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// Absolute or root-relative path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join a path relative to the staging directory.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// File-style locator for an artifact, scoped to the work root.
    ///
    /// The work root acts as `/`, so the locator does not leak the server's
    /// filesystem layout: `file:///<execution-id>/<artifact>`.
    pub fn locator(&self, artifact: &str) -> String {
        format!("file:///{}/{}", self.id, artifact)
    }
}
