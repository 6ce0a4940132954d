//! Error types for deckhand-core.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for deckhand-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a slide deck.
///
/// Every variant maps to one of the caller-visible kinds returned by
/// [`Error::kind`], so a failed invocation can be classified without
/// parsing the message.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected before anything was staged.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The work root or a staging directory could not be prepared.
    #[error("failed to stage {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer process could not be started.
    #[error("failed to start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but exited unsuccessfully.
    #[error("renderer exited with {}{}", exit_description(code), stderr_suffix(stderr))]
    Render { code: Option<i32>, stderr: String },

    /// The renderer reported success but the expected artifact is absent.
    #[error("renderer produced no output at {}", path.display())]
    MissingOutput { path: PathBuf },

    /// An output artifact exists but could not be read.
    #[error("failed to read output {}: {source}", path.display())]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl Error {
    /// Stable tag identifying the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Staging { .. } => "staging_error",
            Self::Spawn { .. } | Self::Render { .. } => "render_error",
            Self::MissingOutput { .. } | Self::ReadOutput { .. } => "missing_output_error",
        }
    }

    /// Format the error together with a recovery hint, for terminal output.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::InvalidInput(_) => "check the slide text passed to the command",
            Self::Staging { .. } => "check that the work directory is writable (--work-dir)",
            Self::Spawn { .. } => "install the renderer or point --renderer at it",
            Self::Render { .. } => "run the renderer by hand in the staging directory to see the full log",
            Self::MissingOutput { .. } | Self::ReadOutput { .. } => {
                "inspect the staging directory; the renderer output layout may have changed"
            }
        };
        format!("{self}\n  hint: {hint}")
    }

    /// Rewrite paths under `root` relative to it, `/`-prefixed like the
    /// artifact locators, so the message can be shown to remote callers.
    pub fn scoped_to(self, root: &Path) -> Self {
        let scope = |path: PathBuf| match path.strip_prefix(root) {
            Ok(relative) => Path::new("/").join(relative),
            Err(_) => path,
        };
        match self {
            Self::Staging { path, source } => Self::Staging {
                path: scope(path),
                source,
            },
            Self::MissingOutput { path } => Self::MissingOutput { path: scope(path) },
            Self::ReadOutput { path, source } => Self::ReadOutput {
                path: scope(path),
                source,
            },
            other => other,
        }
    }
}
