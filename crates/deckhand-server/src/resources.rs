//! Read-only resources: the slide syntax guide and the mini-app bundle.

use std::path::{Path, PathBuf};

use crate::error::{ServerError, ServerResult};
use crate::protocol::{ResourceContents, ResourceDescriptor};

/// URI of the syntax guide.
pub const SYNTAX_GUIDE_URI: &str = "deckhand://syntax-guide";

/// URI of the mini-app bundle.
pub const UI_BUNDLE_URI: &str = "ui://deckhand/app.html";

/// MIME type hosts recognise as an embeddable app.
pub const UI_BUNDLE_MIME: &str = "text/html;profile=mcp-app";

const SYNTAX_GUIDE: &str = include_str!("../assets/syntax-guide.md");

/// Serves the two static resources.
#[derive(Debug, Clone)]
pub struct Resources {
    ui_bundle: PathBuf,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(Self::default_ui_bundle())
    }
}

impl Resources {
    /// Serve the mini-app from `ui_bundle`.
    pub fn new(ui_bundle: impl Into<PathBuf>) -> Self {
        Self {
            ui_bundle: ui_bundle.into(),
        }
    }

    /// Bundle installed alongside the running executable, falling back to
    /// the one in this crate's source tree.
    pub fn default_ui_bundle() -> PathBuf {
        let exe = std::env::current_exe().ok();
        locate_ui_bundle(exe.as_deref().and_then(Path::parent))
    }

    pub fn ui_bundle(&self) -> &Path {
        &self.ui_bundle
    }

    pub fn list(&self) -> Vec<ResourceDescriptor> {
        vec![
            ResourceDescriptor {
                uri: SYNTAX_GUIDE_URI.to_string(),
                name: "Slide syntax guide".to_string(),
                description: "How to write slide decks for the generate tools.".to_string(),
                mime_type: "text/markdown".to_string(),
            },
            ResourceDescriptor {
                uri: UI_BUNDLE_URI.to_string(),
                name: "Slide editor".to_string(),
                description: "Interactive editor that previews and exports generated slides."
                    .to_string(),
                mime_type: UI_BUNDLE_MIME.to_string(),
            },
        ]
    }

    /// Read a resource by URI.
    ///
    /// The UI bundle is read from disk on every call so edits show up
    /// without a restart.
    pub async fn read(&self, uri: &str) -> ServerResult<ResourceContents> {
        match uri {
            SYNTAX_GUIDE_URI => Ok(ResourceContents {
                uri: uri.to_string(),
                mime_type: "text/markdown".to_string(),
                text: SYNTAX_GUIDE.to_string(),
            }),
            UI_BUNDLE_URI => {
                let text = tokio::fs::read_to_string(&self.ui_bundle)
                    .await
                    .map_err(|e| ServerError::Io {
                        path: self.ui_bundle.clone(),
                        message: e.to_string(),
                    })?;
                Ok(ResourceContents {
                    uri: uri.to_string(),
                    mime_type: UI_BUNDLE_MIME.to_string(),
                    text,
                })
            }
            other => Err(ServerError::ResourceNotFound(other.to_string())),
        }
    }
}

/// First existing of `<exe dir>/ui/index.html` and
/// `<exe dir>/../share/deckhand/ui/index.html`, else the source-tree bundle.
fn locate_ui_bundle(exe_dir: Option<&Path>) -> PathBuf {
    let mut installed = exe_dir.into_iter().flat_map(|dir| {
        [
            dir.join("ui").join("index.html"),
            dir.join("..")
                .join("share")
                .join("deckhand")
                .join("ui")
                .join("index.html"),
        ]
    });
    installed
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("ui")
                .join("index.html")
        })
}
