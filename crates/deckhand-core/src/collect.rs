//! Collection of renderer output from a staging directory.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};
use crate::paths::StagingDir;
use crate::render::{IMAGE_DIR, OutputFormat};

/// Extension of the image files the renderer writes.
const IMAGE_EXTENSION: &str = "png";

/// A base64-encoded artifact ready for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    /// File name relative to its directory (e.g. `3.png`).
    pub name: String,
    /// Base64 payload (standard alphabet, padded).
    pub data: String,
    pub mime_type: &'static str,
}

/// Read all slide images, ordered by slide number.
pub async fn collect_images(dir: &StagingDir) -> Result<Vec<EncodedArtifact>> {
    let export_dir = dir.join(IMAGE_DIR);
    let names = list_images(&export_dir).await?;
    if names.is_empty() {
        return Err(Error::MissingOutput { path: export_dir });
    }

    let mut images = Vec::with_capacity(names.len());
    for name in names {
        let path = export_dir.join(&name);
        let bytes = read_artifact(&path).await?;
        images.push(EncodedArtifact {
            name,
            data: STANDARD.encode(bytes),
            mime_type: OutputFormat::Images.mime_type(),
        });
    }

    tracing::debug!(execution_id = %dir.id(), count = images.len(), "collected images");
    Ok(images)
}

/// Read the single document produced for `format`.
pub async fn collect_document(dir: &StagingDir, format: OutputFormat) -> Result<EncodedArtifact> {
    let name = format.output_target();
    let bytes = read_artifact(&dir.join(name)).await?;

    tracing::debug!(execution_id = %dir.id(), bytes = bytes.len(), format = %format, "collected document");
    Ok(EncodedArtifact {
        name: name.to_string(),
        data: STANDARD.encode(bytes),
        mime_type: format.mime_type(),
    })
}

/// Image file names in `export_dir`, sorted by slide number.
async fn list_images(export_dir: &Path) -> Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(export_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingOutput {
                path: export_dir.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Error::ReadOutput {
                path: export_dir.to_path_buf(),
                source,
            });
        }
    };

    let mut names = Vec::new();
    loop {
        let entry = entries
            .next_entry()
            .await
            .map_err(|source| Error::ReadOutput {
                path: export_dir.to_path_buf(),
                source,
            })?;
        let Some(entry) = entry else { break };

        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION));
        if !is_image {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort_by(|a, b| compare_slide_names(a, b));
    Ok(names)
}

/// Numeric value of the leading digit run of a file name (`"12.png"` -> 12).
fn slide_number(name: &str) -> Option<u64> {
    let digits: &str = &name[..name.find(|c: char| !c.is_ascii_digit()).unwrap_or(name.len())];
    digits.parse().ok()
}

/// Order by slide number; unnumbered names go last, by name.
fn compare_slide_names(a: &str, b: &str) -> Ordering {
    match (slide_number(a), slide_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

async fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingOutput {
                path: PathBuf::from(path),
            }
        } else {
            Error::ReadOutput {
                path: PathBuf::from(path),
                source,
            }
        }
    })
}
