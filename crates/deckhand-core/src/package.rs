//! Assembly of response envelopes from collected artifacts.

use crate::collect::EncodedArtifact;
use crate::envelope::{Content, EmbeddedResource, GenerateParams, GenerationMeta, ToolResult};
use crate::error::Error;
use crate::paths::StagingDir;

/// Build the result for an image-set invocation.
///
/// Parts, in order: execution identifier, serialized parameters, then one
/// image per slide. The same metadata is attached as a structured record.
pub fn package_images(
    dir: &StagingDir,
    params: &GenerateParams,
    images: Vec<EncodedArtifact>,
) -> ToolResult {
    let meta = GenerationMeta {
        execution_id: dir.id(),
        params: params.clone(),
    };
    let params_json = serde_json::to_string(params).unwrap_or_default();
    let structured = serde_json::to_value(&meta).unwrap_or_default();

    let mut content = Vec::with_capacity(images.len() + 2);
    content.push(Content::text(dir.id().to_string()));
    content.push(Content::text(params_json));
    content.extend(images.into_iter().map(|image| Content::Image {
        data: image.data,
        mime_type: image.mime_type.to_string(),
    }));

    ToolResult::success(content).with_structured(structured)
}

/// Build the result for a single-document invocation.
pub fn package_document(dir: &StagingDir, document: EncodedArtifact) -> ToolResult {
    ToolResult::success(vec![Content::Resource {
        resource: EmbeddedResource {
            uri: dir.locator(&document.name),
            mime_type: document.mime_type.to_string(),
            blob: Some(document.data),
            text: None,
        },
    }])
}

/// Convert a failed invocation into an error-flagged result.
pub fn package_error(error: &Error) -> ToolResult {
    ToolResult::error(format!("{}: {}", error.kind(), error))
}
