//! Response envelope returned by every generation operation.
//!
//! The serialized shape follows the tool-result convention used by agent
//! hosts: a list of typed content parts, an optional error flag and an
//! optional structured record.

use serde::{Deserialize, Serialize};

use crate::paths::ExecutionId;
use crate::render::Theme;

/// Caller-supplied parameters of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateParams {
    /// Slide markup.
    pub text: String,
    /// Theme, defaulting to [`Theme::Default`].
    #[serde(default)]
    pub theme: Theme,
}

impl GenerateParams {
    pub fn new(text: impl Into<String>, theme: Theme) -> Self {
        Self {
            text: text.into(),
            theme,
        }
    }
}

/// Named metadata attached to image results so a UI can repopulate its
/// fields without relying on part order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub execution_id: ExecutionId,
    pub params: GenerateParams,
}

/// An embedded resource carried inline in a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedResource {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64 payload for binary resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
    /// Inline text for textual resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One typed part of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        /// Base64 image bytes.
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        resource: EmbeddedResource,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// Text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Embedded resource of a resource part.
    pub fn as_resource(&self) -> Option<&EmbeddedResource> {
        match self {
            Content::Resource { resource } => Some(resource),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Content::Image { .. })
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Result of one operation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
    pub is_error: bool,
    #[serde(
        rename = "structuredContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful result made of `content`.
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
            structured_content: None,
        }
    }

    /// An error-flagged result with a single text part.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(message)],
            is_error: true,
            structured_content: None,
        }
    }

    /// Attach a structured record.
    pub fn with_structured(mut self, value: serde_json::Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Text parts in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(Content::as_text)
    }

    /// Image parts in order.
    pub fn images(&self) -> impl Iterator<Item = &Content> {
        self.content.iter().filter(|c| c.is_image())
    }

    /// First embedded resource, if any.
    pub fn resource(&self) -> Option<&EmbeddedResource> {
        self.content.iter().find_map(Content::as_resource)
    }

    /// Generation metadata, from the structured record when present and
    /// otherwise from the first two text parts.
    pub fn generation_meta(&self) -> Option<GenerationMeta> {
        if let Some(value) = &self.structured_content
            && let Ok(meta) = serde_json::from_value::<GenerationMeta>(value.clone())
        {
            return Some(meta);
        }

        let mut texts = self.texts();
        let id = texts.next()?;
        let params = texts.next()?;
        Some(GenerationMeta {
            execution_id: serde_json::from_value(serde_json::Value::String(id.to_string())).ok()?,
            params: serde_json::from_str(params).ok()?,
        })
    }
}
