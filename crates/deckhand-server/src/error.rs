//! Error types for deckhand server.

use std::path::PathBuf;

/// Server error type.
///
/// These are protocol-level faults. Generation failures never show up here;
/// they are returned as error-flagged tool results.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Incoming bytes were not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON was valid but not a JSON-RPC request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown method.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Parameters did not match the method.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown tool name in `tools/call`.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown resource URI in `resources/read`.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServerError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) | Self::UnknownTool(_) => -32602,
            Self::ResourceNotFound(_) => -32002,
            Self::Io { .. } | Self::Json(_) => -32603,
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ServerError::Parse("x".into()).code(), -32700);
        assert_eq!(ServerError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(ServerError::UnknownTool("x".into()).code(), -32602);
        assert_eq!(ServerError::ResourceNotFound("x".into()).code(), -32002);
    }
}
