//! Error types for MCP probe operations.

use thiserror::Error;

/// Result type for MCP probe operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Error type for MCP probe operations.
///
/// Step-level transport failures during a probe run are captured inside
/// the report rather than raised; this type covers failures that prevent
/// a probe from being constructed or serialized at all.
#[derive(Debug, Error)]
pub enum McpError {
    /// Caller supplied malformed or missing input.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the problem.
        message: String,
        /// The offending input field, when known.
        field: Option<String>,
    },

    /// Failed to construct the HTTP transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// Create a validation error for a named input field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
