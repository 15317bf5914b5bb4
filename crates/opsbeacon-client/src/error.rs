//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Client error type.
///
/// Single-rooted: callers can match broadly on [`Error`] or narrowly on a
/// variant. Domain wrappers ([`Error::CommandExecution`],
/// [`Error::FileOperation`], [`Error::Mcp`]) keep the underlying API failure
/// as their `source` instead of flattening it away.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied malformed or missing input. Raised before any
    /// network call and never retried.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the problem.
        message: String,
        /// The offending input field, when known.
        field: Option<String>,
    },

    /// Authentication failed (401) or the token lacks permissions (403).
    #[error("{0}")]
    Auth(String),

    /// A specific resource is absent.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Resource type, e.g. "Trigger" or "Tool".
        resource: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// The API rate limit was exceeded (429). Retrying is the caller's
    /// responsibility.
    #[error("rate limit exceeded, retry later")]
    RateLimit {
        /// Seconds to wait, from the `Retry-After` header when present
        /// and numeric.
        retry_after: Option<u64>,
    },

    /// The server returned an error response not covered by a more
    /// specific variant.
    #[error("API error: {message}")]
    Api {
        /// HTTP status code, when an HTTP response was obtained.
        status: Option<u16>,
        /// Error message, from the body's `err`/`error` field when the
        /// body parses as JSON, else the raw response text.
        message: String,
        /// Raw response body, when available.
        body: Option<String>,
    },

    /// Could not connect to the API (DNS or connect failure).
    #[error("connection error: {0}")]
    Connection(String),

    /// The request timed out before a response was obtained.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// The configured request timeout.
        timeout: Duration,
    },

    /// Command execution failed. Carries the command (name or full text)
    /// and connection for diagnostics.
    #[error("command execution failed: {source}")]
    CommandExecution {
        /// Command name or full command line.
        command: Option<String>,
        /// Connection the command targeted.
        connection: Option<String>,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A file operation failed.
    #[error("file operation '{operation}' failed: {message}")]
    FileOperation {
        /// File name or identifier involved.
        file: Option<String>,
        /// Which operation failed: "upload", "get_download_url", "download".
        operation: &'static str,
        /// Human-readable description.
        message: String,
        /// The underlying failure, when one exists.
        #[source]
        source: Option<Box<Error>>,
    },

    /// An MCP trigger operation failed.
    #[error("MCP error: {message}")]
    Mcp {
        /// Trigger the operation targeted.
        trigger: Option<String>,
        /// Human-readable description.
        message: String,
        /// The underlying failure, when one exists.
        #[source]
        source: Option<Box<Error>>,
    },

    /// URL construction failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file IO failed outside of a tagged file operation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error with no field attribution.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error for a named input field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not-found error for a resource type and identifier.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
            || matches!(
                self,
                Error::Api {
                    status: Some(404),
                    ..
                }
            )
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimit { .. })
    }

    /// Check if this is an API-level failure: the server was reached and
    /// answered with an error. Transport failures ([`Error::Connection`],
    /// [`Error::Timeout`]) and authentication failures are not API-level.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::RateLimit { .. })
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status: Some(s), .. } if *s >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
