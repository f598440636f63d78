//! Error types for onboarding operations.
//!
//! Transport failures from the dashboard API and workflow outcomes that end a
//! run share one enum. Every variant carries a stable code for logs and maps to
//! the process exit code.

use thiserror::Error;

/// Exit code for any fatal condition or argument error.
pub const EXIT_FATAL: i32 = 2;

/// Main error type for onboarding operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Resource not found (organization, shard, template, or a network that must exist)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A network with the requested name already exists
    #[error("Network `{0}` already exists")]
    AlreadyExists(String),

    /// A gating dashboard call returned a non-success status
    #[error("Upstream error during {operation}: {message}")]
    Upstream {
        /// Operation that was being performed
        operation: String,
        /// Underlying failure
        message: String,
    },

    /// A network reported as created could not be found afterwards
    #[error("Network `{0}` could not be found after creation")]
    CreationVerificationFailed(String),

    /// A device could not be found in the target network after claiming it
    #[error("Claiming or moving device `{serial}` into network `{network}` failed")]
    EnrollmentFailed {
        /// Device serial number
        serial: String,
        /// Target network identifier
        network: String,
    },

    /// Dashboard is unreachable or answered with a server-side failure
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Request rejected (bad credentials, forbidden, malformed)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to parse a dashboard response
    #[error("Failed to parse dashboard response: {0}")]
    ParseError(String),

    /// Invalid endpoint or URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for onboarding operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps a lower-level failure as an upstream error for `operation`.
    #[must_use]
    pub fn upstream(operation: impl Into<String>, source: &Error) -> Self {
        Self::Upstream {
            operation: operation.into(),
            message: source.to_string(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::CreationVerificationFailed(_) => "CREATION_VERIFICATION_FAILED",
            Self::EnrollmentFailed { .. } => "ENROLLMENT_FAILED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Process exit code for a run that ended with this error.
    ///
    /// Every fatal condition exits with the same status.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        EXIT_FATAL
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
