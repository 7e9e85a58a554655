//! Error types for the WorldCat client
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! HTTP error responses from the Metadata API are NOT errors: they come back
//! as ordinary `reqwest::Response` values for the caller to inspect.

use thiserror::Error;

/// The main error type for the WorldCat client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Authorization Errors
    // ============================================================================
    #[error("Authorization failed ({status}): {code}: {message}")]
    Authorization {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Malformed token response: {message}")]
    MalformedToken { message: String },

    #[error("Trouble connecting to the authorization server: {source}")]
    AuthorizationTransport {
        #[source]
        source: reqwest::Error,
    },

    // ============================================================================
    // Invalid Argument Errors
    // ============================================================================
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("Invalid OCLC number: {message}")]
    InvalidOclcNumber { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Retries exhausted after {attempts} attempts: {reason}")]
    RetriesExhausted {
        attempts: u32,
        last_status: Option<u16>,
        reason: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create an invalid OCLC number error
    pub fn invalid_oclc_number(message: impl Into<String>) -> Self {
        Self::InvalidOclcNumber {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authorization {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a malformed token error
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Wrap a transport failure of the token exchange
    pub fn authorization_transport(source: reqwest::Error) -> Self {
        Self::AuthorizationTransport { source }
    }

    /// True for errors raised before any network I/O took place
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. }
                | Error::InvalidOclcNumber { .. }
                | Error::InvalidRequest { .. }
                | Error::Config { .. }
        )
    }

    /// True for failures of the token exchange
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Error::Authorization { .. }
                | Error::MalformedToken { .. }
                | Error::AuthorizationTransport { .. }
        )
    }

    /// Check if this error is a transient transport failure
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type alias for the WorldCat client
pub type Result<T> = std::result::Result<T, Error>;
