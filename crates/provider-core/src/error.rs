//! Error types shared by the providers.
//!
//! A single error type with explicit variants for transport, authentication,
//! protocol, input validation, and state-wait failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for provider operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing credentials, token acquisition).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from a remote API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (schema attributes, URLs, regions).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A wait for a remote state transition did not complete.
    #[error("wait failed: {0}")]
    Wait(#[from] WaitError),
}

impl Error {
    /// Returns true if the remote API answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Protocol(e) if e.is_not_found())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded.
    #[error("malformed response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Transport(TransportError::Decode {
            message: err.to_string(),
        })
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Neither username/password nor an identity cookie was supplied.
    #[error(
        "either Bluemix username and password or Bluemix identity cookie \
         (BM_IDENTITY_COOKIE environment variable) are required"
    )]
    MissingCredentials,

    /// The token endpoint answered without the expected token field.
    #[error("empty {field} in token response")]
    EmptyToken { field: &'static str },

    /// The IMS token could not be acquired within the retry budget.
    #[error("failed to acquire the IMS token after {attempts} attempts")]
    ImsTokenAcquisition {
        attempts: u32,
        /// Why the final attempt failed.
        #[source]
        last_error: Box<Error>,
    },

    /// No refresh token is held by the session.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,
}

/// Protocol-level errors from non-success HTTP responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error code reported by the server (if present).
    pub error: Option<String>,
    /// Error message reported by the server (if present).
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if the server reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.error.as_deref() == Some("invalid_grant")
            || self.error.as_deref() == Some("unauthorized")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid endpoint URL.
    #[error("invalid endpoint URL '{value}': {reason}")]
    EndpointUrl { value: String, reason: String },

    /// Invalid region name.
    #[error("invalid region '{value}': {reason}")]
    Region { value: String, reason: String },

    /// Invalid timeout value.
    #[error("invalid timeout '{value}': expected a number of seconds")]
    Timeout { value: String },

    /// A schema attribute failed validation.
    #[error("attribute '{key}': {reason}")]
    Attribute { key: String, reason: String },

    /// Unknown resource or data source type.
    #[error("unknown {kind} type '{name}'")]
    UnknownType { kind: &'static str, name: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

impl InvalidInputError {
    pub fn attribute(key: impl Into<String>, reason: impl Into<String>) -> Self {
        InvalidInputError::Attribute {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from waiting on a remote state transition.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The target state was not reached in time.
    #[error("timeout after {timeout_secs}s waiting for {target} (last state: {last_state})")]
    Timeout {
        target: String,
        last_state: String,
        timeout_secs: u64,
    },

    /// The object entered a state that is neither pending nor target.
    #[error("unexpected state '{state}', wanted target {target}")]
    UnexpectedState { state: String, target: String },
}
