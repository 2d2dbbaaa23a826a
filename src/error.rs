//! Unified error types for safe-batch
//!
//! Every failure that crosses a module boundary is a [`SubmitError`]
//! carrying an [`ErrorCode`]. The code decides how far a failure reaches:
//! one network, or the whole run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all submission operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl SubmitError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Configuration, msg)
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Payload, msg)
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Encoding, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, msg)
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RelayRejected, msg)
    }

    pub fn keystore(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::KeyStore, msg)
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Signing, msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Parse, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Whether this error stops the whole run rather than a single network.
    pub fn is_fatal(&self) -> bool {
        self.code.scope() == ErrorScope::Run
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SubmitError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Setup errors
    Configuration,
    Payload,
    Encoding,

    // Relay errors
    Network,
    Timeout,
    RelayRejected,

    // Key errors
    KeyStore,
    Signing,

    // Parse errors
    Parse,

    // Internal
    Internal,
}

/// How far a failure propagates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Abandon the current network, continue with the next one
    Network,
    /// Nothing can proceed without it
    Run,
}

impl ErrorCode {
    pub fn scope(&self) -> ErrorScope {
        match self {
            ErrorCode::KeyStore | ErrorCode::Signing => ErrorScope::Run,
            _ => ErrorScope::Network,
        }
    }

    /// Transport-level failures (the relay could not be reached or answered badly)
    pub fn is_transport(&self) -> bool {
        matches!(self, ErrorCode::Network | ErrorCode::Timeout)
    }
}

/// Result type alias for submission operations
pub type SubmitResult<T> = Result<T, SubmitError>;

// Transport errors from the relay client

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SubmitError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            SubmitError::new(ErrorCode::Network, "Connection failed")
        } else if e.is_decode() {
            SubmitError::new(ErrorCode::Parse, format!("Invalid relay response: {}", e))
        } else {
            SubmitError::new(ErrorCode::Network, e.to_string())
        }
    }
}
