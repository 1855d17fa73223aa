// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the REST action client
//!
//! Errors here describe failures of the client machinery itself: building a
//! request, talking to the transport, fetching a header value. Framework
//! responses with a FAILURE/ERROR status are not errors; they are routed to
//! handlers by the dispatcher.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the REST action client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Action descriptor rejected at construction
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Network level failure not covered by `Http`
    #[error("Network error: {0}")]
    Network(String),

    /// Request was cancelled through its cancellation token
    #[error("Request to {url} was cancelled")]
    Cancelled { url: String },

    /// Timeout error
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        url: Option<String>,
    },

    /// A header value provider could not produce a value
    #[error("Header provider for '{header}' failed: {reason}")]
    HeaderProvider { header: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid action error
    pub fn invalid_action<S: Into<String>>(msg: S) -> Self {
        Error::InvalidAction(msg.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(url: impl Into<String>) -> Self {
        Error::Cancelled { url: url.into() }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: None,
        }
    }

    /// Create a header provider error
    pub fn header_provider(header: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::HeaderProvider {
            header: header.into(),
            reason: reason.into(),
        }
    }

    /// Check if the request was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_))
    }

    /// Check if this error happened while talking to the server
    pub fn is_transport(&self) -> bool {
        self.is_network() || self.is_cancelled() || self.is_timeout()
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Cancelled { url } => Some(url),
            Error::Timeout { url: Some(u), .. } => Some(u),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add URL context to error
    fn with_url(self, url: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::Timeout {
                operation,
                duration_ms,
                ..
            } => Error::Timeout {
                operation,
                duration_ms,
                url: Some(url.to_string()),
            },
            other => other,
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}
