//! Error types for mqli.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for mqli operations.
#[derive(Error, Debug)]
pub enum MqliError {
    /// Transport errors (host unreachable, TLS failure, timeouts, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Access token could not be obtained or was rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Errors reported by the backend for a query, already normalized.
    #[error("{0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing project, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal or file I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MqliError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an authentication error with the given message.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Auth(_) => "Authentication Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using MqliError.
pub type Result<T> = std::result::Result<T, MqliError>;
