//! Error types for the search synchronizer.
//!
//! This module defines the centralized error type [`ReelsearchError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Errors never escape the search session as panics: the worker converts every
//! failure into a terminal `Error` status with a user-visible message.

use thiserror::Error;

/// Generic message shown when a search fails without a server-supplied reason.
pub const DEFAULT_SEARCH_ERROR: &str = "Error searching movies";

/// Message shown when a detail lookup answers 404.
pub const MOVIE_NOT_FOUND: &str = "Movie not found";

/// The main error type for search operations.
///
/// # Examples
///
/// ```
/// use reelsearch::domain::ReelsearchError;
///
/// fn lookup() -> Result<(), ReelsearchError> {
///     Err(ReelsearchError::NotFound("Movie not found".to_string()))
/// }
///
/// assert_eq!(lookup().unwrap_err().user_message(), "Movie not found");
/// ```
#[derive(Debug, Error)]
pub enum ReelsearchError {
    /// No usable response was received from the search backend.
    ///
    /// Covers connection failures, timeouts, and non-success HTTP statuses. The
    /// string is already phrased for display.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend reported that the requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response body could not be interpreted at all.
    ///
    /// Partially-shaped payloads are not an error; they decode to empty results.
    #[error("Payload error: {0}")]
    Payload(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelsearchError {
    /// Returns the message to surface to the user, without the category prefix.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(msg)
            | Self::NotFound(msg)
            | Self::Payload(msg)
            | Self::Config(msg) => msg.clone(),
            Self::Io(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for ReelsearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            tracing::debug!(error = %err, timeout = err.is_timeout(), "no response from search service");
            Self::Transport(DEFAULT_SEARCH_ERROR.to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                404 => Self::NotFound(MOVIE_NOT_FOUND.to_string()),
                _ => Self::Transport(format!("HTTP {status}: {DEFAULT_SEARCH_ERROR}")),
            }
        } else if err.is_decode() {
            Self::Payload(format!("failed to decode response: {err}"))
        } else {
            Self::Transport(DEFAULT_SEARCH_ERROR.to_string())
        }
    }
}

impl From<toml::de::Error> for ReelsearchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid TOML: {err}"))
    }
}

/// A specialized `Result` type for search operations.
pub type Result<T> = std::result::Result<T, ReelsearchError>;
