//! Centralized error types for gmailgrab.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the gmailgrab library.
#[derive(Error, Debug)]
pub enum GrabError {
    /// HTTP transport failure (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Gmail API returned a non-success status.
    #[error("Gmail API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A label name did not match any label in the account.
    #[error("Label not found: '{0}'")]
    LabelNotFound(String),

    /// No usable credentials could be loaded.
    #[error("No credentials: {0}")]
    Auth(String),

    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The attachment payload was not valid URL-safe base64.
    #[error("Invalid attachment encoding: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A message carried an internalDate that could not be parsed.
    #[error("Invalid message timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// Processing one attachment failed; carries the attachment id for context.
    #[error("Failed to {action} attachment '{id}': {source}")]
    Attachment {
        action: &'static str,
        id: String,
        #[source]
        source: Box<GrabError>,
    },

    /// The user aborted an interactive prompt.
    #[error("Cancelled by user")]
    Cancelled,
}

/// Convenience alias for `Result<T, GrabError>`.
pub type Result<T> = std::result::Result<T, GrabError>;

impl GrabError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error with the id of the attachment being processed.
    pub fn attachment(action: &'static str, id: impl Into<String>, source: GrabError) -> Self {
        Self::Attachment {
            action,
            id: id.into(),
            source: Box::new(source),
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `GrabError`
/// when no path context is available (rare — prefer `GrabError::io`).
impl From<std::io::Error> for GrabError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
