//! Error types for playlist-ajax

use thiserror::Error;

/// Errors that can occur while submitting forms or polling jobs
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure (connection refused, timeout, broken body)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status where one was required
    #[error("server returned HTTP {0}")]
    HttpStatus(u16),

    /// Body could not be decoded as the expected JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be built from the configured server and form action
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Form fields are not shaped the way the form kind expects
    #[error("malformed form: {0}")]
    MalformedForm(String),

    /// Confirmation prompt could not be shown or read
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for playlist-ajax operations
pub type Result<T> = std::result::Result<T, Error>;

/// How a submission ended when it did not succeed
///
/// None of these are fatal: every failure is surfaced as a notification and
/// the trigger controls are restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Guarded form had nothing selected or named
    ValidationBlocked,
    /// User declined the overwrite confirmation
    UserCanceled,
    /// Network exception, or a non-2xx response with no interpretable body
    TransportFailure,
    /// Server explicitly reported `ok: false` or `status: error`
    ServerReportedError,
}

impl Error {
    /// Whether this error came from the network rather than from the server's answer
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Json(_) | Self::Io(_))
    }
}
