//! Network access to the playlist server
//!
//! Provides a single interface for submitting forms, polling job progress
//! and fetching comparisons, so the controller works the same against the real server and
//! against test doubles.

mod http;

pub use http::{COMPARE_PATH, HttpBackend, REQUESTED_WITH};

use crate::error::Result;
use crate::types::{FormDescriptor, JobHandle, ProgressSnapshot};
use async_trait::async_trait;

/// Raw answer to a form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Backend trait for form submission and progress polling
#[async_trait]
pub trait Backend: Send + Sync {
    /// Submit a form in the background
    ///
    /// Any HTTP status is a successful return; only transport-level failures
    /// are errors.
    async fn submit(&self, form: &FormDescriptor) -> Result<RawResponse>;

    /// Fetch the latest snapshot of a job
    ///
    /// A non-2xx status is reported as [`crate::error::Error::HttpStatus`].
    async fn fetch_progress(&self, job: &JobHandle) -> Result<ProgressSnapshot>;

    /// Ask the server to compare the library with another user's
    ///
    /// Like [`Backend::submit`], any HTTP status is returned as-is.
    async fn compare(&self, user: &str) -> Result<RawResponse>;
}
