//! Library comparison with another user
//!
//! The compare button fetches a comparison once. After that it holds the
//! result URL and opening it does not hit the server again.

use crate::backend::RawResponse;
use crate::error::FailureKind;
use crate::submit::progress::Resolution;
use crate::types::ControlId;
use serde_json::Value;

/// Shown when compare is pressed with no user
pub const ENTER_USER: &str = "Enter a user id or URL";
/// Shown when the server refuses the comparison without detail
pub const COMPARE_FAILED: &str = "Failed to fetch";
/// Shown when the server cannot be reached or answers garbage
pub const NETWORK_ERROR: &str = "Network error";
/// Shown when the comparison is ready to open
pub const COMPARISON_READY: &str = "Comparison ready, click to view";
/// Label of the button before a comparison was fetched
pub const COMPARE_LABEL: &str = "Compare";
/// Label of the button once it holds a result
pub const VIEW_RESULT: &str = "View result";

/// Compare button and the result it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareButton {
    control: ControlId,
    result_url: Option<String>,
}

impl CompareButton {
    /// A button that has not fetched anything yet
    pub const fn new(control: ControlId) -> Self {
        Self {
            control,
            result_url: None,
        }
    }

    /// Control the busy state is shown on
    pub const fn control(&self) -> &ControlId {
        &self.control
    }

    /// URL of the fetched comparison
    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    /// Whether a result is ready to open
    pub const fn is_ready(&self) -> bool {
        self.result_url.is_some()
    }

    /// Current button label
    pub const fn label(&self) -> &'static str {
        if self.is_ready() {
            VIEW_RESULT
        } else {
            COMPARE_LABEL
        }
    }

    pub(crate) fn mark_ready(&mut self, url: String) {
        self.result_url = Some(url);
    }
}

/// How a press of the compare button ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// No user was given; nothing was sent
    MissingUser,
    /// The button already held a result; open this URL
    Open(String),
    /// Comparison fetched; the button now holds this URL
    Ready(String),
    /// Fetch failed and was notified
    Failed(Resolution),
}

impl CompareOutcome {
    /// Failure kind for presses that did not produce a result
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::MissingUser => Some(FailureKind::ValidationBlocked),
            Self::Failed(r) => r.failure,
            Self::Open(_) | Self::Ready(_) => None,
        }
    }
}

/// Result URL of a comparison response, or the failure to report
///
/// A body that is not JSON counts as a network error.
pub fn interpret_compare(response: &RawResponse) -> Result<String, Resolution> {
    let Ok(json) = serde_json::from_str::<Value>(&response.body) else {
        return Err(Resolution::failed(
            NETWORK_ERROR,
            FailureKind::TransportFailure,
        ));
    };
    let ok = json.get("ok").and_then(Value::as_bool).unwrap_or(false);
    let url = json
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty());

    match url {
        Some(url) if response.is_success() && ok => Ok(url.to_string()),
        _ => {
            let message = json
                .get("error")
                .and_then(Value::as_str)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(COMPARE_FAILED);
            Err(Resolution::failed(message, FailureKind::ServerReportedError))
        }
    }
}
