//! Interpretation of submission responses
//!
//! Priority order:
//! 1. JSON with a `task_id` → track the job
//! 2. JSON with `message` / `msg` → notify (error if `ok` is `false`)
//! 3. HTML containing `#flashes .flash` → notify with its text and class
//! 4. bare status: 2xx → "Done", otherwise "Request failed"

use crate::backend::RawResponse;
use crate::error::FailureKind;
use crate::types::JobHandle;
use crate::ui::{DEFAULT_NOTIFY_DURATION, Notifier, Severity};
use scraper::{Html, Selector};
use serde_json::Value;
use std::time::Duration;

/// Generic success message when the server said nothing useful
pub const DONE: &str = "Done";
/// Generic failure message
pub const REQUEST_FAILED: &str = "Request failed";

const FLASH_SELECTOR: &str = "#flashes .flash";

/// What a submission response asks the controller to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Server started a background job
    Track(JobHandle),
    /// Show a final notification
    Notify {
        /// Message text
        message: String,
        /// Severity
        severity: Severity,
        /// How long to show it
        duration: Duration,
        /// Failure kind for error notifications
        failure: Option<FailureKind>,
    },
}

impl Interpretation {
    fn notify(
        message: impl Into<String>,
        severity: Severity,
        millis: u64,
        failure: Option<FailureKind>,
    ) -> Self {
        Self::Notify {
            message: message.into(),
            severity,
            duration: Duration::from_millis(millis),
            failure,
        }
    }
}

/// Interpret a raw submission response
pub fn interpret(response: &RawResponse) -> Interpretation {
    if let Ok(json) = serde_json::from_str::<Value>(&response.body) {
        if let Some(found) = from_json(&json) {
            return found;
        }
    }

    if let Some((message, severity)) = find_flash(&response.body) {
        let failure = (severity == Severity::Error).then_some(FailureKind::ServerReportedError);
        return Interpretation::notify(message, severity, 4000, failure);
    }

    if response.is_success() {
        Interpretation::notify(DONE, Severity::Success, 3000, None)
    } else {
        Interpretation::notify(
            REQUEST_FAILED,
            Severity::Error,
            4000,
            Some(FailureKind::TransportFailure),
        )
    }
}

/// A JSON value counts as present when it is truthy
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn from_json(json: &Value) -> Option<Interpretation> {
    let obj = json.as_object()?;

    if let Some(task_id) = truthy_text(obj.get("task_id")) {
        return Some(Interpretation::Track(JobHandle::new(task_id)));
    }

    let message = truthy_text(obj.get("message")).or_else(|| truthy_text(obj.get("msg")))?;
    if obj.get("ok") == Some(&Value::Bool(false)) {
        Some(Interpretation::notify(
            message,
            Severity::Error,
            4000,
            Some(FailureKind::ServerReportedError),
        ))
    } else {
        Some(Interpretation::notify(message, Severity::Success, 4000, None))
    }
}

/// Text and severity of the first flash message in an HTML body
fn find_flash(body: &str) -> Option<(String, Severity)> {
    page_flashes(body).into_iter().next()
}

/// Every `#flashes .flash` message of a page, in document order
pub fn page_flashes(html: &str) -> Vec<(String, Severity)> {
    let Ok(selector) = Selector::parse(FLASH_SELECTOR) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .map(|el| {
            let class = el.value().attr("class").unwrap_or_default();
            let text = el.text().collect::<String>().trim().to_string();
            (text, Severity::from_class(class))
        })
        .collect()
}

/// Turn the flash messages rendered into a page into notifications
///
/// Returns how many were shown. Empty flashes are skipped.
pub fn announce_flashes(notifier: &dyn Notifier, html: &str) -> usize {
    let flashes = page_flashes(html);
    let mut shown = 0;
    for (message, severity) in flashes.iter().filter(|(m, _)| !m.is_empty()) {
        notifier.notify(message, *severity, DEFAULT_NOTIFY_DURATION);
        shown += 1;
    }
    shown
}
