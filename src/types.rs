//! Core types for playlist-ajax

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Field holding the selected playlist checkboxes on the merge form
pub const FIELD_PLAYLIST: &str = "playlist";
/// Target playlist name (merge and generic forms)
pub const FIELD_NAME: &str = "name";
/// Target playlist name on the save-queue form
pub const FIELD_QUEUE_NAME: &str = "queue_name";
/// Hidden id of the playlist picked on the clean form
pub const FIELD_CLEAN_ID: &str = "clean_playlist";
/// Typed playlist name on the clean form
pub const FIELD_CLEAN_NAME: &str = "clean_playlist_name";
/// Target playlist name on the update-liked form
pub const FIELD_LIKED_NAME: &str = "liked_name";
/// Overwrite flag set after the user confirms replacing a playlist
pub const FIELD_OVERWRITE: &str = "overwrite";

/// Identity of a trigger control (a submit button)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(pub String);

impl ControlId {
    /// Create a control id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP method of a form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// Fields go into the query string
    Get,
    /// Fields go into a url-encoded body
    #[default]
    Post,
}

/// Semantic kind of a form, derived from its action and markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Merge several playlists into one
    Merge,
    /// Create a cleaned copy of a playlist
    Clean,
    /// Refresh the liked-songs playlist
    UpdateLiked,
    /// Anything else
    Generic,
}

/// Input kind of a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input type=text>` and friends
    Text,
    /// `<input type=hidden>`
    Hidden,
    /// `<textarea>`
    TextArea,
    /// `<select>`
    Select,
    /// `<input type=checkbox>`
    Checkbox {
        /// Whether it is ticked
        checked: bool,
    },
    /// `<input type=radio>`
    Radio {
        /// Whether it is selected
        checked: bool,
    },
    /// `<input type=submit>`; never serialized
    Submit,
}

/// A named form field with its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name (empty for unnamed inputs)
    pub name: String,
    /// Current value
    pub value: String,
    /// Input kind
    pub kind: FieldKind,
}

impl Field {
    fn with_kind(name: &str, value: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            kind,
        }
    }

    /// Text input
    pub fn text(name: &str, value: &str) -> Self {
        Self::with_kind(name, value, FieldKind::Text)
    }

    /// Hidden input
    pub fn hidden(name: &str, value: &str) -> Self {
        Self::with_kind(name, value, FieldKind::Hidden)
    }

    /// Textarea
    pub fn textarea(name: &str, value: &str) -> Self {
        Self::with_kind(name, value, FieldKind::TextArea)
    }

    /// Select with its chosen value
    pub fn select(name: &str, value: &str) -> Self {
        Self::with_kind(name, value, FieldKind::Select)
    }

    /// Checkbox
    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self::with_kind(name, value, FieldKind::Checkbox { checked })
    }

    /// Radio button
    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self::with_kind(name, value, FieldKind::Radio { checked })
    }

    /// Whether this is a checkbox or radio button
    pub const fn is_toggle(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox { .. } | FieldKind::Radio { .. })
    }

    /// Whether this is a ticked checkbox or selected radio button
    pub const fn is_checked(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Checkbox { checked: true } | FieldKind::Radio { checked: true }
        )
    }

    /// Trimmed value, or `None` when blank
    pub fn non_blank(&self) -> Option<&str> {
        let v = self.value.trim();
        if v.is_empty() { None } else { Some(v) }
    }
}

/// A submittable form as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    /// Action endpoint (absolute path or URL)
    pub action: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Whether the form is submitted in the background (`form.ajax`)
    pub ajax: bool,
    /// CSS classes on the form element
    pub classes: Vec<String>,
    /// Field set in document order
    pub fields: Vec<Field>,
    /// Submit controls; the first one carries the percent indicator
    pub controls: Vec<ControlId>,
}

impl FormDescriptor {
    /// Create an AJAX POST form for an action
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            method: HttpMethod::Post,
            ajax: true,
            classes: Vec::new(),
            fields: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Mark the form as a plain (full navigation) form
    #[must_use]
    pub const fn plain(mut self) -> Self {
        self.ajax = false;
        self
    }

    /// Add a CSS class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a submit control
    #[must_use]
    pub fn with_control(mut self, control: ControlId) -> Self {
        self.controls.push(control);
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Semantic kind, derived from action path, classes and fields
    pub fn kind(&self) -> FormKind {
        let action = self.action.to_lowercase();
        if action.contains("/merge") || self.has_class("merge") {
            FormKind::Merge
        } else if action.contains("/clean") || self.has_class("clean-panel") {
            FormKind::Clean
        } else if action.contains("/update_liked") || self.field(FIELD_LIKED_NAME).is_some() {
            FormKind::UpdateLiked
        } else {
            FormKind::Generic
        }
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Non-blank trimmed value of the first field with this name
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Field::non_blank)
    }

    /// Set a field's value, appending a hidden field when it does not exist
    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.to_string();
        } else {
            self.fields.push(Field::hidden(name, value));
        }
    }

    /// Control that carries the percent indicator
    pub fn primary_control(&self) -> Option<&ControlId> {
        self.controls.first()
    }

    /// Name/value pairs in document order, the way a browser builds form data
    ///
    /// Unnamed fields and submit inputs are skipped; checkboxes and radios are
    /// only included when checked, with `on` for an empty value.
    pub fn serialize(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|f| !f.name.is_empty() && f.kind != FieldKind::Submit)
            .filter(|f| !f.is_toggle() || f.is_checked())
            .map(|f| {
                let value = if f.is_toggle() && f.value.is_empty() {
                    "on".to_string()
                } else {
                    f.value.clone()
                };
                (f.name.clone(), value)
            })
            .collect()
    }
}

/// Server-issued handle for an asynchronously running operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Opaque task identifier
    pub task_id: String,
}

impl JobHandle {
    /// Create a handle from a task id
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }
}

/// Status reported by the progress endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Still working
    Running,
    /// Finished successfully
    Done,
    /// Finished with an error
    Error,
    /// Missing or unrecognized status
    #[default]
    #[serde(other)]
    Unknown,
}

/// Latest known state of a job, as returned by one poll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Whether the server could report on the job at all
    #[serde(default)]
    pub ok: bool,
    /// Job status
    #[serde(default)]
    pub status: JobStatus,
    /// Items processed so far
    #[serde(default, deserialize_with = "lenient_count")]
    pub processed: u64,
    /// Total items (0 when unknown)
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    /// Human-readable status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read a count given as a number or a numeric string
///
/// Negative, fractional-negative and non-numeric values yield `None`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn count_of(value: Option<&Value>) -> Option<u64> {
    let as_count = |f: f64| (f.is_finite() && f >= 0.0).then_some(f as u64);
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(as_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse().ok().and_then(as_count))
        }
        _ => None,
    }
}

/// Counts in progress snapshots fall back to 0 instead of failing the poll
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(count_of(value.as_ref()).unwrap_or(0))
}
