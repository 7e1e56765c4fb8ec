//! Submission guard: is a form worth submitting?

use crate::error::{Error, Result};
use crate::types::{
    FIELD_CLEAN_ID, FIELD_CLEAN_NAME, FIELD_LIKED_NAME, FIELD_NAME, FIELD_PLAYLIST, FieldKind,
    FormDescriptor, FormKind,
};
use tracing::warn;

/// Whether the form must not be submitted empty (merge and clean forms)
pub fn needs_confirmation_guard(form: &FormDescriptor) -> bool {
    matches!(form.kind(), FormKind::Merge | FormKind::Clean)
}

/// Whether the form has enough input to be worth submitting
///
/// Fails open: if the fields cannot be inspected the submission is allowed.
pub fn has_work_to_do(form: &FormDescriptor) -> bool {
    inspect(form).unwrap_or_else(|e| {
        warn!("guard could not inspect {}: {e}; allowing submission", form.action);
        true
    })
}

fn inspect(form: &FormDescriptor) -> Result<bool> {
    match form.kind() {
        FormKind::Merge => {
            let any_checked = form
                .fields
                .iter()
                .any(|f| f.name == FIELD_PLAYLIST && f.kind == FieldKind::Checkbox { checked: true });
            Ok(any_checked || text_value(form, FIELD_NAME)?.is_some())
        }
        FormKind::Clean => Ok(text_value(form, FIELD_CLEAN_ID)?.is_some()
            || text_value(form, FIELD_CLEAN_NAME)?.is_some()),
        FormKind::UpdateLiked => Ok(text_value(form, FIELD_LIKED_NAME)?.is_some()),
        FormKind::Generic => Ok(form.fields.iter().any(|f| {
            if f.is_toggle() {
                f.is_checked()
            } else {
                f.kind != FieldKind::Submit && !f.name.is_empty() && f.non_blank().is_some()
            }
        })),
    }
}

/// Non-blank value of a value-carrying field
fn text_value<'a>(form: &'a FormDescriptor, name: &str) -> Result<Option<&'a str>> {
    match form.field(name) {
        None => Ok(None),
        Some(f) if f.is_toggle() || f.kind == FieldKind::Submit => Err(Error::MalformedForm(
            format!("field `{name}` is {:?}, expected a value input", f.kind),
        )),
        Some(f) => Ok(f.non_blank()),
    }
}
