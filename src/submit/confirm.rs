//! Confirmation gate for submissions that would overwrite a playlist

use crate::listing::PlaylistIndex;
use crate::types::{
    FIELD_CLEAN_ID, FIELD_CLEAN_NAME, FIELD_LIKED_NAME, FIELD_NAME, FIELD_OVERWRITE,
    FIELD_QUEUE_NAME, FormDescriptor, FormKind,
};
use crate::ui::{ConfirmPrompt, ConfirmRequest, ControlSurface, Decision, ModalDialog, Notifier, Severity};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Fields that may carry the target playlist name, in priority order
const NAME_CANDIDATES: [&str; 4] = [FIELD_NAME, FIELD_QUEUE_NAME, FIELD_CLEAN_NAME, FIELD_LIKED_NAME];

/// Prefix the server gives cleaned copies of a playlist
pub const CLEANED_PREFIX: &str = "Cleaned: ";

/// Notification shown when the user declines
pub const CANCELED: &str = "Canceled";

/// Playlist that a submission would overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteTarget {
    /// Destination playlist name
    pub name: String,
    /// Tracks already in it
    pub existing_count: u64,
}

/// Destination name for a form, before any existence check
///
/// For clean forms this is the cleaned copy's name, built from the listing
/// name of the selected playlist when known, else from the typed name.
pub fn destination_name(form: &FormDescriptor, index: &PlaylistIndex) -> Option<String> {
    let typed = NAME_CANDIDATES.iter().find_map(|n| form.value(n))?;
    if form.kind() != FormKind::Clean {
        return Some(typed.to_string());
    }
    let original = form
        .value(FIELD_CLEAN_ID)
        .and_then(|id| index.by_id(id))
        .map_or_else(
            || form.value(FIELD_CLEAN_NAME).unwrap_or(typed).to_string(),
            |entry| entry.name.clone(),
        );
    Some(format!("{CLEANED_PREFIX}{original}"))
}

/// Existing playlist this form would overwrite, if any
pub fn overwrite_target(form: &FormDescriptor, index: &PlaylistIndex) -> Option<OverwriteTarget> {
    let name = destination_name(form, index)?;
    let existing_count = index.existing_count(&name);
    (existing_count > 0).then_some(OverwriteTarget {
        name,
        existing_count,
    })
}

/// Asks the user before overwriting an existing playlist
pub struct ConfirmationGate {
    prompt: Arc<dyn ConfirmPrompt>,
    notifier: Arc<dyn Notifier>,
    surface: Arc<dyn ControlSurface>,
}

impl ConfirmationGate {
    /// Create a gate
    pub fn new(
        prompt: Arc<dyn ConfirmPrompt>,
        notifier: Arc<dyn Notifier>,
        surface: Arc<dyn ControlSurface>,
    ) -> Self {
        Self {
            prompt,
            notifier,
            surface,
        }
    }

    /// Run the gate for a form; sets the overwrite flag on a confirmed clean
    pub async fn check(&self, form: &mut FormDescriptor, index: &PlaylistIndex) -> Decision {
        let Some(target) = overwrite_target(form, index) else {
            return Decision::Proceed;
        };
        let decision = self
            .confirm_overwrite(form, &target.name, target.existing_count)
            .await;
        if decision == Decision::Proceed && form.kind() == FormKind::Clean {
            form.set_value(FIELD_OVERWRITE, "1");
        }
        decision
    }

    /// Ask whether to overwrite `target_name`, which holds `existing_count` tracks
    ///
    /// A prompt that cannot be shown counts as Proceed.
    pub async fn confirm_overwrite(
        &self,
        form: &FormDescriptor,
        target_name: &str,
        existing_count: u64,
    ) -> Decision {
        let request = if form.kind() == FormKind::Clean {
            ConfirmRequest::Modal(ModalDialog::confirm(
                format!(
                    "A playlist named \"{target_name}\" already exists with {existing_count} tracks. Overwrite it?"
                ),
                self.surface.focused(),
            ))
        } else {
            ConfirmRequest::Inline {
                message: format!(
                    "Playlist \"{target_name}\" already exists with {existing_count} songs. Do you wish to override it?"
                ),
            }
        };
        let restore = match &request {
            ConfirmRequest::Modal(dialog) => dialog.restore_focus().cloned(),
            ConfirmRequest::Inline { .. } => None,
        };

        let decision = match self.prompt.confirm(request).await {
            Ok(d) => d,
            Err(e) => {
                warn!("overwrite confirmation failed: {e}; proceeding");
                Decision::Proceed
            }
        };
        debug!("overwrite of {target_name:?}: {decision:?}");

        if let Some(control) = restore {
            self.surface.focus(&control);
        }
        if decision == Decision::Cancel {
            self.notifier
                .notify(CANCELED, Severity::Info, Duration::from_millis(1500));
        }
        decision
    }
}
