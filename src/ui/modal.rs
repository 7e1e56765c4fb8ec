//! Keyboard model of the overwrite confirmation dialog
//!
//! Escape cancels, Enter confirms, Tab and Shift-Tab cycle focus without
//! leaving the dialog. The control focused before the dialog opened is
//! remembered so it can get focus back on close.

use crate::types::ControlId;
use crate::ui::Decision;

/// Keys the dialog reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Cancel
    Escape,
    /// Confirm
    Enter,
    /// Next focusable
    Tab,
    /// Previous focusable (Shift-Tab)
    BackTab,
    /// Anything else
    Other,
}

/// A focusable element inside the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    /// Element id
    pub id: ControlId,
    /// Visible label
    pub label: String,
    /// What activating it decides, if anything
    pub action: Option<Decision>,
    /// Disabled or hidden elements never receive focus
    pub enabled: bool,
}

impl FocusTarget {
    /// Enabled button that decides the dialog
    pub fn button(id: &str, label: &str, action: Decision) -> Self {
        Self {
            id: ControlId::new(id),
            label: label.to_string(),
            action: Some(action),
            enabled: true,
        }
    }
}

/// Open modal confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalDialog {
    message: String,
    focusables: Vec<FocusTarget>,
    focus: usize,
    previously_focused: Option<ControlId>,
    decision: Option<Decision>,
}

impl ModalDialog {
    /// Standard OK / Cancel dialog with focus on OK
    pub fn confirm(message: impl Into<String>, previously_focused: Option<ControlId>) -> Self {
        Self::with_focusables(
            message,
            vec![
                FocusTarget::button("confirm-modal-ok", "OK", Decision::Proceed),
                FocusTarget::button("confirm-modal-cancel", "Cancel", Decision::Cancel),
            ],
            previously_focused,
        )
    }

    /// Dialog with custom focusables; disabled ones are dropped
    pub fn with_focusables(
        message: impl Into<String>,
        focusables: Vec<FocusTarget>,
        previously_focused: Option<ControlId>,
    ) -> Self {
        Self {
            message: message.into(),
            focusables: focusables.into_iter().filter(|f| f.enabled).collect(),
            focus: 0,
            previously_focused,
            decision: None,
        }
    }

    /// Question shown in the dialog
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Elements that can receive focus, in tab order
    pub fn focusables(&self) -> &[FocusTarget] {
        &self.focusables
    }

    /// Index of the focused element
    pub const fn focus_index(&self) -> usize {
        self.focus
    }

    /// Focused element
    pub fn focused(&self) -> Option<&FocusTarget> {
        self.focusables.get(self.focus)
    }

    /// Decision once the dialog is closed
    pub const fn decision(&self) -> Option<Decision> {
        self.decision
    }

    /// Control to give focus back to on close
    pub const fn restore_focus(&self) -> Option<&ControlId> {
        self.previously_focused.as_ref()
    }

    /// Handle a key press; returns the decision when the dialog closes
    pub fn handle_key(&mut self, key: Key) -> Option<Decision> {
        if self.decision.is_some() {
            return self.decision;
        }
        match key {
            Key::Escape => self.close(Decision::Cancel),
            Key::Enter => self.close(Decision::Proceed),
            Key::Tab => {
                if !self.focusables.is_empty() {
                    self.focus = (self.focus + 1) % self.focusables.len();
                }
                None
            }
            Key::BackTab => {
                if !self.focusables.is_empty() {
                    self.focus = self
                        .focus
                        .checked_sub(1)
                        .unwrap_or(self.focusables.len() - 1);
                }
                None
            }
            Key::Other => None,
        }
    }

    /// Click an element; returns the decision if it closes the dialog
    pub fn activate(&mut self, index: usize) -> Option<Decision> {
        if self.decision.is_some() {
            return self.decision;
        }
        let action = self.focusables.get(index)?.action?;
        self.focus = index;
        self.close(action)
    }

    const fn close(&mut self, decision: Decision) -> Option<Decision> {
        self.decision = Some(decision);
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cancels_enter_confirms() {
        let mut dialog = ModalDialog::confirm("Overwrite?", None);
        assert_eq!(dialog.handle_key(Key::Escape), Some(Decision::Cancel));

        let mut dialog = ModalDialog::confirm("Overwrite?", None);
        dialog.handle_key(Key::Tab);
        assert_eq!(dialog.handle_key(Key::Enter), Some(Decision::Proceed));
    }

    #[test]
    fn test_tab_wraps_within_dialog() {
        let mut dialog = ModalDialog::confirm("Overwrite?", None);
        assert_eq!(dialog.focused().unwrap().label, "OK");
        dialog.handle_key(Key::Tab);
        assert_eq!(dialog.focused().unwrap().label, "Cancel");
        dialog.handle_key(Key::Tab);
        assert_eq!(dialog.focused().unwrap().label, "OK");
        dialog.handle_key(Key::BackTab);
        assert_eq!(dialog.focused().unwrap().label, "Cancel");
        assert_eq!(dialog.decision(), None);
    }

    #[test]
    fn test_disabled_focusables_are_skipped() {
        let mut disabled = FocusTarget::button("help", "Help", Decision::Cancel);
        disabled.enabled = false;
        let dialog = ModalDialog::with_focusables(
            "Overwrite?",
            vec![
                FocusTarget::button("ok", "OK", Decision::Proceed),
                disabled,
            ],
            None,
        );
        assert_eq!(dialog.focusables().len(), 1);
    }

    #[test]
    fn test_activate_and_restore_focus() {
        let prev = ControlId::new("clean-submit");
        let mut dialog = ModalDialog::confirm("Overwrite?", Some(prev.clone()));
        assert_eq!(dialog.activate(1), Some(Decision::Cancel));
        assert_eq!(dialog.restore_focus(), Some(&prev));
        // closed dialogs keep their decision
        assert_eq!(dialog.handle_key(Key::Enter), Some(Decision::Cancel));
    }
}
