//! UI seams for interface-agnostic feedback
//!
//! The controller never touches a concrete UI. It talks to three traits:
//! - [`Notifier`] for transient status messages
//! - [`ControlSurface`] for busy state, the percent indicator and focus
//! - [`ConfirmPrompt`] for blocking overwrite confirmations
//!
//! A browser binding, a terminal, or a test recorder can implement them.

mod modal;
mod notify;
mod registry;

pub use modal::{FocusTarget, Key, ModalDialog};
pub use notify::{ToastId, ToastMount, Toaster};
pub use registry::{ControlRegistry, IndicatorMode, IndicatorToken};

use crate::error::Result;
use crate::types::ControlId;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Default lifetime of a notification
pub const DEFAULT_NOTIFY_DURATION: Duration = Duration::from_millis(4000);

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information
    Info,
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

impl Severity {
    /// Severity encoded in a flash element's class list
    pub fn from_class(class: &str) -> Self {
        if class.contains("success") {
            Self::Success
        } else if class.contains("error") {
            Self::Error
        } else {
            Self::Info
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Emits transient status messages
pub trait Notifier: Send + Sync {
    /// Show a message that dismisses itself after `duration`
    fn notify(&self, message: &str, severity: Severity, duration: Duration);
}

/// Visual state of trigger controls
///
/// Calls are already de-duplicated by [`ControlRegistry`]; implementations
/// only render.
pub trait ControlSurface: Send + Sync {
    /// Disable the control and show a spinner, or restore it
    fn set_busy(&self, control: &ControlId, busy: bool);

    /// Show (or update) the percent indicator next to the control
    fn show_percent(&self, control: &ControlId, percent: u8);

    /// Remove the percent indicator next to the control
    fn remove_percent(&self, control: &ControlId);

    /// Control that currently has keyboard focus
    fn focused(&self) -> Option<ControlId> {
        None
    }

    /// Move keyboard focus to a control
    fn focus(&self, _control: &ControlId) {}
}

/// User's answer to an overwrite confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead and overwrite
    Proceed,
    /// Abort the submission
    Cancel,
}

/// How a confirmation is presented
#[derive(Debug, Clone)]
pub enum ConfirmRequest {
    /// Keyboard-navigable modal dialog (clean forms)
    Modal(ModalDialog),
    /// Single blocking yes/no prompt
    Inline {
        /// Question shown to the user
        message: String,
    },
}

impl ConfirmRequest {
    /// Question shown to the user
    pub fn message(&self) -> &str {
        match self {
            Self::Modal(dialog) => dialog.message(),
            Self::Inline { message } => message,
        }
    }
}

/// Surfaces a blocking overwrite choice to the user
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Ask the user and wait for the answer
    async fn confirm(&self, request: ConfirmRequest) -> Result<Decision>;
}

/// Notifier that drops every message
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str, _severity: Severity, _duration: Duration) {}
}
