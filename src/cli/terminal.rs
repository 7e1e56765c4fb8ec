//! Terminal bindings for the UI seams
//!
//! - [`TerminalToasts`] prints notifications as styled lines
//! - [`TerminalControls`] shows one spinner per busy control, with the percent
//! - [`DialoguerPrompt`] asks overwrite questions with `dialoguer`

use crate::cli::style::{spinner_style, toast_line, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use dialoguer::{Confirm, Select};
use indicatif::{MultiProgress, ProgressBar};
use playlist_ajax::error::{Error, Result};
use playlist_ajax::types::ControlId;
use playlist_ajax::ui::{
    ConfirmPrompt, ConfirmRequest, ControlSurface, Decision, Key, ModalDialog, Severity, ToastId,
    ToastMount,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Prints toasts when they become visible
///
/// A terminal line cannot be taken back, so the exit transition and unmount
/// only drop the bookkeeping.
pub struct TerminalToasts {
    multi: MultiProgress,
    pending: Mutex<HashMap<ToastId, (String, Severity)>>,
}

impl TerminalToasts {
    /// Toasts printed above the spinners of `multi`
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl ToastMount for TerminalToasts {
    fn mount(&self, id: ToastId, message: &str, severity: Severity) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, (message.to_string(), severity));
        }
    }

    fn set_visible(&self, id: ToastId, visible: bool) {
        if !visible {
            return;
        }
        let Some((message, severity)) = self
            .pending
            .lock()
            .ok()
            .and_then(|pending| pending.get(&id).cloned())
        else {
            return;
        };
        let line = toast_line(&message, severity);
        self.multi.suspend(|| {
            if severity == Severity::Error {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });
    }

    fn unmount(&self, id: ToastId) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&id);
        }
    }
}

/// Spinners for busy controls
pub struct TerminalControls {
    multi: MultiProgress,
    bars: Mutex<HashMap<ControlId, ProgressBar>>,
    focused: Mutex<Option<ControlId>>,
}

impl TerminalControls {
    /// Controls drawn into `multi`
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
            focused: Mutex::new(None),
        }
    }

    fn with_bar(&self, control: &ControlId, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let bar = bars.entry(control.clone()).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new_spinner());
            bar.set_style(spinner_style());
            bar.set_message(control.to_string());
            bar.enable_steady_tick(SPINNER_TICK);
            bar
        });
        f(bar);
    }
}

impl ControlSurface for TerminalControls {
    fn set_busy(&self, control: &ControlId, busy: bool) {
        if busy {
            self.with_bar(control, |_| {});
            return;
        }
        let removed = self.bars.lock().ok().and_then(|mut bars| bars.remove(control));
        if let Some(bar) = removed {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    fn show_percent(&self, control: &ControlId, percent: u8) {
        self.with_bar(control, |bar| {
            bar.set_message(format!("{} {}", control, format!("{percent}%").accent()));
        });
    }

    fn remove_percent(&self, control: &ControlId) {
        let Ok(bars) = self.bars.lock() else {
            return;
        };
        if let Some(bar) = bars.get(control) {
            bar.set_message(control.to_string());
        }
    }

    fn focused(&self) -> Option<ControlId> {
        self.focused.lock().ok().and_then(|f| f.clone())
    }

    fn focus(&self, control: &ControlId) {
        debug!("focus returns to {control}");
        if let Ok(mut focused) = self.focused.lock() {
            *focused = Some(control.clone());
        }
    }
}

/// Overwrite confirmations on the terminal
pub struct DialoguerPrompt;

impl DialoguerPrompt {
    fn ask_inline(message: &str) -> Result<Decision> {
        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        Ok(if answer == Some(true) {
            Decision::Proceed
        } else {
            Decision::Cancel
        })
    }

    fn ask_modal(mut dialog: ModalDialog) -> Result<Decision> {
        let labels: Vec<&str> = dialog.focusables().iter().map(|f| f.label.as_str()).collect();
        let choice = Select::new()
            .with_prompt(dialog.message().emphasis().to_string())
            .items(&labels)
            .default(dialog.focus_index())
            .interact_opt()
            .map_err(|e| Error::Prompt(e.to_string()))?;
        let decision = match choice {
            Some(index) => dialog.activate(index),
            None => dialog.handle_key(Key::Escape),
        };
        Ok(decision.unwrap_or(Decision::Cancel))
    }
}

#[async_trait]
impl ConfirmPrompt for DialoguerPrompt {
    async fn confirm(&self, request: ConfirmRequest) -> Result<Decision> {
        tokio::task::spawn_blocking(move || match request {
            ConfirmRequest::Inline { message } => Self::ask_inline(&message),
            ConfirmRequest::Modal(dialog) => Self::ask_modal(dialog),
        })
        .await
        .map_err(|e| Error::Prompt(e.to_string()))?
    }
}
