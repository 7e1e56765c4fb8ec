//! Recording UI doubles for testing

#![allow(dead_code)]

use async_trait::async_trait;
use playlist_ajax::error::{Error, Result};
use playlist_ajax::types::ControlId;
use playlist_ajax::ui::{ConfirmPrompt, ConfirmRequest, ControlSurface, Decision, Notifier, Severity};
use std::sync::Mutex;
use std::time::Duration;

/// A notification as it was emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

/// Notifier that records every message
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        self.notices.lock().unwrap().push(Notice {
            message: message.to_string(),
            severity,
            duration,
        });
    }
}

/// Something the controller did to a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Busy(ControlId, bool),
    Percent(ControlId, u8),
    RemovePercent(ControlId),
    Focus(ControlId),
}

/// Control surface that records every render call
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    focused: Mutex<Option<ControlId>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Pretend `control` has keyboard focus
    pub fn set_focused(&self, control: &ControlId) {
        *self.focused.lock().unwrap() = Some(control.clone());
    }

    /// Every percentage shown on `control`, in order
    pub fn percents(&self, control: &ControlId) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Percent(c, p) if &c == control => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Last busy state rendered for `control`
    pub fn busy(&self, control: &ControlId) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            SurfaceEvent::Busy(c, b) if &c == control => Some(b),
            _ => None,
        })
    }

    /// Whether an indicator is currently drawn on `control`
    pub fn has_indicator(&self, control: &ControlId) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                SurfaceEvent::Percent(c, _) if &c == control => Some(true),
                SurfaceEvent::RemovePercent(c) if &c == control => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl ControlSurface for RecordingSurface {
    fn set_busy(&self, control: &ControlId, busy: bool) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Busy(control.clone(), busy));
    }

    fn show_percent(&self, control: &ControlId, percent: u8) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Percent(control.clone(), percent));
    }

    fn remove_percent(&self, control: &ControlId) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::RemovePercent(control.clone()));
    }

    fn focused(&self) -> Option<ControlId> {
        self.focused.lock().unwrap().clone()
    }

    fn focus(&self, control: &ControlId) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Focus(control.clone()));
        *self.focused.lock().unwrap() = Some(control.clone());
    }
}

/// Scripted answer of [`ScriptedPrompt`]
#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Proceed,
    Cancel,
    Broken,
}

/// Prompt that answers from a script and records the requests
pub struct ScriptedPrompt {
    answer: Mutex<Answer>,
    requests: Mutex<Vec<ConfirmRequest>>,
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self::answering(Answer::Proceed)
    }
}

impl ScriptedPrompt {
    pub fn answering(answer: Answer) -> Self {
        Self {
            answer: Mutex::new(answer),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: Answer) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn requests(&self) -> Vec<ConfirmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmPrompt for ScriptedPrompt {
    async fn confirm(&self, request: ConfirmRequest) -> Result<Decision> {
        self.requests.lock().unwrap().push(request);
        match *self.answer.lock().unwrap() {
            Answer::Proceed => Ok(Decision::Proceed),
            Answer::Cancel => Ok(Decision::Cancel),
            Answer::Broken => Err(Error::Prompt("no terminal".into())),
        }
    }
}
