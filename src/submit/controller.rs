//! Submission controller
//!
//! Runs one form submission end to end:
//! 1. Guard - refuse guarded forms with nothing selected
//! 2. Confirmation - ask before overwriting an existing playlist
//! 3. Submit - background request, busy controls, simulated progress
//! 4. Interpret - job handle, JSON message, flash HTML or bare status
//! 5. Resolve - notify, finish the indicator, restore the controls

use crate::backend::Backend;
use crate::error::FailureKind;
use crate::listing::PlaylistIndex;
use crate::settings::Timings;
use crate::submit::compare::{
    COMPARISON_READY, CompareButton, CompareOutcome, ENTER_USER, NETWORK_ERROR,
    interpret_compare,
};
use crate::submit::confirm::ConfirmationGate;
use crate::submit::guard::{has_work_to_do, needs_confirmation_guard};
use crate::submit::progress::{ProgressTracker, Resolution};
use crate::submit::response::{Interpretation, REQUEST_FAILED, interpret};
use crate::types::{ControlId, FormDescriptor, FormKind, JobHandle};
use crate::ui::{
    ConfirmPrompt, ControlRegistry, ControlSurface, Decision, IndicatorToken, Notifier, Severity,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shown when a guarded form is submitted empty
pub const PLEASE_SELECT: &str = "Please select a playlist";

/// How a call to [`SubmissionController::submit`] ended
#[derive(Debug)]
pub enum Outcome {
    /// Guard refused an empty submission; nothing was sent
    Blocked,
    /// User declined the overwrite; nothing was sent
    Canceled,
    /// Plain form passed the guard; controls are busy and the caller
    /// performs an ordinary navigation
    Native,
    /// Submission finished and was notified
    Resolved(Resolution),
    /// Server started a job; the result arrives through the tracker
    Tracking(JobTracker),
}

impl Outcome {
    /// Failure kind for outcomes that did not succeed
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Blocked => Some(FailureKind::ValidationBlocked),
            Self::Canceled => Some(FailureKind::UserCanceled),
            Self::Resolved(r) => r.failure,
            Self::Native | Self::Tracking(_) => None,
        }
    }
}

/// Background polling of one job
#[derive(Debug)]
pub struct JobTracker {
    job: JobHandle,
    task: JoinHandle<Resolution>,
}

impl JobTracker {
    /// Job being polled
    pub const fn job(&self) -> &JobHandle {
        &self.job
    }

    /// Wait for the job's terminal resolution
    pub async fn wait(self) -> Resolution {
        match self.task.await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("tracking task for {} ended abnormally: {e}", self.job.task_id);
                Resolution::failed(REQUEST_FAILED, FailureKind::TransportFailure)
            }
        }
    }
}

/// Orchestrates guard, confirmation, submission, progress and cleanup
pub struct SubmissionController {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<ControlRegistry>,
    gate: ConfirmationGate,
    tracker: ProgressTracker,
    index: PlaylistIndex,
    timings: Timings,
}

impl SubmissionController {
    /// Create a controller
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        surface: Arc<dyn ControlSurface>,
        prompt: Arc<dyn ConfirmPrompt>,
        index: PlaylistIndex,
        timings: Timings,
    ) -> Self {
        let registry = Arc::new(ControlRegistry::new(Arc::clone(&surface)));
        let gate = ConfirmationGate::new(prompt, Arc::clone(&notifier), surface);
        let tracker = ProgressTracker::new(
            Arc::clone(&backend),
            Arc::clone(&notifier),
            Arc::clone(&registry),
            timings.clone(),
        );
        Self {
            backend,
            notifier,
            registry,
            gate,
            tracker,
            index,
            timings,
        }
    }

    /// Busy flags and indicators of all controls
    pub const fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    /// Tracker used for job polling
    pub const fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Listing lookups used for confirmation and estimates
    pub const fn index(&self) -> &PlaylistIndex {
        &self.index
    }

    /// Submit a form
    ///
    /// Never fails: every error path ends in a notification and restored
    /// controls. The form may gain an overwrite flag when the user confirms.
    pub async fn submit(&self, form: &mut FormDescriptor) -> Outcome {
        if needs_confirmation_guard(form) && !has_work_to_do(form) {
            self.notifier
                .notify(PLEASE_SELECT, Severity::Info, Duration::from_millis(1500));
            return Outcome::Blocked;
        }

        if !form.ajax {
            self.set_busy(form);
            return Outcome::Native;
        }

        if self.gate.check(form, &self.index).await == Decision::Cancel {
            return Outcome::Canceled;
        }

        self.set_busy(form);
        let indicator = self.begin_indicator(form);

        let interpretation = match self.backend.submit(form).await {
            Ok(response) => {
                debug!("{} answered HTTP {}", form.action, response.status);
                interpret(&response)
            }
            Err(e) => {
                warn!("submission to {} failed: {e}", form.action);
                let resolution = Resolution::failed(REQUEST_FAILED, FailureKind::TransportFailure);
                self.notifier
                    .notify(REQUEST_FAILED, Severity::Error, Duration::from_millis(4000));
                self.cleanup(form, indicator.as_ref());
                return Outcome::Resolved(resolution);
            }
        };

        match interpretation {
            Interpretation::Track(job) => {
                debug!("tracking job {}", job.task_id);
                if let Some(token) = &indicator {
                    self.registry.switch_to_authoritative(token);
                }
                let tracker = self.tracker.clone();
                let controls = form.controls.clone();
                let task_job = job.clone();
                let task =
                    tokio::spawn(async move { tracker.track(task_job, indicator, &controls).await });
                Outcome::Tracking(JobTracker { job, task })
            }
            Interpretation::Notify {
                message,
                severity,
                duration,
                failure,
            } => {
                self.notifier.notify(&message, severity, duration);
                self.cleanup(form, indicator.as_ref());
                Outcome::Resolved(Resolution {
                    message,
                    severity,
                    failure,
                })
            }
        }
    }

    /// Press a compare button for `user`
    ///
    /// A button that already holds a result hands back its URL without a
    /// request. Otherwise the button is busy while the comparison is
    /// fetched, and on success it keeps the result URL.
    pub async fn compare(&self, button: &mut CompareButton, user: &str) -> CompareOutcome {
        if let Some(url) = button.result_url() {
            return CompareOutcome::Open(url.to_string());
        }
        let user = user.trim();
        if user.is_empty() {
            self.notifier
                .notify(ENTER_USER, Severity::Info, Duration::from_millis(1800));
            return CompareOutcome::MissingUser;
        }

        let control = button.control().clone();
        self.registry.set_busy(Some(&control));
        let outcome = match self.backend.compare(user).await {
            Ok(response) => match interpret_compare(&response) {
                Ok(url) => {
                    button.mark_ready(url.clone());
                    self.notifier.notify(
                        COMPARISON_READY,
                        Severity::Success,
                        Duration::from_millis(2200),
                    );
                    CompareOutcome::Ready(url)
                }
                Err(resolution) => {
                    let millis = if resolution.failure == Some(FailureKind::TransportFailure) {
                        1800
                    } else {
                        2500
                    };
                    self.notifier.notify(
                        &resolution.message,
                        resolution.severity,
                        Duration::from_millis(millis),
                    );
                    CompareOutcome::Failed(resolution)
                }
            },
            Err(e) => {
                warn!("comparison with {user} failed: {e}");
                self.notifier
                    .notify(NETWORK_ERROR, Severity::Error, Duration::from_millis(1800));
                CompareOutcome::Failed(Resolution::failed(
                    NETWORK_ERROR,
                    FailureKind::TransportFailure,
                ))
            }
        };
        self.registry.clear_busy(Some(&control));
        outcome
    }

    fn set_busy(&self, form: &FormDescriptor) {
        for control in &form.controls {
            self.registry.set_busy(Some(control));
        }
    }

    /// Simulated indicator on the primary control, for clean forms only
    fn begin_indicator(&self, form: &FormDescriptor) -> Option<IndicatorToken> {
        if form.kind() != FormKind::Clean {
            return None;
        }
        let control: &ControlId = form.primary_control()?;
        let total = self.index.estimate_total(form);
        debug!("clean of ~{total} items; starting simulated progress");
        Some(self.tracker.begin_simulated(control, total))
    }

    /// Unconditional end-of-submission cleanup
    fn cleanup(&self, form: &FormDescriptor, indicator: Option<&IndicatorToken>) {
        if let Some(token) = indicator {
            self.registry
                .finish_indicator(token, self.timings.removal_grace);
        }
        for control in &form.controls {
            self.registry.clear_busy(Some(control));
        }
    }
}
