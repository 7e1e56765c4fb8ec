//! Progress tracking for in-flight submissions
//!
//! Two sources drive the percent indicator:
//! - a simulated ramp while the request is in flight, creeping toward a soft
//!   cap at a speed derived from the estimated amount of work
//! - authoritative polling once the server hands back a job handle
//!
//! The ramp is aborted the moment polling takes over.

use crate::backend::Backend;
use crate::error::{Error, FailureKind};
use crate::settings::Timings;
use crate::types::{ControlId, JobHandle, JobStatus, ProgressSnapshot};
use crate::ui::{ControlRegistry, IndicatorToken, Notifier, Severity};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, interval_at, sleep};
use tracing::{debug, warn};

/// Shown when a clean finishes without a server message
pub const CLEAN_FINISHED: &str = "Clean finished";
/// Shown when a clean fails without a server message
pub const CLEAN_FAILED: &str = "Clean failed";
/// Shown when the progress endpoint answers `ok: false` without detail
pub const PROGRESS_ERROR: &str = "Progress error";
/// Shown when the progress endpoint cannot be reached
pub const PROGRESS_CHECK_FAILED: &str = "Progress check failed";

/// Server text, unless it is blank
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// Minimum number of simulated ticks
const MIN_RAMP_STEPS: u32 = 3;

/// Shape of a simulated ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampPlan {
    /// Time between ticks
    pub step: Duration,
    /// Number of ticks to reach the cap
    pub steps: u32,
    /// Percentage added per tick
    pub delta: f64,
    /// Soft cap
    pub cap: f64,
}

impl RampPlan {
    /// Plan a ramp for `total` estimated items of work
    pub fn for_total(total: u64, timings: &Timings) -> Self {
        let estimate = timings
            .ramp_per_item
            .saturating_mul(u32::try_from(total).unwrap_or(u32::MAX));
        let duration = estimate.clamp(timings.ramp_min, timings.ramp_max);
        let step_ms = timings.ramp_step.as_millis().max(1);
        let steps = u32::try_from(duration.as_millis() / step_ms)
            .unwrap_or(u32::MAX)
            .max(MIN_RAMP_STEPS);
        Self {
            step: timings.ramp_step,
            steps,
            delta: timings.ramp_cap / f64::from(steps),
            cap: timings.ramp_cap,
        }
    }
}

/// Start the simulated ramp for an indicator
///
/// The ramp task is registered with the registry, which aborts it when the
/// indicator switches to authoritative mode, completes, or is replaced.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn start_simulated(registry: &Arc<ControlRegistry>, token: &IndicatorToken, plan: RampPlan) {
    let task_registry = Arc::clone(registry);
    let task_token = token.clone();
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + plan.step, plan.step);
        let mut current = 0.0_f64;
        loop {
            ticker.tick().await;
            current = (current + plan.delta).min(plan.cap);
            if !task_registry.apply_simulated(&task_token, current.floor() as u8) {
                break;
            }
            if current >= plan.cap {
                break;
            }
        }
    });
    registry.attach_ramp(token, task.abort_handle());
}

/// Percentage to display for a snapshot; `None` leaves the indicator as is
pub fn percent_for(snapshot: &ProgressSnapshot) -> Option<u8> {
    if snapshot.total > 0 {
        let pct = snapshot.processed.saturating_mul(100) / snapshot.total;
        return Some(u8::try_from(pct.min(100)).unwrap_or(100));
    }
    match snapshot.status {
        JobStatus::Running => Some(50),
        JobStatus::Done => Some(100),
        JobStatus::Error | JobStatus::Unknown => None,
    }
}

/// Terminal, user-visible result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Notification text
    pub message: String,
    /// Notification severity
    pub severity: Severity,
    /// Why it failed, if it did
    pub failure: Option<FailureKind>,
}

impl Resolution {
    /// Successful resolution
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            failure: None,
        }
    }

    /// Failed resolution
    pub fn failed(message: impl Into<String>, failure: FailureKind) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            failure: Some(failure),
        }
    }

    /// Whether the operation failed
    pub const fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// How a polling loop ended, before notification
enum PollEnd {
    Done(ProgressSnapshot),
    Failed(ProgressSnapshot),
    Rejected(ProgressSnapshot),
    Unreachable,
}

/// Polls a job to completion and reflects it on the indicator
#[derive(Clone)]
pub struct ProgressTracker {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<ControlRegistry>,
    timings: Timings,
}

impl ProgressTracker {
    /// Create a tracker
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        registry: Arc<ControlRegistry>,
        timings: Timings,
    ) -> Self {
        Self {
            backend,
            notifier,
            registry,
            timings,
        }
    }

    /// Registry holding the indicators this tracker drives
    pub const fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    /// Begin an indicator on `control` with a simulated ramp for `total` items
    pub fn begin_simulated(&self, control: &ControlId, total: u64) -> IndicatorToken {
        let token = self.registry.begin_indicator(control);
        start_simulated(
            &self.registry,
            &token,
            RampPlan::for_total(total, &self.timings),
        );
        token
    }

    /// Poll `job` until it reaches a terminal state
    ///
    /// Takes over `indicator` (if any), notifies the outcome and restores
    /// `controls`. One call per job handle; polls are strictly sequential.
    pub async fn track(
        &self,
        job: JobHandle,
        indicator: Option<IndicatorToken>,
        controls: &[ControlId],
    ) -> Resolution {
        if let Some(token) = &indicator {
            self.registry.switch_to_authoritative(token);
        }

        let end = self.poll_until_terminal(&job, indicator.as_ref()).await;

        let (resolution, duration) = match end {
            PollEnd::Done(snap) => {
                if let Some(token) = &indicator {
                    self.registry
                        .finish_indicator(token, self.timings.removal_grace);
                }
                let message =
                    non_empty(snap.message).unwrap_or_else(|| CLEAN_FINISHED.to_string());
                (Resolution::success(message), 4000)
            }
            PollEnd::Failed(snap) => {
                let message = non_empty(snap.message)
                    .or_else(|| non_empty(snap.error))
                    .unwrap_or_else(|| CLEAN_FAILED.to_string());
                (
                    Resolution::failed(message, FailureKind::ServerReportedError),
                    5000,
                )
            }
            PollEnd::Rejected(snap) => {
                let message =
                    non_empty(snap.error).unwrap_or_else(|| PROGRESS_ERROR.to_string());
                (
                    Resolution::failed(message, FailureKind::ServerReportedError),
                    3000,
                )
            }
            PollEnd::Unreachable => (
                Resolution::failed(PROGRESS_CHECK_FAILED, FailureKind::TransportFailure),
                3000,
            ),
        };

        if resolution.is_failure() {
            if let Some(token) = &indicator {
                self.registry.remove_indicator(token);
            }
        }
        self.notifier.notify(
            &resolution.message,
            resolution.severity,
            Duration::from_millis(duration),
        );
        for control in controls {
            self.registry.clear_busy(Some(control));
        }
        resolution
    }

    async fn poll_until_terminal(
        &self,
        job: &JobHandle,
        indicator: Option<&IndicatorToken>,
    ) -> PollEnd {
        let mut delay = self.timings.poll_initial;
        let mut transport_failures = 0_u32;

        loop {
            sleep(delay).await;
            let snap = match self.backend.fetch_progress(job).await {
                Ok(snap) => snap,
                Err(Error::HttpStatus(code)) => {
                    warn!("progress check for {} returned HTTP {code}", job.task_id);
                    return PollEnd::Unreachable;
                }
                Err(e) => {
                    transport_failures += 1;
                    warn!("progress poll for {} failed: {e}", job.task_id);
                    // one retry, then give up rather than loop on a dead connection
                    if transport_failures >= 2 {
                        return PollEnd::Unreachable;
                    }
                    delay = self.timings.poll_retry;
                    continue;
                }
            };
            transport_failures = 0;

            if !snap.ok {
                return PollEnd::Rejected(snap);
            }
            if let (Some(token), Some(pct)) = (indicator, percent_for(&snap)) {
                self.registry.apply_authoritative(token, pct);
            }
            debug!(
                "job {}: {:?} {}/{}",
                job.task_id, snap.status, snap.processed, snap.total
            );
            match snap.status {
                JobStatus::Done => return PollEnd::Done(snap),
                JobStatus::Error => return PollEnd::Failed(snap),
                JobStatus::Running | JobStatus::Unknown => delay = self.timings.poll_interval,
            }
        }
    }
}
