//! Form submission engine
//!
//! Handles one form submission from click to final notification:
//! 1. Guard - refuse merge/clean forms with nothing selected
//! 2. Confirmation - ask before overwriting an existing playlist
//! 3. Submission - background request with busy controls
//! 4. Progress - simulated ramp, then authoritative job polling
//!
//! Also hosts the compare button flow and page-load flash announcements.

mod compare;
mod confirm;
mod controller;
mod guard;
mod progress;
mod response;

pub use compare::{
    COMPARE_FAILED, COMPARE_LABEL, COMPARISON_READY, CompareButton, CompareOutcome, ENTER_USER,
    NETWORK_ERROR, VIEW_RESULT, interpret_compare,
};
pub use confirm::{
    CANCELED, CLEANED_PREFIX, ConfirmationGate, OverwriteTarget, destination_name,
    overwrite_target,
};
pub use controller::{JobTracker, Outcome, PLEASE_SELECT, SubmissionController};
pub use guard::{has_work_to_do, needs_confirmation_guard};
pub use progress::{
    CLEAN_FAILED, CLEAN_FINISHED, PROGRESS_CHECK_FAILED, PROGRESS_ERROR, ProgressTracker,
    RampPlan, Resolution, percent_for, start_simulated,
};
pub use response::{
    DONE, Interpretation, REQUEST_FAILED, announce_flashes, interpret, page_flashes,
};
