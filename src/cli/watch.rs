//! Watch command - poll an existing job until it ends

use crate::cli::style::Stylize;
use crate::cli::Console;
use anstream::println;
use playlist_ajax::backend::{Backend, HttpBackend};
use playlist_ajax::error::Result;
use playlist_ajax::settings::Settings;
use playlist_ajax::submit::ProgressTracker;
use playlist_ajax::types::{ControlId, JobHandle};
use playlist_ajax::ui::ControlRegistry;
use std::sync::Arc;

/// Control the watched job's spinner is drawn for
const WATCH_CONTROL: &str = "job";

/// Run the watch command
///
/// Returns whether the job finished successfully.
pub async fn run_watch(settings: &Settings, task_id: &str) -> Result<bool> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(settings)?);
    let console = Console::new(settings.timings.toast_exit);
    let registry = Arc::new(ControlRegistry::new(console.controls.clone()));
    let tracker = ProgressTracker::new(
        backend,
        Arc::clone(&console.notifier),
        Arc::clone(&registry),
        settings.timings.clone(),
    );

    let control = ControlId::new(WATCH_CONTROL);
    registry.set_busy(Some(&control));
    let token = registry.begin_indicator(&control);
    registry.switch_to_authoritative(&token);

    println!("Watching job {}", task_id.accent());
    let resolution = tracker
        .track(JobHandle::new(task_id), Some(token), &[control])
        .await;
    console.finish();
    Ok(!resolution.is_failure())
}
