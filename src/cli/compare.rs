//! Compare command - fetch a library comparison with another user

use crate::cli::Console;
use crate::cli::style::{Stylize, check};
use crate::cli::terminal::DialoguerPrompt;
use anstream::println;
use playlist_ajax::backend::{Backend, HttpBackend};
use playlist_ajax::error::Result;
use playlist_ajax::listing::PlaylistIndex;
use playlist_ajax::settings::Settings;
use playlist_ajax::submit::{CompareButton, CompareOutcome, SubmissionController};
use playlist_ajax::types::ControlId;
use std::sync::Arc;

/// Control the compare spinner is drawn for
const COMPARE_CONTROL: &str = "compare";

/// Run the compare command
///
/// Returns whether a result URL was obtained.
pub async fn run_compare(settings: &Settings, user: &str) -> Result<bool> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(settings)?);
    let console = Console::new(settings.timings.toast_exit);
    let controller = SubmissionController::new(
        backend,
        Arc::clone(&console.notifier),
        console.controls.clone(),
        Arc::new(DialoguerPrompt),
        PlaylistIndex::default(),
        settings.timings.clone(),
    );

    let mut button = CompareButton::new(ControlId::new(COMPARE_CONTROL));
    let outcome = controller.compare(&mut button, user).await;
    console.finish();

    match outcome {
        CompareOutcome::Ready(url) | CompareOutcome::Open(url) => {
            let url = settings.server.join(&url).map_or(url, |u| u.to_string());
            println!("{} {}: {}", check(), button.label().emphasis(), url.accent());
            Ok(true)
        }
        CompareOutcome::MissingUser | CompareOutcome::Failed(_) => Ok(false),
    }
}
