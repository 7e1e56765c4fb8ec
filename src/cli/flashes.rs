//! Flashes command - show the flash messages rendered into a saved page

use crate::cli::Console;
use crate::cli::style::Stylize;
use anstream::println;
use playlist_ajax::error::Result;
use playlist_ajax::settings::Settings;
use playlist_ajax::submit::{announce_flashes, page_flashes};
use playlist_ajax::ui::Severity;
use std::path::Path;

/// Run the flashes command
///
/// Returns whether the page carried no error flash.
pub fn run_flashes(settings: &Settings, page: &Path) -> Result<bool> {
    let html = std::fs::read_to_string(page)?;
    let console = Console::new(settings.timings.toast_exit);
    let shown = announce_flashes(console.notifier.as_ref(), &html);
    console.finish();

    if shown == 0 {
        println!("{}", "No flash messages".muted());
    }
    let has_error = page_flashes(&html)
        .iter()
        .any(|(_, severity)| *severity == Severity::Error);
    Ok(!has_error)
}
