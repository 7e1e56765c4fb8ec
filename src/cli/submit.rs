//! Submit command - send one form through the submission controller

use crate::cli::style::Stylize;
use crate::cli::terminal::DialoguerPrompt;
use crate::cli::Console;
use anstream::println;
use clap::{Args, ValueEnum};
use playlist_ajax::backend::{Backend, HttpBackend};
use playlist_ajax::error::Result;
use playlist_ajax::listing::PlaylistIndex;
use playlist_ajax::settings::Settings;
use playlist_ajax::submit::{Outcome, SubmissionController};
use playlist_ajax::types::{ControlId, Field, FormDescriptor, HttpMethod};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Control id used when `--button` is not given
const DEFAULT_BUTTON: &str = "submit";

/// HTTP method of the form
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    /// Fields go in the query string
    Get,
    /// Fields go in an urlencoded body
    Post,
}

impl From<MethodArg> for HttpMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Get => Self::Get,
            MethodArg::Post => Self::Post,
        }
    }
}

/// Arguments describing the form to submit
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form action, resolved against the server (e.g. /clean)
    #[arg(long)]
    pub action: String,

    /// HTTP method
    #[arg(long, value_enum, default_value = "post")]
    pub method: MethodArg,

    /// Form class (e.g. merge, clean-panel); repeatable
    #[arg(long = "class")]
    pub classes: Vec<String>,

    /// Plain form: check it but do not send it in the background
    #[arg(long)]
    pub plain: bool,

    /// Text field as name=value; repeatable
    #[arg(short = 'f', long = "field", value_parser = parse_pair)]
    pub fields: Vec<(String, String)>,

    /// Checked checkbox as name=value; repeatable
    #[arg(long = "check", value_parser = parse_pair)]
    pub checks: Vec<(String, String)>,

    /// JSON playlist listing used for overwrite checks and estimates
    #[arg(long)]
    pub listing: Option<PathBuf>,

    /// Id of the submit control
    #[arg(long)]
    pub button: Option<String>,
}

impl SubmitArgs {
    /// Build the form descriptor
    pub fn to_form(&self) -> FormDescriptor {
        let mut form = FormDescriptor::new(&self.action).with_method(self.method.into());
        if self.plain {
            form = form.plain();
        }
        for class in &self.classes {
            form = form.with_class(class);
        }
        for (name, value) in &self.fields {
            form = form.with_field(Field::text(name, value));
        }
        for (name, value) in &self.checks {
            form = form.with_field(Field::checkbox(name, value, true));
        }
        form.with_control(ControlId::new(
            self.button.as_deref().unwrap_or(DEFAULT_BUTTON),
        ))
    }
}

/// Parse a `name=value` pair; the value may be empty or contain `=`
pub fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    if name.trim().is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

fn load_listing(path: Option<&Path>) -> Result<PlaylistIndex> {
    let Some(path) = path else {
        return Ok(PlaylistIndex::default());
    };
    let raw = std::fs::read_to_string(path)?;
    let index = PlaylistIndex::from_json(&raw);
    debug!("loaded {} playlists from {}", index.len(), path.display());
    Ok(index)
}

/// Run the submit command
///
/// Returns whether the submission succeeded.
pub async fn run_submit(settings: &Settings, args: &SubmitArgs) -> Result<bool> {
    let index = load_listing(args.listing.as_deref())?;
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(settings)?);
    let console = Console::new(settings.timings.toast_exit);

    let controller = SubmissionController::new(
        backend,
        Arc::clone(&console.notifier),
        console.controls.clone(),
        Arc::new(DialoguerPrompt),
        index,
        settings.timings.clone(),
    );

    let mut form = args.to_form();
    let outcome = controller.submit(&mut form).await;
    let failure = outcome.failure();

    match outcome {
        Outcome::Native => {
            println!(
                "{} passes the checks; plain forms are not sent in the background",
                form.action.accent()
            );
            for control in &form.controls {
                controller.registry().clear_busy(Some(control));
            }
        }
        Outcome::Tracking(tracker) => {
            println!("Tracking job {}", tracker.job().task_id.accent());
            let resolution = tracker.wait().await;
            console.finish();
            return Ok(!resolution.is_failure());
        }
        Outcome::Blocked | Outcome::Canceled | Outcome::Resolved(_) => {}
    }
    console.finish();

    if let Some(kind) = failure {
        debug!("submission ended with {kind:?}");
        return Ok(false);
    }
    Ok(true)
}
