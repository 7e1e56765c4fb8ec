//! plajax - background playlist form submissions from the terminal
//!
//! CLI binary driving the playlist-ajax submission controller.

use anyhow::Result;
use clap::{Parser, Subcommand};
use playlist_ajax::settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "plajax")]
#[command(about = "Submit playlist forms in the background and follow their jobs")]
#[command(version)]
struct Cli {
    /// Playlist server base URL (defaults to $PLAJAX_SERVER)
    #[arg(short, long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a form
    Submit(cli::SubmitArgs),

    /// Poll a background job until it finishes
    Watch {
        /// Job id returned by the server
        task_id: String,
    },

    /// Compare your library with another user's
    Compare {
        /// User id or profile URL to compare with
        user: String,
    },

    /// Show the flash messages of a saved page
    Flashes {
        /// HTML file of the page
        page: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.server.as_deref())?;

    let ok = match cli.command {
        Commands::Submit(args) => cli::run_submit(&settings, &args).await?,
        Commands::Watch { task_id } => cli::run_watch(&settings, &task_id).await?,
        Commands::Compare { user } => cli::run_compare(&settings, &user).await?,
        Commands::Flashes { page } => cli::run_flashes(&settings, &page)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
