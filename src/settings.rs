//! Controller configuration
//!
//! Server location comes from the command line or the environment; every
//! delay the controller uses lives in [`Timings`].

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Environment variable naming the playlist server
pub const SERVER_ENV: &str = "PLAJAX_SERVER";
/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "PLAJAX_TIMEOUT_SECS";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delays and caps used by the progress tracker and notifications
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    /// Interval between simulated ramp ticks
    pub ramp_step: Duration,
    /// Simulated ramp never goes past this percentage
    pub ramp_cap: f64,
    /// Shortest simulated ramp
    pub ramp_min: Duration,
    /// Longest simulated ramp
    pub ramp_max: Duration,
    /// Estimated time per item of work
    pub ramp_per_item: Duration,
    /// Delay before the first progress poll
    pub poll_initial: Duration,
    /// Delay between polls while the job is running
    pub poll_interval: Duration,
    /// Delay before retrying after a transport failure
    pub poll_retry: Duration,
    /// How long a finished indicator stays at 100% before removal
    pub removal_grace: Duration,
    /// Exit transition of a toast before it is unmounted
    pub toast_exit: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            ramp_step: Duration::from_millis(200),
            ramp_cap: 95.0,
            ramp_min: Duration::from_millis(1500),
            ramp_max: Duration::from_millis(30_000),
            ramp_per_item: Duration::from_millis(60),
            poll_initial: Duration::from_millis(500),
            poll_interval: Duration::from_millis(900),
            poll_retry: Duration::from_millis(1500),
            removal_grace: Duration::from_millis(700),
            toast_exit: Duration::from_millis(300),
        }
    }
}

/// Where and how to talk to the playlist server
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL that form actions and the progress endpoint resolve against
    pub server: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Controller delays
    pub timings: Timings,
}

impl Settings {
    /// Settings for a server with default timings
    pub fn new(server: Url) -> Self {
        Self {
            server,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            timings: Timings::default(),
        }
    }

    /// Resolve settings
    ///
    /// Priority for the server:
    /// 1. explicit value (the `--server` flag)
    /// 2. `PLAJAX_SERVER` environment variable
    pub fn resolve(server: Option<&str>) -> Result<Self> {
        let raw = match server {
            Some(s) => s.to_string(),
            None => env::var(SERVER_ENV).map_err(|_| {
                Error::Config(format!(
                    "no server configured. Pass --server or set {SERVER_ENV}"
                ))
            })?,
        };
        let server = Url::parse(raw.trim())?;
        if !matches!(server.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "server must be an http(s) URL, got {server}"
            )));
        }

        let mut settings = Self::new(server);
        if let Ok(secs) = env::var(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{TIMEOUT_ENV} must be a number of seconds")))?;
            settings.request_timeout = Duration::from_secs(secs);
        }
        Ok(settings)
    }
}
