//! CLI commands
//!
//! Command implementations for the `plajax` binary.

mod compare;
mod flashes;
mod style;
mod submit;
mod terminal;
mod watch;

pub use compare::run_compare;
pub use flashes::run_flashes;
pub use submit::{run_submit, SubmitArgs};
pub use watch::run_watch;

use indicatif::MultiProgress;
use playlist_ajax::ui::{Notifier, ToastMount, Toaster};
use std::sync::Arc;
use std::time::Duration;
use terminal::{TerminalControls, TerminalToasts};
use tracing::debug;

/// Terminal-bound notifier and control surface sharing one spinner area
struct Console {
    multi: MultiProgress,
    notifier: Arc<dyn Notifier>,
    controls: Arc<TerminalControls>,
}

impl Console {
    fn new(toast_exit: Duration) -> Self {
        let multi = MultiProgress::new();
        let toasts: Arc<dyn ToastMount> = Arc::new(TerminalToasts::new(multi.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(Toaster::new(Some(toasts), toast_exit));
        let controls = Arc::new(TerminalControls::new(multi.clone()));
        Self {
            multi,
            notifier,
            controls,
        }
    }

    /// Drop any spinner still drawn
    fn finish(&self) {
        if let Err(e) = self.multi.clear() {
            debug!("could not clear progress area: {e}");
        }
    }
}
