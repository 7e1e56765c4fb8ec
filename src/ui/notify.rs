//! Toast notifications with timed dismissal

use crate::ui::{Notifier, Severity};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Identifier of a mounted toast
pub type ToastId = u64;

/// Where toasts are rendered (the page's toast root)
pub trait ToastMount: Send + Sync {
    /// Append a new toast, initially hidden
    fn mount(&self, id: ToastId, message: &str, severity: Severity);

    /// Start the entrance (`true`) or exit (`false`) transition
    fn set_visible(&self, id: ToastId, visible: bool);

    /// Remove the toast
    fn unmount(&self, id: ToastId);
}

/// [`Notifier`] that mounts toasts and dismisses them on a timer
///
/// Lifecycle of a toast: mount → visible → (duration) → hidden →
/// (exit transition) → unmounted. Without a mount point every call is a
/// silent no-op.
pub struct Toaster {
    mount: Option<Arc<dyn ToastMount>>,
    exit: Duration,
    next_id: AtomicU64,
}

impl Toaster {
    /// Create a toaster; `exit` is the length of the exit transition
    pub fn new(mount: Option<Arc<dyn ToastMount>>, exit: Duration) -> Self {
        Self {
            mount,
            exit,
            next_id: AtomicU64::new(1),
        }
    }
}

impl Notifier for Toaster {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        let Some(mount) = &self.mount else {
            return;
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        mount.mount(id, message, severity);
        mount.set_visible(id, true);

        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime for toast {id}; it will not auto-dismiss");
            return;
        };
        let mount = Arc::clone(mount);
        let exit = self.exit;
        runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            mount.set_visible(id, false);
            tokio::time::sleep(exit).await;
            mount.unmount(id);
        });
    }
}
