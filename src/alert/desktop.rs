//! Desktop alert dispatcher backed by system notifications

use std::io::Write;
use std::time::Duration;

use notify_rust::Notification;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{AlertDispatcher, AlertError};

/// Dispatcher that shows desktop notifications and rings the terminal bell.
///
/// Deferred alerts are tokio sleep tasks; each one that actually fires is
/// reported back over the channel the dispatcher was constructed with, so
/// the controller can run its deferred-fired hook. Cancellation aborts the
/// sleeping tasks, which guarantees a cancelled alert never fires.
pub struct DesktopDispatcher {
    fired_tx: mpsc::UnboundedSender<()>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl DesktopDispatcher {
    /// Create a dispatcher reporting fired alerts on the given channel
    pub fn new(fired_tx: mpsc::UnboundedSender<()>) -> Self {
        Self {
            fired_tx,
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl AlertDispatcher for DesktopDispatcher {
    fn request_permission(&self) -> bool {
        // Desktop notification daemons take no upfront authorization; a
        // missing daemon surfaces later as a per-alert delivery failure.
        true
    }

    fn schedule_deferred(
        &self,
        after_seconds: f64,
        title: &str,
        body: &str,
        sound_id: &str,
    ) -> Result<(), AlertError> {
        let title = title.to_string();
        let body = body.to_string();
        let sound_id = sound_id.to_string();
        let fired_tx = self.fired_tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(after_seconds)).await;

            info!("Deferred alert firing after {:.1}s", after_seconds);
            if let Err(e) = Notification::new()
                .summary(&title)
                .body(&body)
                .sound_name(&sound_id)
                .show()
            {
                warn!("Failed to show deferred notification: {}", e);
            }

            if fired_tx.send(()).is_err() {
                warn!("Deferred alert fired but nothing is listening");
            }
        });

        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
        debug!("Deferred alert scheduled for {:.1}s out", after_seconds);
        Ok(())
    }

    fn cancel_all(&self) {
        let mut pending = self.pending.lock();
        let count = pending.len();
        for handle in pending.drain(..) {
            handle.abort();
        }
        if count > 0 {
            info!("Cancelled {} pending deferred alert(s)", count);
        }
    }

    fn play_sound(&self, sound_id: &str) -> Result<(), AlertError> {
        // The terminal bell is the in-process sound channel; the named
        // system sound rides on the notifications themselves.
        print!("\x07");
        std::io::stdout()
            .flush()
            .map_err(|e| AlertError::PlaybackFailed(e.to_string()))?;
        debug!("Played alert sound: {}", sound_id);
        Ok(())
    }
}
