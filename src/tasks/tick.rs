//! One-second tick background task

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::{Phase, TimerController};

/// Background task that drives the controller's tick callback.
///
/// Fills the Clock/Scheduler role: while a session is active the controller
/// receives one `on_tick` per second; when the published phase leaves
/// `Active` (stop or finalize) the ticking is cancelled and the task goes
/// back to waiting for the next session.
pub async fn tick_task(controller: Arc<TimerController>) {
    info!("Starting tick task");

    let mut snapshot_rx = controller.subscribe();

    loop {
        // Wait for a session to become active
        while snapshot_rx.borrow_and_update().phase != Phase::Active {
            if snapshot_rx.changed().await.is_err() {
                debug!("Snapshot channel closed, stopping tick task");
                return;
            }
        }
        debug!("Session active, ticking at 1s period");

        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // session's first counted second lands a full period after start.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    controller.on_tick();
                }
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        debug!("Snapshot channel closed, stopping tick task");
                        return;
                    }
                    if snapshot_rx.borrow_and_update().phase != Phase::Active {
                        debug!("Session no longer active, ticking cancelled");
                        break;
                    }
                }
            }
        }
    }
}
