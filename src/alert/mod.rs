//! Alert delivery module
//!
//! This module defines the dispatcher contract the timer controller alerts
//! through, plus the desktop implementation backed by system notifications.

pub mod desktop;

use thiserror::Error;

// Re-export main types
pub use desktop::DesktopDispatcher;

/// Notification title used for every alert
pub const ALERT_TITLE: &str = "Time's Up!";
/// Notification body used for every alert
pub const ALERT_BODY: &str = "Your timer has finished.";
/// Named system sound attached to alerts
pub const ALERT_SOUND: &str = "bell";

/// Errors an alert channel can report.
///
/// Only `PermissionDenied` blocks a session from starting; the other
/// variants degrade to "timer still counts, some alert channel missing".
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert permission denied")]
    PermissionDenied,

    #[error("failed to schedule deferred alert: {0}")]
    SchedulingFailed(String),

    #[error("sound playback failed: {0}")]
    PlaybackFailed(String),
}

/// Delivery channel for timer alerts.
///
/// Implementations own the deferred-alert scheduling (an external timing
/// authority that fires even if ticking stalls) and foreground sound
/// playback. At most one sound instance is audible at a time; a new
/// `play_sound` call supersedes a still-playing one.
pub trait AlertDispatcher: Send + Sync {
    /// Ask for permission to deliver alerts; `false` blocks session start
    fn request_permission(&self) -> bool;

    /// Register an alert to fire after the given (fractional) offset.
    ///
    /// Delivery must not depend on the controller's tick loop. When the
    /// alert actually fires, the dispatcher reports it back through
    /// whatever hook it was constructed with.
    fn schedule_deferred(
        &self,
        after_seconds: f64,
        title: &str,
        body: &str,
        sound_id: &str,
    ) -> Result<(), AlertError>;

    /// Cancel every pending deferred alert and stop any playing sound.
    ///
    /// A cancelled alert must never fire.
    fn cancel_all(&self);

    /// Play the foreground alert sound, fire-and-forget
    fn play_sound(&self, sound_id: &str) -> Result<(), AlertError>;
}
