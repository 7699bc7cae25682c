//! Observable controller state published over a watch channel

use serde::{Deserialize, Serialize};

use super::Bounds;

/// Lifecycle phase of the timer controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No session is running
    Idle,
    /// A session is counting
    Active,
    /// A session has completed and the alert is being dispatched
    Alerting,
}

/// Point-in-time view of the controller, safe to hand to the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    /// Whole seconds counted so far, absent while idle
    pub elapsed_seconds: Option<u64>,
    /// Whether the user has hidden the readout
    pub hidden: bool,
    pub lower_minutes: u64,
    pub upper_minutes: u64,
}

impl ControllerSnapshot {
    /// Snapshot for a controller with no running session
    pub fn idle(bounds: Bounds, hidden: bool) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_seconds: None,
            hidden,
            lower_minutes: bounds.lower_minutes(),
            upper_minutes: bounds.upper_minutes(),
        }
    }

    /// Elapsed time formatted `MM:SS`, suppressed while the readout is hidden
    pub fn readout(&self) -> Option<String> {
        if self.hidden {
            return None;
        }
        self.elapsed_seconds.map(format_elapsed)
    }
}

/// Format a whole-second count as `MM:SS`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
