//! Sit length range bounds and their clamping rules

use serde::{Deserialize, Serialize};

/// Smallest allowed bound in minutes
pub const MIN_MINUTES: u64 = 1;
/// Largest allowed bound in minutes
pub const MAX_MINUTES: u64 = 180;

/// Integer-minute range a target duration is drawn from.
///
/// Invariant: `MIN_MINUTES <= lower < upper <= MAX_MINUTES`. Setting one
/// bound so that it would reach the other pushes the other bound out of the
/// way rather than rejecting the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    lower_minutes: u64,
    upper_minutes: u64,
}

impl Bounds {
    /// Create bounds from raw minute values, restoring the invariant if needed
    pub fn new(lower_minutes: u64, upper_minutes: u64) -> Self {
        let lower = lower_minutes.clamp(MIN_MINUTES, MAX_MINUTES - 1);
        let upper = upper_minutes.clamp(lower + 1, MAX_MINUTES);
        Self {
            lower_minutes: lower,
            upper_minutes: upper,
        }
    }

    /// Lower bound in minutes
    pub fn lower_minutes(&self) -> u64 {
        self.lower_minutes
    }

    /// Upper bound in minutes
    pub fn upper_minutes(&self) -> u64 {
        self.upper_minutes
    }

    /// Set the lower bound; pushes the upper bound up if it would be reached
    pub fn set_lower(&mut self, minutes: u64) {
        self.lower_minutes = minutes.clamp(MIN_MINUTES, MAX_MINUTES - 1);
        if self.lower_minutes >= self.upper_minutes {
            self.upper_minutes = self.lower_minutes + 1;
        }
    }

    /// Set the upper bound; pushes the lower bound down if it would be reached
    pub fn set_upper(&mut self, minutes: u64) {
        self.upper_minutes = minutes.clamp(MIN_MINUTES + 1, MAX_MINUTES);
        if self.upper_minutes <= self.lower_minutes {
            self.lower_minutes = self.upper_minutes - 1;
        }
    }

    /// The sampling interval in seconds
    pub fn range_seconds(&self) -> (f64, f64) {
        (
            (self.lower_minutes * 60) as f64,
            (self.upper_minutes * 60) as f64,
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(50, 70)
    }
}
