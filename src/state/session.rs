//! One run of the timer

/// A single sit session.
///
/// The target is kept at full fractional precision while elapsed time is a
/// whole-second counter, so completion checks compare strictly: an integer
/// tick count has passed a fractional target only once it exceeds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub target_seconds: f64,
    pub elapsed_seconds: u64,
}

impl Session {
    /// Create a fresh session for the given sampled target
    pub fn new(target_seconds: f64) -> Self {
        Self {
            target_seconds,
            elapsed_seconds: 0,
        }
    }

    /// Whether elapsed time has strictly passed the target
    pub fn past_target(&self) -> bool {
        self.elapsed_seconds as f64 > self.target_seconds
    }
}
