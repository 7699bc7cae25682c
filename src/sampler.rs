//! Random target duration sampling

use rand::Rng;

/// Source of target durations, one fresh draw per session start
pub trait TargetSampler: Send {
    /// Uniform real draw from the closed interval `[lower_secs, upper_secs]`
    fn sample(&mut self, lower_secs: f64, upper_secs: f64) -> f64;
}

/// Sampler backed by the thread RNG, unpredictable across sessions
#[derive(Debug, Default)]
pub struct RandomSampler;

impl TargetSampler for RandomSampler {
    fn sample(&mut self, lower_secs: f64, upper_secs: f64) -> f64 {
        rand::rng().random_range(lower_secs..=upper_secs)
    }
}
