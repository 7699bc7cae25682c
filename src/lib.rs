//! Chance Timer - A state-managed HTTP service for a random-interval sit timer
//!
//! This library provides the timer/alert scheduling core for a sit timer that
//! counts down a randomly sampled duration invisibly and alerts the user when
//! it elapses, plus a small HTTP control surface around it.

pub mod alert;
pub mod api;
pub mod config;
pub mod sampler;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use alert::{AlertDispatcher, AlertError};
pub use api::create_router;
pub use config::Config;
pub use sampler::{RandomSampler, TargetSampler};
pub use state::{AppState, Bounds, CompletionPolicy, TimerController};
pub use utils::signals::shutdown_signal;
