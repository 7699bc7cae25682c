//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod bounds;
pub mod controller;
pub mod session;
pub mod snapshot;

// Re-export main types
pub use app_state::AppState;
pub use bounds::Bounds;
pub use controller::{CompletionPolicy, TimerController};
pub use session::Session;
pub use snapshot::{format_elapsed, ControllerSnapshot, Phase};
