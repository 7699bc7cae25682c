//! Server-wide application state

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::TimerController;

/// State shared with the HTTP layer: the controller plus server metadata
pub struct AppState {
    /// The timer core
    pub controller: Arc<TimerController>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create a new AppState around an existing controller
    pub fn new(controller: Arc<TimerController>, port: u16, host: String) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Record the most recent user command
    pub fn record_action(&self, action: &str) {
        *self.last_action.lock() = Some((action.to_string(), Utc::now()));
    }

    /// Get last action information
    pub fn last_action(&self) -> Option<(String, DateTime<Utc>)> {
        self.last_action.lock().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
