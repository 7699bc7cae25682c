//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::{Bounds, CompletionPolicy};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "chance-timer")]
#[command(about = "A state-managed HTTP service for a random-interval sit timer")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Minimum sit length in minutes
    #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u64).range(1..=179))]
    pub lower: u64,

    /// Maximum sit length in minutes
    #[arg(short, long, default_value = "70", value_parser = clap::value_parser!(u64).range(2..=180))]
    pub upper: u64,

    /// How a session is allowed to end
    #[arg(long, value_enum, default_value = "gate-on-hidden")]
    pub policy: CompletionPolicy,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the initial timer bounds from the CLI values
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.lower, self.upper)
    }
}
