//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::Mode;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "split-second")]
#[command(about = "A state-managed HTTP server for a multi-mode stopwatch and lap timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Display tick interval in milliseconds (~60Hz by default)
    #[arg(short, long, default_value = "16")]
    pub tick_ms: u64,

    /// Initial activity mode
    #[arg(short, long, default_value = "running")]
    pub mode: Mode,

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
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
