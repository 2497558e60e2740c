//! Split Second - A state-managed HTTP server for a multi-mode stopwatch
//!
//! This library provides a stopwatch/lap-timer core (elapsed time,
//! lap splits with fastest/slowest classification, activity modes)
//! behind an HTTP API, with a background ticker publishing display
//! snapshots while the stopwatch runs.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
