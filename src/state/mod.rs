//! State management module
//!
//! This module contains the stopwatch session state and its management logic.

pub mod app_state;
pub mod laps;
pub mod mode;
pub mod stopwatch;

// Re-export main types
pub use app_state::{
    AppState, DisplaySnapshot, LapSummary, LapsView, ModeSwitch, SessionStatus, StopwatchEvent,
};
pub use laps::{LapHighlights, LapTracker};
pub use mode::{Mode, UnknownMode};
pub use stopwatch::{minute_progress, Stopwatch};
