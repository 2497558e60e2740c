//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{LapsView, Mode, SessionStatus};

/// Zero-padded display digits for an elapsed-time value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTime {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub millis: String,
}

impl FormattedTime {
    /// Split milliseconds into zero-padded h/m/s/ms display fields
    pub fn from_millis(ms: u64) -> Self {
        Self {
            hours: format!("{:02}", ms / 3_600_000),
            minutes: format!("{:02}", (ms % 3_600_000) / 60_000),
            seconds: format!("{:02}", (ms % 60_000) / 1_000),
            millis: format!("{:03}", ms % 1_000),
        }
    }

    /// Compact "MM:SS.mmm" form used for lap entries
    pub fn lap_display(ms: u64) -> String {
        let t = Self::from_millis(ms);
        format!("{}:{}.{}", t.minutes, t.seconds, t.millis)
    }
}

/// Theme data for a mode, as rendered by mode buttons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub colors: [String; 3],
}

impl From<Mode> for ModeInfo {
    fn from(mode: Mode) -> Self {
        Self {
            id: mode.id().to_string(),
            name: mode.label().to_string(),
            icon: mode.icon().to_string(),
            colors: mode.colors().map(String::from),
        }
    }
}

/// Session fields embedded in command responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: String,
    pub running: bool,
    pub elapsed_ms: u64,
    pub lap_count: usize,
}

impl From<&SessionStatus> for SessionSummary {
    fn from(status: &SessionStatus) -> Self {
        Self {
            mode: status.mode.id().to_string(),
            running: status.running,
            elapsed_ms: status.elapsed_ms,
            lap_count: status.lap_count,
        }
    }
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionSummary,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session: SessionSummary) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session,
        }
    }

    /// Create a response for an applied command
    pub fn ok(message: String, status: &SessionStatus) -> Self {
        Self::new("ok".to_string(), message, status.into())
    }

    /// Create a response for a command ignored in the current state
    pub fn noop(message: String, status: &SessionStatus) -> Self {
        Self::new("noop".to_string(), message, status.into())
    }

    /// Create a response for a rejected command (state unchanged)
    pub fn rejected(message: String, status: &SessionStatus) -> Self {
        Self::new("rejected".to_string(), message, status.into())
    }
}

/// Full status response driving the display refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mode: ModeInfo,
    pub running: bool,
    pub elapsed_ms: u64,
    pub display: FormattedTime,
    /// Fraction of the current minute, drives the progress ring
    pub progress: f64,
    pub lap_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// One rendered lap entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapEntry {
    /// 1-based lap number
    pub number: usize,
    pub cumulative_ms: u64,
    pub delta_ms: u64,
    /// "MM:SS.mmm" rendering of the lap delta
    pub display: String,
    pub fastest: bool,
    pub slowest: bool,
}

/// Lap list response with fastest/slowest highlighting applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapsResponse {
    pub laps: Vec<LapEntry>,
}

impl From<&LapsView> for LapsResponse {
    fn from(view: &LapsView) -> Self {
        let laps = view
            .cumulative
            .iter()
            .zip(view.deltas.iter())
            .enumerate()
            .map(|(i, (&cumulative_ms, &delta_ms))| LapEntry {
                number: i + 1,
                cumulative_ms,
                delta_ms,
                display: FormattedTime::lap_display(delta_ms),
                fastest: view.highlights.fastest.contains(&i),
                slowest: view.highlights.slowest.contains(&i),
            })
            .collect();
        Self { laps }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
