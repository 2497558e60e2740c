//! Activity modes and their display themes

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Activity preset selecting the display name, icon, and color theme.
/// Cosmetic only; timing semantics are identical across modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Running,
    Cycling,
    Walking,
    Jogging,
    Swimming,
}

impl Mode {
    /// All modes, in display order
    pub const ALL: [Mode; 5] = [
        Mode::Running,
        Mode::Cycling,
        Mode::Walking,
        Mode::Jogging,
        Mode::Swimming,
    ];

    /// Lowercase identifier used in URLs and serialized state
    pub fn id(&self) -> &'static str {
        match self {
            Mode::Running => "running",
            Mode::Cycling => "cycling",
            Mode::Walking => "walking",
            Mode::Jogging => "jogging",
            Mode::Swimming => "swimming",
        }
    }

    /// Human-readable display name
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Running => "Running",
            Mode::Cycling => "Cycling",
            Mode::Walking => "Walking",
            Mode::Jogging => "Jogging",
            Mode::Swimming => "Swimming",
        }
    }

    /// Display icon
    pub fn icon(&self) -> &'static str {
        match self {
            Mode::Running => "🏃",
            Mode::Cycling => "🚴",
            Mode::Walking => "🚶",
            Mode::Jogging => "🏋️",
            Mode::Swimming => "🏊",
        }
    }

    /// Gradient color triple for the progress ring
    pub fn colors(&self) -> [&'static str; 3] {
        match self {
            Mode::Running => ["#667eea", "#764ba2", "#f093fb"],
            Mode::Cycling => ["#764ba2", "#667eea", "#4facfe"],
            Mode::Walking => ["#43e97b", "#38f9d7", "#81ecec"],
            Mode::Jogging => ["#f093fb", "#667eea", "#764ba2"],
            Mode::Swimming => ["#4facfe", "#00f2fe", "#43e97b"],
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Running
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Rejection for a mode identifier outside the fixed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!("running".parse::<Mode>().unwrap(), Mode::Running);
        assert_eq!("Swimming".parse::<Mode>().unwrap(), Mode::Swimming);
        for mode in Mode::ALL {
            assert_eq!(mode.id().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!("rowing".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_id() {
        let json = serde_json::to_string(&Mode::Cycling).unwrap();
        assert_eq!(json, "\"cycling\"");
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Cycling);
    }

    #[test]
    fn every_mode_carries_a_full_theme() {
        for mode in Mode::ALL {
            assert!(!mode.label().is_empty());
            assert!(!mode.icon().is_empty());
            assert!(mode.colors().iter().all(|c| c.starts_with('#')));
        }
    }
}
