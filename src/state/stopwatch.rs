//! Stopwatch core: elapsed-time state and start/pause/reset transitions

use std::time::{Duration, Instant};

/// Elapsed-time state machine for a single stopwatch.
///
/// Elapsed time is the sum of all completed run segments plus the live
/// segment, so pausing and resuming continues from the prior value.
/// Invalid-state calls (start while running, pause while paused) are
/// silent no-ops. Clock instants are passed in explicitly; callers use
/// the `*_now` convenience methods outside of tests.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    accumulated: Duration,
    segment_start: Option<Instant>,
    started: bool,
}

impl Stopwatch {
    /// Create a stopped stopwatch at zero elapsed time
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            segment_start: None,
            started: false,
        }
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Check if the stopwatch has been started since the last reset
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Start (or resume) at the given instant; no-op if already running
    pub fn start(&mut self, now: Instant) {
        if self.segment_start.is_some() {
            return;
        }
        self.segment_start = Some(now);
        self.started = true;
    }

    /// Pause at the given instant; no-op if not running
    pub fn pause(&mut self, now: Instant) {
        if let Some(segment_start) = self.segment_start.take() {
            self.accumulated += now.saturating_duration_since(segment_start);
        }
    }

    /// Stop and return to zero elapsed time; valid in any state
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.segment_start = None;
        self.started = false;
    }

    /// Elapsed time at the given instant, in whole milliseconds
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        let live = match self.segment_start {
            Some(segment_start) => now.saturating_duration_since(segment_start),
            None => Duration::ZERO,
        };
        (self.accumulated + live).as_millis() as u64
    }

    /// Start (or resume) against the host clock
    pub fn start_now(&mut self) {
        self.start(Instant::now());
    }

    /// Pause against the host clock
    pub fn pause_now(&mut self) {
        self.pause(Instant::now());
    }

    /// Elapsed milliseconds against the host clock
    pub fn elapsed_ms_now(&self) -> u64 {
        self.elapsed_ms(Instant::now())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of the current minute that has elapsed, in [0, 1).
/// Drives the cyclic progress ring on the client.
pub fn minute_progress(elapsed_ms: u64) -> f64 {
    (elapsed_ms % 60_000) as f64 / 60_000.0
}
