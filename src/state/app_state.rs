//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{minute_progress, LapHighlights, LapTracker, Mode, Stopwatch};

/// Notification emitted by the core on every successful operation.
///
/// Beep playback and theme recoloring are presentation concerns; the
/// core only emits these events and adapters subscribe to them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StopwatchEvent {
    Started,
    Paused { elapsed_ms: u64 },
    Reset,
    LapRecorded { number: usize, delta_ms: u64 },
    ModeChanged { mode: Mode },
}

/// Per-tick display state published by the ticker task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub running: bool,
    pub elapsed_ms: u64,
    /// Fraction of the current minute, in [0, 1)
    pub progress: f64,
}

impl DisplaySnapshot {
    fn zero() -> Self {
        Self {
            running: false,
            elapsed_ms: 0,
            progress: 0.0,
        }
    }
}

/// Outcome of a mode-selection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSwitch {
    /// Mode applied; the session was reset as part of the switch
    Applied(Mode),
    /// Mode is locked while the stopwatch is running; nothing changed
    RejectedRunning,
}

/// Summary of a newly recorded lap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapSummary {
    /// 1-based lap number
    pub number: usize,
    pub cumulative_ms: u64,
    pub delta_ms: u64,
}

/// Point-in-time view of the whole session
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub mode: Mode,
    pub running: bool,
    pub elapsed_ms: u64,
    pub lap_count: usize,
}

/// Lap list plus classification, for rendering
#[derive(Debug, Clone)]
pub struct LapsView {
    pub cumulative: Vec<u64>,
    pub deltas: Vec<u64>,
    pub highlights: LapHighlights,
}

/// Stopwatch, laps, and mode share one lock: every invariant tying
/// them together (mode frozen while running, reset clearing laps) is
/// checked and applied in a single critical section.
#[derive(Debug)]
struct Session {
    stopwatch: Stopwatch,
    laps: LapTracker,
    mode: Mode,
}

/// Main application state owning the stopwatch session and its channels
#[derive(Debug)]
pub struct AppState {
    session: Mutex<Session>,
    /// Ticker cadence for display snapshots
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for presentation notifications (beeps, theming)
    pub event_tx: broadcast::Sender<StopwatchEvent>,
    /// Running flag; doubles as the ticker's cancellation token
    running_tx: watch::Sender<bool>,
    /// Channel for display snapshot updates
    pub display_tx: watch::Sender<DisplaySnapshot>,
    /// Keep the receivers alive to prevent channel closure
    _running_rx: watch::Receiver<bool>,
    _display_rx: watch::Receiver<DisplaySnapshot>,
}

impl AppState {
    /// Create a new AppState with a stopped session in the given mode
    pub fn new(port: u16, host: String, tick_interval: Duration, mode: Mode) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (running_tx, running_rx) = watch::channel(false);
        let (display_tx, display_rx) = watch::channel(DisplaySnapshot::zero());

        Self {
            session: Mutex::new(Session {
                stopwatch: Stopwatch::new(),
                laps: LapTracker::new(),
                mode,
            }),
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            running_tx,
            display_tx,
            _running_rx: running_rx,
            _display_rx: display_rx,
        }
    }

    /// Subscribe to presentation notifications
    pub fn subscribe_events(&self) -> broadcast::Receiver<StopwatchEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the running flag (the ticker's cancellation token)
    pub fn running_rx(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Watch display snapshots published by the ticker
    pub fn display_rx(&self) -> watch::Receiver<DisplaySnapshot> {
        self.display_tx.subscribe()
    }

    /// Start or resume the stopwatch. No-op if already running.
    pub fn start(&self) -> Result<SessionStatus, String> {
        let mut session = self.lock_session()?;
        if session.stopwatch.is_running() {
            return Ok(Self::status_of(&session));
        }

        session.stopwatch.start_now();
        // Flag flipped under the session lock so the ticker and this
        // mutation can never be observed out of order
        let _ = self.running_tx.send(true);
        let status = Self::status_of(&session);
        drop(session);

        info!("Stopwatch started");
        self.track_action("start");
        self.notify(StopwatchEvent::Started);
        Ok(status)
    }

    /// Pause the stopwatch. No-op if not running; a second pause in a
    /// row changes nothing. Once this returns, no display snapshot for
    /// the paused run is published.
    pub fn pause(&self) -> Result<SessionStatus, String> {
        let mut session = self.lock_session()?;
        if !session.stopwatch.is_running() {
            return Ok(Self::status_of(&session));
        }

        session.stopwatch.pause_now();
        let _ = self.running_tx.send(false);
        let status = Self::status_of(&session);
        drop(session);

        info!("Stopwatch paused at {}ms", status.elapsed_ms);
        self.track_action("pause");
        self.notify(StopwatchEvent::Paused {
            elapsed_ms: status.elapsed_ms,
        });
        Ok(status)
    }

    /// Reset the session: stop, zero elapsed time, clear laps.
    /// Valid in any state.
    pub fn reset(&self) -> Result<SessionStatus, String> {
        let mut session = self.lock_session()?;
        session.stopwatch.reset();
        session.laps.clear();
        let _ = self.running_tx.send(false);
        // Push a zeroed snapshot so display watchers drop the stale one
        let _ = self.display_tx.send(DisplaySnapshot::zero());
        let status = Self::status_of(&session);
        drop(session);

        info!("Stopwatch reset");
        self.track_action("reset");
        self.notify(StopwatchEvent::Reset);
        Ok(status)
    }

    /// Record a lap at the current elapsed time. Returns `None` (lap
    /// sequence unchanged) if the stopwatch has never been started
    /// since the last reset.
    pub fn record_lap(&self) -> Result<Option<LapSummary>, String> {
        let mut session = self.lock_session()?;
        if !session.stopwatch.has_started() {
            return Ok(None);
        }

        let cumulative_ms = session.stopwatch.elapsed_ms_now();
        let delta_ms = session.laps.record(cumulative_ms);
        let summary = LapSummary {
            number: session.laps.len(),
            cumulative_ms,
            delta_ms,
        };
        drop(session);

        info!(
            "Lap {} recorded: {}ms (+{}ms)",
            summary.number, summary.cumulative_ms, summary.delta_ms
        );
        self.track_action("lap");
        self.notify(StopwatchEvent::LapRecorded {
            number: summary.number,
            delta_ms: summary.delta_ms,
        });
        Ok(Some(summary))
    }

    /// Select the active mode. Rejected while the stopwatch is running;
    /// otherwise the switch forces a reset of the session.
    pub fn select_mode(&self, mode: Mode) -> Result<ModeSwitch, String> {
        let mut session = self.lock_session()?;
        if session.stopwatch.is_running() {
            warn!("Mode change to {} rejected: stopwatch is running", mode);
            return Ok(ModeSwitch::RejectedRunning);
        }

        session.mode = mode;
        session.stopwatch.reset();
        session.laps.clear();
        let _ = self.display_tx.send(DisplaySnapshot::zero());
        drop(session);

        info!("Switched to {} mode", mode.label());
        self.track_action("mode");
        self.notify(StopwatchEvent::ModeChanged { mode });
        self.notify(StopwatchEvent::Reset);
        Ok(ModeSwitch::Applied(mode))
    }

    /// Get a point-in-time view of the session
    pub fn status(&self) -> Result<SessionStatus, String> {
        let session = self.lock_session()?;
        Ok(Self::status_of(&session))
    }

    /// Get the lap list with its fastest/slowest classification
    pub fn laps_view(&self) -> Result<LapsView, String> {
        let session = self.lock_session()?;
        Ok(LapsView {
            cumulative: session.laps.cumulative().to_vec(),
            deltas: session.laps.deltas(),
            highlights: session.laps.classify(),
        })
    }

    /// Publish a display snapshot if the stopwatch is still running.
    /// Called by the ticker; the running check and the publish share
    /// the session lock, so once `pause()` or `reset()` has returned,
    /// no further snapshot of that run can be observed.
    pub fn publish_snapshot_if_running(&self) -> Result<bool, String> {
        let session = self.lock_session()?;
        if !session.stopwatch.is_running() {
            return Ok(false);
        }

        let elapsed_ms = session.stopwatch.elapsed_ms_now();
        let _ = self.display_tx.send(DisplaySnapshot {
            running: true,
            elapsed_ms,
            progress: minute_progress(elapsed_ms),
        });
        Ok(true)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
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

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, String> {
        self.session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))
    }

    fn status_of(session: &Session) -> SessionStatus {
        SessionStatus {
            mode: session.mode,
            running: session.stopwatch.is_running(),
            elapsed_ms: session.stopwatch.elapsed_ms_now(),
            lap_count: session.laps.len(),
        }
    }

    fn track_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn notify(&self, event: StopwatchEvent) {
        // No subscribers is not an error; broadcast just reports it
        if let Err(e) = self.event_tx.send(event) {
            tracing::debug!("No event subscribers: {}", e);
        }
    }
}
