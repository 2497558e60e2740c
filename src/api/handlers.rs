//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc, time::Duration};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::{minute_progress, AppState, Mode, ModeSwitch};
use super::responses::{
    ApiResponse, FormattedTime, HealthResponse, LapsResponse, StatusResponse,
};

/// Handle POST /start - Start or resume the stopwatch
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let already_running = match state.status() {
        Ok(status) => status.running,
        Err(e) => {
            error!("Failed to read session state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match state.start() {
        Ok(status) if already_running => Ok(Json(ApiResponse::noop(
            "Stopwatch already running".to_string(),
            &status,
        ))),
        Ok(status) => {
            info!("Start endpoint called - stopwatch running");
            Ok(Json(ApiResponse::ok("Stopwatch started".to_string(), &status)))
        }
        Err(e) => {
            error!("Failed to start stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the stopwatch
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(status) => {
            info!("Pause endpoint called - elapsed frozen at {}ms", status.elapsed_ms);
            Ok(Json(ApiResponse::ok("Stopwatch paused".to_string(), &status)))
        }
        Err(e) => {
            error!("Failed to pause stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Reset the session
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(status) => {
            info!("Reset endpoint called - session cleared");
            Ok(Json(ApiResponse::ok("Stopwatch reset".to_string(), &status)))
        }
        Err(e) => {
            error!("Failed to reset stopwatch: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /lap - Record a lap at the current elapsed time
pub async fn lap_handler(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    match state.record_lap() {
        Ok(Some(lap)) => {
            let status = state.status().map_err(|e| {
                error!("Failed to read session state: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            info!("Lap endpoint called - lap {} at {}ms", lap.number, lap.cumulative_ms);
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok(
                    format!(
                        "Lap {} recorded ({})",
                        lap.number,
                        FormattedTime::lap_display(lap.delta_ms)
                    ),
                    &status,
                )),
            ))
        }
        Ok(None) => {
            let status = state.status().map_err(|e| {
                error!("Failed to read session state: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            warn!("Lap endpoint called before start - rejected");
            Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::rejected(
                    "Start the stopwatch before recording laps".to_string(),
                    &status,
                )),
            ))
        }
        Err(e) => {
            error!("Failed to record lap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mode/{id} - Select the active mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let current = state.status().map_err(|e| {
        error!("Failed to read session state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mode: Mode = match mode_id.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("Mode endpoint called with {}", e);
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::rejected(format!("{}", e), &current)),
            ));
        }
    };

    match state.select_mode(mode) {
        Ok(ModeSwitch::Applied(mode)) => {
            let status = state.status().map_err(|e| {
                error!("Failed to read session state: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            info!("Mode endpoint called - switched to {}", mode.label());
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok(
                    format!("Switched to {} mode", mode.label()),
                    &status,
                )),
            ))
        }
        Ok(ModeSwitch::RejectedRunning) => Ok((
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(
                "Stop the timer to change modes!".to_string(),
                &current,
            )),
        )),
        Err(e) => {
            error!("Failed to select mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current session status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let status = match state.status() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get session state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        mode: status.mode.into(),
        running: status.running,
        elapsed_ms: status.elapsed_ms,
        display: FormattedTime::from_millis(status.elapsed_ms),
        progress: minute_progress(status.elapsed_ms),
        lap_count: status.lap_count,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /laps - Return the lap list with highlighting
pub async fn laps_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LapsResponse>, StatusCode> {
    match state.laps_view() {
        Ok(view) => Ok(Json(LapsResponse::from(&view))),
        Err(e) => {
            error!("Failed to get lap list: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /events - Stream presentation notifications as SSE.
///
/// This is the adapter feed for the widget's side effects: beep
/// playback and theme recoloring happen client-side on these events.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_events();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(data) => return Some((Ok(Event::default().data(data)), rx)),
                    Err(e) => {
                        error!("Failed to serialize event: {}", e);
                        continue;
                    }
                },
                Err(RecvError::Lagged(missed)) => {
                    warn!("Event subscriber lagged, skipped {} events", missed);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
