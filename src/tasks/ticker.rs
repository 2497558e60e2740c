//! Display ticker background task

use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that publishes display snapshots while the
/// stopwatch is running.
///
/// The task parks on the running flag and, once running, publishes one
/// snapshot per tick interval. The flag is also the cancellation
/// token: pause and reset flip it under the session lock, and the
/// snapshot publish re-checks the session under that same lock, so no
/// snapshot of a cancelled run is ever observed after the call that
/// cancelled it returns.
pub async fn ticker_task(state: Arc<AppState>) {
    info!(
        "Starting display ticker task ({}ms interval)",
        state.tick_interval.as_millis()
    );

    let mut running_rx = state.running_rx();

    loop {
        // Park until the stopwatch starts running
        while !*running_rx.borrow_and_update() {
            if running_rx.changed().await.is_err() {
                debug!("Running flag channel closed, stopping ticker");
                return;
            }
        }

        let mut interval = tokio::time::interval(state.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Tick - publish the current elapsed time
                _ = interval.tick() => {
                    match state.publish_snapshot_if_running() {
                        Ok(true) => {}
                        Ok(false) => {
                            // Cancelled between ticks, go back to parking
                            debug!("Stopwatch no longer running, ticker idle");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to publish display snapshot: {}", e);
                            break;
                        }
                    }
                }

                // Running flag change - stop ticking on pause/reset
                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running flag channel closed, stopping ticker");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Stopwatch paused or reset, ticker idle");
                        break;
                    }
                }
            }
        }
    }
}
