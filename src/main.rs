//! Split Second - A state-managed HTTP server for a multi-mode stopwatch
//!
//! This is the main entry point for the split-second application.

use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;

use split_second::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("split_second={},tower_http=info", config.log_level()))
        .init();

    info!("Starting split-second server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, mode={}",
          config.host, config.port, config.tick_ms, config.mode);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Duration::from_millis(config.tick_ms),
        config.mode,
    ));

    // Start the display ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Start or resume the stopwatch");
    info!("  POST /pause      - Pause the stopwatch");
    info!("  POST /reset      - Reset elapsed time and laps");
    info!("  POST /lap        - Record a lap split");
    info!("  POST /mode/:id   - Select activity mode (stopped only)");
    info!("  GET  /status     - Current elapsed time and progress");
    info!("  GET  /laps       - Lap list with fastest/slowest flags");
    info!("  GET  /events     - Presentation event stream (SSE)");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
