//! Focus Timer - A state-managed HTTP server for a Pomodoro interval timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
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
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    let timer_config = config.timer_config();
    info!(
        "Configuration: host={}, port={}, work={}min, short={}min, long={}min, interval={}, auto_start={}",
        config.host,
        config.port,
        timer_config.work_minutes,
        timer_config.short_break_minutes,
        timer_config.long_break_minutes,
        timer_config.long_break_interval,
        timer_config.auto_start_next,
    );

    // Create application state, rejecting out-of-range timer flags
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer_config)?);

    // Start the timer tick background task
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
    info!("  GET  /timer          - Current phase, countdown and cycle position");
    info!("  POST /timer/start    - Start the countdown");
    info!("  POST /timer/pause    - Pause the countdown");
    info!("  POST /timer/toggle   - Start or pause");
    info!("  POST /timer/reset    - Restart the cycle");
    info!("  GET  /timer/config   - Active configuration");
    info!("  PUT  /timer/config   - Apply a new configuration");
    info!("  GET  /events         - Phase change notifications (SSE)");
    info!("  GET  /dashboard      - Focus mode, note and tasks");
    info!("  GET  /status         - Server and timer status");
    info!("  GET  /health         - Health check");

    // Open event streams never finish on their own, so shut down by
    // dropping the server rather than draining connections
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
