//! Chance Timer - A state-managed HTTP service for a random-interval sit timer
//!
//! This is the main entry point for the chance-timer application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

use chance_timer::{
    alert::DesktopDispatcher,
    api::create_router,
    config::Config,
    sampler::RandomSampler,
    state::{AppState, TimerController},
    tasks::tick_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("chance_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting chance-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, bounds={}..{}min, policy={:?}",
        config.host, config.port, config.lower, config.upper, config.policy
    );

    // Deferred alerts report back over this channel
    let (fired_tx, mut fired_rx) = mpsc::unbounded_channel();
    let dispatcher = Arc::new(DesktopDispatcher::new(fired_tx));

    // Create the timer controller
    let controller = Arc::new(TimerController::new(
        config.bounds(),
        config.policy,
        dispatcher,
        Box::new(RandomSampler),
    ));

    // Start the one-second tick background task
    let tick_controller = Arc::clone(&controller);
    tokio::spawn(async move {
        tick_task(tick_controller).await;
    });

    // Pump deferred-alert-fired events into the controller
    let alert_controller = Arc::clone(&controller);
    tokio::spawn(async move {
        while fired_rx.recv().await.is_some() {
            alert_controller.on_deferred_alert_fired();
        }
    });

    // Create application state and HTTP router
    let state = Arc::new(AppState::new(controller, config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start                   - Begin a session");
    info!("  POST /stop                    - End the session, cancel alerts");
    info!("  POST /hide                    - Hide the elapsed readout");
    info!("  POST /reveal                  - Reveal the elapsed readout");
    info!("  POST /bounds/lower/:minutes   - Set minimum sit length");
    info!("  POST /bounds/upper/:minutes   - Set maximum sit length");
    info!("  GET  /status                  - Current timer status");
    info!("  GET  /health                  - Health check");

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
