// File: services/roombook_backend/src/main.rs
use roombook_backend::{app::build_app, shutdown::wait_for_signal};
use roombook_common::{is_auto_release_enabled, logging};
use roombook_config::load_config;
use roombook_graph::{release::run_release_loop, GraphState};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            logging::init();
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    let _log_guard = logging::init_from_config(&config.logging);

    let graph_state = Arc::new(GraphState::from_config(&config)?);
    let app = build_app(&config, graph_state.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let release_task = match config.auto_release.clone() {
        Some(settings) if is_auto_release_enabled(&config) => Some(tokio::spawn(
            run_release_loop(graph_state.client.clone(), settings, shutdown_rx),
        )),
        _ => None,
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Some(task) = release_task {
        if let Err(e) = task.await {
            error!("Auto-release task ended abnormally: {}", e);
        }
    }
    info!("Server stopped");
    Ok(())
}
