//! Main Entrypoint for the MenuTeller Skill Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Loading the school calendar and constructing the dialog orchestrator.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use menuteller_api::{config::Config, router::create_router, state::AppState};
use menuteller_core::{
    calendar::SchoolCalendar, dialog::DialogOrchestrator, fetcher::HttpMenuFetcher,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load the School Calendar and Build the Orchestrator ---
    let calendar = Arc::new(
        SchoolCalendar::from_path(&config.school_calendar_path)
            .context("Failed to load the school calendar")?,
    );
    info!(
        days = calendar.len(),
        path = %config.school_calendar_path.display(),
        "School calendar loaded."
    );

    let fetcher = Arc::new(HttpMenuFetcher::new(config.menu_api_base_url.clone()));
    let skill = Arc::new(DialogOrchestrator::new(
        fetcher,
        calendar,
        config.cutoff_hour,
    ));

    let app_state = Arc::new(AppState {
        skill,
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        bind_address = %config.bind_address,
        menu_api = %config.menu_api_base_url,
        cutoff_hour = config.cutoff_hour,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
