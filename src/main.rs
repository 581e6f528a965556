// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ReciclaMuz local API server
//!
//! Serves collection points, ratings and the device session from a
//! single JSON data file.

use recicla_core::{config::Config, storage::FileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting ReciclaMuz API");

    // Open the data file backing every collection
    tracing::info!(path = %config.data_file.display(), "Opening data file");
    let backend = Arc::new(FileStore::open(&config.data_file).await?);

    let state = Arc::new(AppState::new(config.clone(), backend));
    state.ratings.load().await;
    if let Some(err) = state.ratings.last_load_error().await {
        tracing::warn!(error = %err, "Starting with an empty rating list");
    }

    // Keep the stored session alive while the server runs
    let _refresher = state
        .sessions
        .spawn_refresher(config.session_refresh_interval());
    tracing::info!(
        ttl_days = config.session_ttl_days,
        refresh_secs = config.session_refresh_secs,
        "Session refresher started"
    );

    // Build router
    let app = recicla_core::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), tracing_subscriber::filter::ParseError> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recicla_core=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
