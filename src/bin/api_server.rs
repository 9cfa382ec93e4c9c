// src/bin/api_server.rs

use anyhow::Context;
use car_management::infra::logging;
use car_management::storage::schema;
use car_management::transport;
use car_management::{CarService, PgCarRepository, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing()?;

    let settings = Settings::from_env().context("Invalid configuration")?;
    let db = &settings.database;
    tracing::info!(
        host = %db.host,
        port = db.port,
        database = %db.database,
        table = %db.table,
        "Configuration loaded"
    );

    // --- Schema initialization (once, before any request is served) ---
    let (pool, report) = schema::initialize(db)
        .await
        .context("Failed to initialize the database schema")?;
    tracing::info!(
        created_database = report.created_database,
        created_table = report.created_table,
        "Schema ready"
    );

    let repository = PgCarRepository::new(pool.clone(), db.table.clone())?;
    let service = CarService::new(Arc::new(repository), db.table.clone());
    let app = transport::http::create_router(transport::http::AppState::new(service));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    tracing::info!("Server listening on http://{}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
