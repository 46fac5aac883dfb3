//! Theme reservation HTTP server.

use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use theme_reservation::adapters::http::{build_app, ReservationAppState};
use theme_reservation::adapters::postgres::{
    self, PostgresCancellationPromoter, PostgresCatalogReader, PostgresReservationRepository,
    PostgresWaitingRepository,
};
use theme_reservation::config::AppConfig;
use theme_reservation::domain::foundation::RoleAdminGate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize tracing
    let production = config.is_production();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(|| tracing_subscriber::fmt::layer()))
        .init();

    info!(
        environment = ?config.server.environment,
        auto_approve = config.reservation.auto_approve,
        position_window = config.reservation.position_window,
        "Starting theme reservation server"
    );

    // Database
    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        info!("Running database migrations");
        postgres::migrate(&pool).await?;
    }

    let positions = config.reservation.position_calculator();
    let state = ReservationAppState {
        catalog: Arc::new(PostgresCatalogReader::new(pool.clone())),
        reservations: Arc::new(PostgresReservationRepository::new(pool.clone())),
        waitings: Arc::new(PostgresWaitingRepository::new(pool.clone(), positions)),
        promoter: Arc::new(
            PostgresCancellationPromoter::new(pool.clone())
                .with_lock_timeout(config.database.lock_timeout()),
        ),
        admin_gate: Arc::new(RoleAdminGate),
        initial_status: config.reservation.initial_status(),
    };

    let app = build_app(state, config.server.request_timeout());
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
