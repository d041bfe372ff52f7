//! # elevatord: elevator dispatcher daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use elevator_adapter_http_axum::state::AppState;
use elevator_adapter_storage_sqlite_sqlx::{
    SqliteRequestRepository, SqliteStationRepository, SqliteSystemRepository,
};
use elevator_app::services::elevator_service::ElevatorService;
use elevator_app::services::request_service::RequestService;
use elevator_app::services::system_service::SystemService;
use elevator_domain::dispatch::Dispatcher;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = elevator_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let system_repo = Arc::new(SqliteSystemRepository::new(pool.clone()));
    let station_repo = Arc::new(SqliteStationRepository::new(pool.clone()));
    let request_repo = Arc::new(SqliteRequestRepository::new(pool));

    // Services
    let system_service = SystemService::new(Arc::clone(&system_repo), Arc::clone(&station_repo));
    let request_service = RequestService::new(Arc::clone(&request_repo));
    let elevator_service = ElevatorService::new(system_repo, station_repo, request_repo)
        .with_dispatcher(Dispatcher::new(config.dispatch.starvation_threshold));

    // HTTP
    let state = AppState::new(system_service, request_service, elevator_service);
    let app = elevator_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        starvation_threshold = config.dispatch.starvation_threshold,
        "elevatord listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("elevatord stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
