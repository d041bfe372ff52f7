//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and serves a liveness probe at `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<SR, STR, RR>(state: AppState<SR, STR, RR>) -> Router
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
