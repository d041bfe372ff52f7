//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod elevator;
#[allow(clippy::missing_errors_doc)]
pub mod requests;
#[allow(clippy::missing_errors_doc)]
pub mod stations;
#[allow(clippy::missing_errors_doc)]
pub mod systems;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, patch};

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_domain::error::ValidationError;
use elevator_domain::floor::Floor;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<SR, STR, RR>() -> Router<AppState<SR, STR, RR>>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    Router::new()
        // Systems
        .route(
            "/systems",
            get(systems::list::<SR, STR, RR>).post(systems::create::<SR, STR, RR>),
        )
        .route("/systems/{id}", get(systems::get::<SR, STR, RR>))
        .route("/systems/{id}/stations", get(stations::list::<SR, STR, RR>))
        .route("/systems/{id}/requests", get(requests::list::<SR, STR, RR>))
        // Operations
        .route("/systems/{id}/move", patch(elevator::move_elevator::<SR, STR, RR>))
        .route(
            "/systems/{id}/call/{floor}",
            patch(elevator::call::<SR, STR, RR>),
        )
        .route(
            "/systems/{id}/select/{floor}",
            patch(elevator::select::<SR, STR, RR>),
        )
        .route(
            "/systems/{id}/stations/{floor}/maintenance",
            patch(elevator::maintenance::<SR, STR, RR>),
        )
        // Stations
        .route("/stations/{id}", get(stations::get::<SR, STR, RR>))
        // Requests
        .route("/requests/{id}", get(requests::get::<SR, STR, RR>))
}

/// Parse an identifier from a path segment.
fn parse_id<T: FromStr>(value: &str) -> Result<T, ApiError> {
    T::from_str(value).map_err(|_| ValidationError::InvalidId(value.to_string()).into())
}

fn parse_floor(value: u32) -> Result<Floor, ApiError> {
    Floor::new(value).map_err(ApiError::from)
}
