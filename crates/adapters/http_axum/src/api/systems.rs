//! JSON REST handlers for elevator systems.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_domain::floor::Floor;
use elevator_domain::id::SystemId;
use elevator_domain::request::Request;
use elevator_domain::system::ElevatorSystem;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for initialising a system.
#[derive(Deserialize)]
pub struct CreateSystemRequest {
    pub building_name: Option<String>,
    pub stations_count: u32,
}

/// A system with what it is about to do.
#[derive(Serialize)]
pub struct SystemDetail {
    #[serde(flatten)]
    pub system: ElevatorSystem,
    /// Floor the next move would reach, `None` when idle.
    pub next_station: Option<Floor>,
    pub under_maintenance: Vec<Floor>,
    pub pending_requests: Vec<Request>,
}

/// Response body of the create endpoint.
#[derive(Serialize)]
pub struct CreatedBody {
    pub message: &'static str,
    pub system: ElevatorSystem,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ElevatorSystem>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<SystemDetail>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/systems`
pub async fn list<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
) -> Result<ListResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let systems = state.system_service.list_systems().await?;
    Ok(ListResponse::Ok(Json(systems)))
}

/// `GET /api/systems/{id}`
pub async fn get<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let system = state.system_service.get_system(system_id).await?;
    let under_maintenance = state
        .system_service
        .list_stations(system_id)
        .await?
        .into_iter()
        .filter(|s| s.is_under_maintenance())
        .map(|s| s.floor)
        .collect();
    let pending_requests = state.request_service.list_requests(system_id, true).await?;
    let decision = state.elevator_service.next_decision(system_id).await?;

    Ok(GetResponse::Ok(Json(SystemDetail {
        system,
        next_station: decision.stop(),
        under_maintenance,
        pending_requests,
    })))
}

/// `POST /api/systems`
pub async fn create<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Json(req): Json<CreateSystemRequest>,
) -> Result<CreateResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system = state
        .system_service
        .initialise(req.building_name, req.stations_count)
        .await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        message: "New elevator system created successfully",
        system,
    })))
}
