//! JSON REST handlers for the elevator operations.
//!
//! Every operation answers with a human readable `message` and the system
//! as it stands afterwards.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_app::services::elevator_service::{CallOutcome, MoveOutcome, SelectOutcome};
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::request::Request;
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;

use super::{parse_floor, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for toggling maintenance.
#[derive(Deserialize)]
pub struct MaintenanceRequest {
    pub under_maintenance: bool,
}

/// Response body shared by all operations.
#[derive(Debug, Serialize)]
pub struct OperationBody {
    pub message: String,
    pub system: ElevatorSystem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub served: Vec<RequestId>,
}

impl OperationBody {
    fn new(message: impl Into<String>, system: ElevatorSystem) -> Self {
        Self {
            message: message.into(),
            system,
            request: None,
            station: None,
            served: Vec::new(),
        }
    }

    fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }
}

/// Possible responses from the operation endpoints.
pub enum OperationResponse {
    Ok(Json<OperationBody>),
}

impl IntoResponse for OperationResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

impl From<OperationBody> for OperationResponse {
    fn from(body: OperationBody) -> Self {
        Self::Ok(Json(body))
    }
}

/// `PATCH /api/systems/{id}/move`
pub async fn move_elevator<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
) -> Result<OperationResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let body = match state.elevator_service.move_elevator(system_id).await? {
        MoveOutcome::Idle { system } => OperationBody::new(
            "There are no requests to move the elevator, call or select a floor first",
            system,
        ),
        MoveOutcome::Moved {
            system,
            reached,
            served,
            ..
        } => OperationBody {
            served,
            ..OperationBody::new(format!("Elevator moved to floor #{reached}"), system)
        },
    };
    Ok(body.into())
}

/// `PATCH /api/systems/{id}/call/{floor}`
pub async fn call<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path((id, floor)): Path<(String, u32)>,
) -> Result<OperationResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let floor = parse_floor(floor)?;
    let body = match state.elevator_service.call_elevator(system_id, floor).await? {
        CallOutcome::AlreadyAtFloor { system } => OperationBody::new(
            format!("Elevator is already on floor #{floor}, select the destination floor now"),
            system,
        ),
        CallOutcome::Queued { system, request } => OperationBody::new(
            "Elevator call saved, the elevator will reach this floor shortly",
            system,
        )
        .with_request(request),
    };
    Ok(body.into())
}

/// `PATCH /api/systems/{id}/select/{floor}`
pub async fn select<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path((id, floor)): Path<(String, u32)>,
) -> Result<OperationResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let floor = parse_floor(floor)?;
    let body = match state.elevator_service.select_floor(system_id, floor).await? {
        SelectOutcome::AlreadyAtFloor { system } => OperationBody::new(
            format!("Elevator is already on floor #{floor}, select a different floor"),
            system,
        ),
        SelectOutcome::Routed { system, request } | SelectOutcome::Queued { system, request } => {
            OperationBody::new(
                "Floor selection saved, the elevator will reach the selected floor shortly",
                system,
            )
            .with_request(request)
        }
    };
    Ok(body.into())
}

/// `PATCH /api/systems/{id}/stations/{floor}/maintenance`
pub async fn maintenance<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path((id, floor)): Path<(String, u32)>,
    Json(req): Json<MaintenanceRequest>,
) -> Result<OperationResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let floor = parse_floor(floor)?;
    let station = state
        .elevator_service
        .set_maintenance(system_id, floor, req.under_maintenance)
        .await?;
    let system = state.system_service.get_system(system_id).await?;

    let verb = if req.under_maintenance {
        "marked"
    } else {
        "unmarked"
    };
    let body = OperationBody {
        station: Some(station),
        ..OperationBody::new(
            format!("Station at floor #{floor} is {verb} under maintenance"),
            system,
        )
    };
    Ok(body.into())
}
