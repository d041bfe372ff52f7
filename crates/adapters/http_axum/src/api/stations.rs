//! JSON REST handlers for stations.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_domain::id::{StationId, SystemId};
use elevator_domain::station::Station;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Station>>),
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
    Ok(Json<Station>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/systems/{id}/stations`
pub async fn list<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    let stations = state.system_service.list_stations(system_id).await?;
    Ok(ListResponse::Ok(Json(stations)))
}

/// `GET /api/stations/{id}`
pub async fn get<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let station_id: StationId = parse_id(&id)?;
    let station = state.system_service.get_station(station_id).await?;
    Ok(GetResponse::Ok(Json(station)))
}
