//! JSON REST handlers for requests.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::request::Request;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for listing requests.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Only the requests the dispatcher currently considers.
    #[serde(default)]
    pub pending: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Request>>),
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
    Ok(Json<Request>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/systems/{id}/requests?pending=bool`
pub async fn list<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let system_id: SystemId = parse_id(&id)?;
    state.system_service.get_system(system_id).await?;
    let requests = state
        .request_service
        .list_requests(system_id, query.pending)
        .await?;
    Ok(ListResponse::Ok(Json(requests)))
}

/// `GET /api/requests/{id}`
pub async fn get<SR, STR, RR>(
    State(state): State<AppState<SR, STR, RR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    let request_id: RequestId = parse_id(&id)?;
    let request = state.request_service.get_request(request_id).await?;
    Ok(GetResponse::Ok(Json(request)))
}
