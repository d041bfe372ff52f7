//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use elevator_domain::error::{ElevatorError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ElevatorError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ElevatorError);

impl From<ElevatorError> for ApiError {
    fn from(err: ElevatorError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(ElevatorError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ElevatorError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ElevatorError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ElevatorError::InvalidState(err) => (StatusCode::CONFLICT, err.to_string()),
            ElevatorError::StationUnavailable(err) => (StatusCode::CONFLICT, err.to_string()),
            ElevatorError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
