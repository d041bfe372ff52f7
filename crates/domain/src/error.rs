//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ElevatorError`] via `#[from]` or an explicit `From` impl.

use crate::floor::Floor;

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum ElevatorError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A system, station or request does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The operation needs state the system does not have yet.
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    /// The target floor is under maintenance.
    #[error(transparent)]
    StationUnavailable(#[from] StationUnavailableError),

    /// A storage adapter failed.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("a system needs at least one station")]
    NoStations,

    #[error("a system has at most {max} stations")]
    TooManyStations { max: u32 },

    #[error("floor numbers start at 1")]
    InvalidFloor,

    #[error("floor {floor} is out of range 1..={stations_count}")]
    FloorOutOfRange { floor: Floor, stations_count: u32 },

    #[error("destination must differ from origin")]
    SameOriginAndDestination,

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// Lookup miss for a named kind of record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The system is not ready for the requested operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStateError {
    #[error("system {0} has no current station")]
    NoCurrentStation(String),
}

/// A floor rejected because its station is under maintenance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station at floor #{floor} is under maintenance")]
pub struct StationUnavailableError {
    pub floor: Floor,
}
