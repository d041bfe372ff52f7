//! Storage port: repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use elevator_domain::error::ElevatorError;
use elevator_domain::floor::Floor;
use elevator_domain::id::{RequestId, StationId, SystemId};
use elevator_domain::request::Request;
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;
use elevator_domain::time::Timestamp;

/// Everything a single move changes, committed as one unit.
#[derive(Debug, Clone)]
pub struct Movement {
    /// The system, already advanced to its new floor and direction.
    pub system: ElevatorSystem,
    /// Every pending request targeting this floor is served.
    pub reached: Floor,
    pub served_at: Timestamp,
    /// Request whose skip count goes up by one.
    pub skipped: Option<RequestId>,
}

/// Repository for [`ElevatorSystem`]s.
pub trait SystemRepository {
    /// Persist a new system together with its stations.
    fn create(
        &self,
        system: ElevatorSystem,
        stations: Vec<Station>,
    ) -> impl Future<Output = Result<ElevatorSystem, ElevatorError>> + Send;

    /// Get a system by its unique identifier.
    fn get_by_id(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<Option<ElevatorSystem>, ElevatorError>> + Send;

    /// Get all systems, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ElevatorSystem>, ElevatorError>> + Send;

    /// Apply a [`Movement`] atomically: store the system's new position,
    /// serve the requests at the reached floor and bump the skipped request.
    ///
    /// Returns the ids of the requests that were served. On error nothing
    /// is applied.
    fn commit_move(
        &self,
        movement: Movement,
    ) -> impl Future<Output = Result<Vec<RequestId>, ElevatorError>> + Send;
}

/// Repository for [`Station`]s.
pub trait StationRepository {
    /// Get a station by its unique identifier.
    fn get_by_id(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send;

    /// Find the station of `system_id` at `floor`.
    fn find_by_floor(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send;

    /// All stations of a system, bottom floor first.
    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Station>, ElevatorError>> + Send;

    /// Update an existing station.
    fn update(&self, station: Station)
    -> impl Future<Output = Result<Station, ElevatorError>> + Send;
}

/// Repository for [`Request`]s.
pub trait RequestRepository {
    /// Persist a new request.
    fn create(&self, request: Request)
    -> impl Future<Output = Result<Request, ElevatorError>> + Send;

    /// Get a request by its unique identifier.
    fn get_by_id(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send;

    /// All requests of a system, oldest first.
    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send;

    /// Unserved requests whose effective target station is not under
    /// maintenance, oldest first.
    fn find_pending(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send;

    /// Oldest pending request from `origin` that has no destination yet.
    fn find_unrouted_pending_from(
        &self,
        system_id: SystemId,
        origin: Floor,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send;

    /// Update an existing request.
    fn update(&self, request: Request)
    -> impl Future<Output = Result<Request, ElevatorError>> + Send;
}

impl<T: SystemRepository + Send + Sync> SystemRepository for Arc<T> {
    fn create(
        &self,
        system: ElevatorSystem,
        stations: Vec<Station>,
    ) -> impl Future<Output = Result<ElevatorSystem, ElevatorError>> + Send {
        (**self).create(system, stations)
    }

    fn get_by_id(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<Option<ElevatorSystem>, ElevatorError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ElevatorSystem>, ElevatorError>> + Send {
        (**self).get_all()
    }

    fn commit_move(
        &self,
        movement: Movement,
    ) -> impl Future<Output = Result<Vec<RequestId>, ElevatorError>> + Send {
        (**self).commit_move(movement)
    }
}

impl<T: StationRepository + Send + Sync> StationRepository for Arc<T> {
    fn get_by_id(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_floor(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
        (**self).find_by_floor(system_id, floor)
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Station>, ElevatorError>> + Send {
        (**self).list_by_system(system_id)
    }

    fn update(
        &self,
        station: Station,
    ) -> impl Future<Output = Result<Station, ElevatorError>> + Send {
        (**self).update(station)
    }
}

impl<T: RequestRepository + Send + Sync> RequestRepository for Arc<T> {
    fn create(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        (**self).create(request)
    }

    fn get_by_id(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        (**self).get_by_id(id)
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        (**self).list_by_system(system_id)
    }

    fn find_pending(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        (**self).find_pending(system_id)
    }

    fn find_unrouted_pending_from(
        &self,
        system_id: SystemId,
        origin: Floor,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        (**self).find_unrouted_pending_from(system_id, origin)
    }

    fn update(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        (**self).update(request)
    }
}
