//! In-memory implementation of every storage port, for service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use elevator_domain::error::ElevatorError;
use elevator_domain::floor::Floor;
use elevator_domain::id::{RequestId, StationId, SystemId};
use elevator_domain::request::Request;
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;

use crate::ports::{Movement, RequestRepository, StationRepository, SystemRepository};

#[derive(Default)]
struct Tables {
    systems: Vec<ElevatorSystem>,
    stations: HashMap<StationId, Station>,
    requests: Vec<Request>,
}

impl Tables {
    fn station_at(&self, system_id: SystemId, floor: Floor) -> Option<&Station> {
        self.stations
            .values()
            .find(|s| s.system_id == system_id && s.floor == floor)
    }

    fn is_pending(&self, request: &Request) -> bool {
        request.is_pending()
            && self
                .station_at(request.system_id, request.effective_target())
                .is_some_and(|s| !s.is_under_maintenance())
    }
}

/// Shared tables behind a mutex. Wrap in an `Arc` to hand the same store
/// to several services.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Insert a request as-is, bypassing the services.
    pub fn insert_request(&self, request: Request) {
        self.tables.lock().unwrap().requests.push(request);
    }

    pub fn request(&self, id: RequestId) -> Request {
        let tables = self.tables.lock().unwrap();
        tables
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }
}

impl SystemRepository for InMemoryStore {
    fn create(
        &self,
        system: ElevatorSystem,
        stations: Vec<Station>,
    ) -> impl Future<Output = Result<ElevatorSystem, ElevatorError>> + Send {
        let mut tables = self.tables.lock().unwrap();
        tables.systems.push(system.clone());
        for station in stations {
            tables.stations.insert(station.id, station);
        }
        async { Ok(system) }
    }

    fn get_by_id(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<Option<ElevatorSystem>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables.systems.iter().find(|s| s.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ElevatorSystem>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables.systems.clone();
        async { Ok(result) }
    }

    fn commit_move(
        &self,
        movement: Movement,
    ) -> impl Future<Output = Result<Vec<RequestId>, ElevatorError>> + Send {
        let mut tables = self.tables.lock().unwrap();
        let Tables {
            systems, requests, ..
        } = &mut *tables;

        if let Some(system) = systems.iter_mut().find(|s| s.id == movement.system.id) {
            *system = movement.system.clone();
        }

        let mut served = Vec::new();
        for request in requests.iter_mut() {
            if request.system_id == movement.system.id
                && request.is_pending()
                && request.effective_target() == movement.reached
            {
                request.mark_served(movement.served_at);
                served.push(request.id);
            }
            if Some(request.id) == movement.skipped {
                request.record_skip();
            }
        }
        async { Ok(served) }
    }
}

impl StationRepository for InMemoryStore {
    fn get_by_id(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables.stations.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_floor(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables.station_at(system_id, floor).cloned();
        async { Ok(result) }
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Station>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let mut result: Vec<Station> = tables
            .stations
            .values()
            .filter(|s| s.system_id == system_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.floor);
        async { Ok(result) }
    }

    fn update(
        &self,
        station: Station,
    ) -> impl Future<Output = Result<Station, ElevatorError>> + Send {
        let mut tables = self.tables.lock().unwrap();
        tables.stations.insert(station.id, station.clone());
        async { Ok(station) }
    }
}

impl RequestRepository for InMemoryStore {
    fn create(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        let mut tables = self.tables.lock().unwrap();
        tables.requests.push(request.clone());
        async { Ok(request) }
    }

    fn get_by_id(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables.requests.iter().find(|r| r.id == id).cloned();
        async { Ok(result) }
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result: Vec<Request> = tables
            .requests
            .iter()
            .filter(|r| r.system_id == system_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn find_pending(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let mut result: Vec<Request> = tables
            .requests
            .iter()
            .filter(|r| r.system_id == system_id && tables.is_pending(r))
            .cloned()
            .collect();
        result.sort_by_key(|r| r.created);
        async { Ok(result) }
    }

    fn find_unrouted_pending_from(
        &self,
        system_id: SystemId,
        origin: Floor,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        let tables = self.tables.lock().unwrap();
        let result = tables
            .requests
            .iter()
            .filter(|r| r.system_id == system_id && r.origin == origin)
            .filter(|r| !r.is_routed() && tables.is_pending(r))
            .min_by_key(|r| r.created)
            .cloned();
        async { Ok(result) }
    }

    fn update(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.requests.iter_mut().find(|r| r.id == request.id) {
            *stored = request.clone();
        }
        async { Ok(request) }
    }
}
