//! System service: initialising and inspecting elevator systems.

use elevator_domain::direction::Direction;
use elevator_domain::error::{ElevatorError, NotFoundError};
use elevator_domain::floor::Floor;
use elevator_domain::id::{StationId, SystemId};
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;

use crate::ports::{StationRepository, SystemRepository};

/// Application service for systems and their stations.
pub struct SystemService<SR, STR> {
    systems: SR,
    stations: STR,
}

impl<SR: SystemRepository, STR: StationRepository> SystemService<SR, STR> {
    /// Create a new service backed by the given repositories.
    pub fn new(systems: SR, stations: STR) -> Self {
        Self { systems, stations }
    }

    /// Create a system with one station per floor and park the elevator at
    /// the ground floor, heading up.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::Validation`] for a blank name or zero
    /// stations, or a storage error propagated from the repository.
    #[tracing::instrument(skip(self, building_name))]
    pub async fn initialise(
        &self,
        building_name: Option<String>,
        stations_count: u32,
    ) -> Result<ElevatorSystem, ElevatorError> {
        let mut builder = ElevatorSystem::builder()
            .stations_count(stations_count)
            .current_floor(Floor::GROUND)
            .current_direction(Direction::Up);
        if let Some(name) = building_name {
            builder = builder.building_name(name);
        }
        let system = builder.build()?;
        let stations = system.stations();

        let created = self.systems.create(system, stations).await?;
        tracing::info!(
            system_id = %created.id,
            stations_count = created.stations_count,
            "elevator system initialised"
        );
        Ok(created)
    }

    /// Look up a system by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] when no system with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_system(&self, id: SystemId) -> Result<ElevatorSystem, ElevatorError> {
        self.systems.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ElevatorSystem",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all systems.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_systems(&self) -> Result<Vec<ElevatorSystem>, ElevatorError> {
        self.systems.get_all().await
    }

    /// List the stations of a system, bottom floor first.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system, or a
    /// storage error from the repository.
    pub async fn list_stations(&self, system_id: SystemId) -> Result<Vec<Station>, ElevatorError> {
        self.get_system(system_id).await?;
        self.stations.list_by_system(system_id).await
    }

    /// Look up a station by id.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] when no station with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_station(&self, id: StationId) -> Result<Station, ElevatorError> {
        self.stations.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Station",
                id: id.to_string(),
            }
            .into()
        })
    }
}
