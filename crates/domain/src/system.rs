//! Elevator system: one building served by one elevator.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::ValidationError;
use crate::floor::Floor;
use crate::id::SystemId;
use crate::station::Station;
use crate::time::{Timestamp, now};

/// Building name used when none is given at initialisation.
pub const DEFAULT_BUILDING_NAME: &str = "Name Unknown";

/// Upper bound on `stations_count`; every station is stored as a row.
pub const MAX_STATIONS: u32 = 1000;

/// A building with `stations_count` floors and the position of its elevator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevatorSystem {
    pub id: SystemId,
    pub building_name: String,
    pub stations_count: u32,
    /// `None` only until the stations have been created.
    pub current_floor: Option<Floor>,
    pub current_direction: Direction,
    pub created: Timestamp,
}

/// The snapshot the dispatcher decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    pub stations_count: u32,
    pub current_floor: Option<Floor>,
    pub current_direction: Direction,
}

impl SystemState {
    /// Is `floor` the top floor of the building?
    #[must_use]
    pub fn is_top(&self, floor: Floor) -> bool {
        floor.value() == self.stations_count
    }
}

impl ElevatorSystem {
    /// Create a builder for constructing an [`ElevatorSystem`].
    #[must_use]
    pub fn builder() -> ElevatorSystemBuilder {
        ElevatorSystemBuilder::default()
    }

    /// Snapshot of position and direction for the dispatcher.
    #[must_use]
    pub fn state(&self) -> SystemState {
        SystemState {
            stations_count: self.stations_count,
            current_floor: self.current_floor,
            current_direction: self.current_direction,
        }
    }

    /// Floors served by this system, bottom to top.
    pub fn floors(&self) -> impl Iterator<Item = Floor> + use<> {
        (1..=self.stations_count).filter_map(|n| Floor::new(n).ok())
    }

    /// One in-service station per floor.
    #[must_use]
    pub fn stations(&self) -> Vec<Station> {
        self.floors().map(|floor| Station::new(self.id, floor)).collect()
    }

    /// Ensure `floor` exists in this building.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FloorOutOfRange`] above the top floor.
    pub fn check_floor(&self, floor: Floor) -> Result<(), ValidationError> {
        if floor.value() > self.stations_count {
            return Err(ValidationError::FloorOutOfRange {
                floor,
                stations_count: self.stations_count,
            });
        }
        Ok(())
    }

    /// Record the outcome of a move.
    pub fn advance_to(&mut self, floor: Floor, direction: Direction) {
        self.current_floor = Some(floor);
        self.current_direction = direction;
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`], [`ValidationError::NoStations`],
    /// [`ValidationError::TooManyStations`] above [`MAX_STATIONS`], or
    /// [`ValidationError::FloorOutOfRange`] for a current floor above the
    /// top floor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.building_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.stations_count == 0 {
            return Err(ValidationError::NoStations);
        }
        if self.stations_count > MAX_STATIONS {
            return Err(ValidationError::TooManyStations { max: MAX_STATIONS });
        }
        if let Some(floor) = self.current_floor {
            self.check_floor(floor)?;
        }
        Ok(())
    }
}

/// Step-by-step builder for [`ElevatorSystem`].
#[derive(Debug, Default)]
pub struct ElevatorSystemBuilder {
    id: Option<SystemId>,
    building_name: Option<String>,
    stations_count: u32,
    current_floor: Option<Floor>,
    current_direction: Direction,
}

impl ElevatorSystemBuilder {
    #[must_use]
    pub fn id(mut self, id: SystemId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn building_name(mut self, name: impl Into<String>) -> Self {
        self.building_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn stations_count(mut self, count: u32) -> Self {
        self.stations_count = count;
        self
    }

    #[must_use]
    pub fn current_floor(mut self, floor: Floor) -> Self {
        self.current_floor = Some(floor);
        self
    }

    #[must_use]
    pub fn current_direction(mut self, direction: Direction) -> Self {
        self.current_direction = direction;
        self
    }

    /// Consume the builder, validate, and return an [`ElevatorSystem`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is blank, there are no
    /// stations, or the current floor does not exist.
    pub fn build(self) -> Result<ElevatorSystem, ValidationError> {
        let system = ElevatorSystem {
            id: self.id.unwrap_or_default(),
            building_name: self
                .building_name
                .unwrap_or_else(|| DEFAULT_BUILDING_NAME.to_string()),
            stations_count: self.stations_count,
            current_floor: self.current_floor,
            current_direction: self.current_direction,
            created: now(),
        };
        system.validate()?;
        Ok(system)
    }
}
