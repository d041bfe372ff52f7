//! Elevator service: moving the cabin and taking calls and selections.
//!
//! Every use-case here runs under the system's lock (see [`SystemLocks`]),
//! so the snapshot a decision is taken on is the one its effects are
//! committed against.

use elevator_domain::dispatch::{Decision, Dispatcher};
use elevator_domain::error::{
    ElevatorError, InvalidStateError, NotFoundError, StationUnavailableError,
};
use elevator_domain::floor::Floor;
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::request::Request;
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;
use elevator_domain::time::now;

use crate::locks::SystemLocks;
use crate::ports::{Movement, RequestRepository, StationRepository, SystemRepository};

/// Result of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing to serve; the system is unchanged.
    Idle { system: ElevatorSystem },
    /// The cabin reached `reached` and served every request targeting it.
    Moved {
        system: ElevatorSystem,
        reached: Floor,
        served: Vec<RequestId>,
        skipped: Option<RequestId>,
    },
}

impl MoveOutcome {
    #[must_use]
    pub fn system(&self) -> &ElevatorSystem {
        match self {
            Self::Idle { system } | Self::Moved { system, .. } => system,
        }
    }
}

/// Result of a hall call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The cabin is already at the calling floor; nothing recorded.
    AlreadyAtFloor { system: ElevatorSystem },
    /// A new unrouted request was recorded.
    Queued {
        system: ElevatorSystem,
        request: Request,
    },
}

/// Result of a floor selection from inside the cabin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selected floor is the current one; nothing recorded.
    AlreadyAtFloor { system: ElevatorSystem },
    /// The destination was attached to a waiting call from this floor.
    Routed {
        system: ElevatorSystem,
        request: Request,
    },
    /// No call was waiting here, a new routed request was recorded.
    Queued {
        system: ElevatorSystem,
        request: Request,
    },
}

/// The collaborator around the [`Dispatcher`]: feeds it pending requests
/// and applies its decisions.
pub struct ElevatorService<SR, STR, RR> {
    systems: SR,
    stations: STR,
    requests: RR,
    dispatcher: Dispatcher,
    locks: SystemLocks,
}

impl<SR, STR, RR> ElevatorService<SR, STR, RR>
where
    SR: SystemRepository,
    STR: StationRepository,
    RR: RequestRepository,
{
    /// Create a new service with the default dispatch policy.
    pub fn new(systems: SR, stations: STR, requests: RR) -> Self {
        Self {
            systems,
            stations,
            requests,
            dispatcher: Dispatcher::default(),
            locks: SystemLocks::new(),
        }
    }

    /// Replace the dispatch policy.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Ask the dispatcher for the next decision without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system, or a
    /// storage error from the repositories.
    pub async fn next_decision(&self, system_id: SystemId) -> Result<Decision, ElevatorError> {
        let system = self.load_system(system_id).await?;
        let pending = self.requests.find_pending(system_id).await?;
        Ok(self.dispatcher.decide(&system.state(), &pending))
    }

    /// Run one dispatch round and apply it: move to the chosen stop, serve
    /// every request targeting it and record the skipped request.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system, or a
    /// storage error. A failed commit leaves the system untouched.
    #[tracing::instrument(skip(self))]
    pub async fn move_elevator(&self, system_id: SystemId) -> Result<MoveOutcome, ElevatorError> {
        let _guard = self.locks.acquire(system_id).await;

        let mut system = self.load_system(system_id).await?;
        let pending = self.requests.find_pending(system_id).await?;
        let decision = self.dispatcher.decide(&system.state(), &pending);

        let Some(reached) = decision.stop() else {
            tracing::debug!(pending = pending.len(), "no request to serve, elevator idle");
            return Ok(MoveOutcome::Idle { system });
        };

        let from = system.current_floor;
        system.advance_to(reached, decision.direction);
        let served = self
            .systems
            .commit_move(Movement {
                system: system.clone(),
                reached,
                served_at: now(),
                skipped: decision.skipped,
            })
            .await?;

        tracing::info!(
            from = ?from.map(Floor::value),
            to = reached.value(),
            direction = %decision.direction,
            served = served.len(),
            skipped = ?decision.skipped,
            "elevator moved"
        );
        Ok(MoveOutcome::Moved {
            system,
            reached,
            served,
            skipped: decision.skipped,
        })
    }

    /// Call the cabin to `floor`.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system or floor,
    /// [`ElevatorError::InvalidState`] if the system has no current
    /// station, [`ElevatorError::StationUnavailable`] if the floor is under
    /// maintenance, or a storage error.
    #[tracing::instrument(skip(self, floor), fields(floor = floor.value()))]
    pub async fn call_elevator(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> Result<CallOutcome, ElevatorError> {
        let _guard = self.locks.acquire(system_id).await;

        let system = self.load_system(system_id).await?;
        let current = current_floor(&system)?;
        let station = self.load_station(&system, floor).await?;

        if current == floor {
            return Ok(CallOutcome::AlreadyAtFloor { system });
        }
        if station.is_under_maintenance() {
            return Err(StationUnavailableError { floor }.into());
        }

        let request = self.requests.create(Request::call(system_id, floor)).await?;
        tracing::debug!(request_id = %request.id, "call queued");
        Ok(CallOutcome::Queued { system, request })
    }

    /// Select `floor` as destination from inside the cabin.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system or floor,
    /// [`ElevatorError::InvalidState`] if the system has no current
    /// station, [`ElevatorError::StationUnavailable`] if the floor is under
    /// maintenance, or a storage error.
    #[tracing::instrument(skip(self, floor), fields(floor = floor.value()))]
    pub async fn select_floor(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> Result<SelectOutcome, ElevatorError> {
        let _guard = self.locks.acquire(system_id).await;

        let system = self.load_system(system_id).await?;
        let current = current_floor(&system)?;
        let station = self.load_station(&system, floor).await?;

        if station.is_under_maintenance() {
            return Err(StationUnavailableError { floor }.into());
        }
        if current == floor {
            return Ok(SelectOutcome::AlreadyAtFloor { system });
        }

        if let Some(mut waiting) = self
            .requests
            .find_unrouted_pending_from(system_id, current)
            .await?
        {
            waiting.route_to(floor)?;
            let request = self.requests.update(waiting).await?;
            tracing::debug!(request_id = %request.id, "destination attached to waiting call");
            return Ok(SelectOutcome::Routed { system, request });
        }

        let request = Request::builder()
            .system_id(system_id)
            .origin(current)
            .destination(floor)
            .build()?;
        let request = self.requests.create(request).await?;
        tracing::debug!(request_id = %request.id, "selection queued");
        Ok(SelectOutcome::Queued { system, request })
    }

    /// Mark or unmark the station at `floor` as under maintenance.
    ///
    /// Requests targeting the station drop out of the pending set while it
    /// is marked; served requests are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] for an unknown system or floor,
    /// or a storage error.
    #[tracing::instrument(skip(self, floor), fields(floor = floor.value()))]
    pub async fn set_maintenance(
        &self,
        system_id: SystemId,
        floor: Floor,
        under_maintenance: bool,
    ) -> Result<Station, ElevatorError> {
        let _guard = self.locks.acquire(system_id).await;

        let system = self.load_system(system_id).await?;
        let mut station = self.load_station(&system, floor).await?;
        station.set_maintenance(under_maintenance, now());
        let station = self.stations.update(station).await?;
        tracing::info!(under_maintenance, "station maintenance updated");
        Ok(station)
    }

    async fn load_system(&self, id: SystemId) -> Result<ElevatorSystem, ElevatorError> {
        self.systems.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ElevatorSystem",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn load_station(
        &self,
        system: &ElevatorSystem,
        floor: Floor,
    ) -> Result<Station, ElevatorError> {
        self.stations
            .find_by_floor(system.id, floor)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Station",
                    id: format!("{}#{floor}", system.id),
                }
                .into()
            })
    }
}

fn current_floor(system: &ElevatorSystem) -> Result<Floor, ElevatorError> {
    system
        .current_floor
        .ok_or_else(|| InvalidStateError::NoCurrentStation(system.id.to_string()).into())
}
