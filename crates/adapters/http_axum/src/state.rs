//! Shared application state for axum handlers.

use std::sync::Arc;

use elevator_app::ports::{RequestRepository, StationRepository, SystemRepository};
use elevator_app::services::elevator_service::ElevatorService;
use elevator_app::services::request_service::RequestService;
use elevator_app::services::system_service::SystemService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<SR, STR, RR> {
    /// System initialisation and lookups.
    pub system_service: Arc<SystemService<SR, STR>>,
    /// Request lookups.
    pub request_service: Arc<RequestService<RR>>,
    /// Move, call, select and maintenance.
    pub elevator_service: Arc<ElevatorService<SR, STR, RR>>,
}

impl<SR, STR, RR> Clone for AppState<SR, STR, RR> {
    fn clone(&self) -> Self {
        Self {
            system_service: Arc::clone(&self.system_service),
            request_service: Arc::clone(&self.request_service),
            elevator_service: Arc::clone(&self.elevator_service),
        }
    }
}

impl<SR, STR, RR> AppState<SR, STR, RR>
where
    SR: SystemRepository + Send + Sync + 'static,
    STR: StationRepository + Send + Sync + 'static,
    RR: RequestRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        system_service: SystemService<SR, STR>,
        request_service: RequestService<RR>,
        elevator_service: ElevatorService<SR, STR, RR>,
    ) -> Self {
        Self {
            system_service: Arc::new(system_service),
            request_service: Arc::new(request_service),
            elevator_service: Arc::new(elevator_service),
        }
    }
}
