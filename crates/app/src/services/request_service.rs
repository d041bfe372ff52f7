//! Request service: read access to calls and selections.

use elevator_domain::error::{ElevatorError, NotFoundError};
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::request::Request;

use crate::ports::RequestRepository;

/// Application service for querying requests.
pub struct RequestService<R> {
    repo: R,
}

impl<R: RequestRepository> RequestService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Look up a request by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ElevatorError::NotFound`] when no request with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_request(&self, id: RequestId) -> Result<Request, ElevatorError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Request",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List the requests of a system, oldest first. With `pending_only`,
    /// only the requests the dispatcher currently considers.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_requests(
        &self,
        system_id: SystemId,
        pending_only: bool,
    ) -> Result<Vec<Request>, ElevatorError> {
        if pending_only {
            self.repo.find_pending(system_id).await
        } else {
            self.repo.list_by_system(system_id).await
        }
    }
}
