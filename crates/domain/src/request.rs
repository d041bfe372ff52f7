//! Request: a passenger call or floor selection waiting to be served.
//!
//! A request without a destination is an *unrouted call* (someone pressed
//! the hall button at `origin`). Once a destination is attached it becomes
//! a *routed selection*. Either way the elevator serves it by stopping at
//! its [effective target](Request::effective_target).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::floor::Floor;
use crate::id::{RequestId, SystemId};
use crate::time::{Timestamp, now};

/// A pending or served elevator request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub system_id: SystemId,
    pub origin: Floor,
    pub destination: Option<Floor>,
    pub created: Timestamp,
    pub served_on: Option<Timestamp>,
    /// How many times the dispatcher passed over this request in favour of
    /// another high-priority one. Never decreases.
    pub skip_count: u32,
}

impl Request {
    /// Create a builder for constructing a [`Request`].
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// A new unrouted call from `origin`.
    #[must_use]
    pub fn call(system_id: SystemId, origin: Floor) -> Self {
        Self {
            id: RequestId::new(),
            system_id,
            origin,
            destination: None,
            created: now(),
            served_on: None,
            skip_count: 0,
        }
    }

    /// The floor the elevator has to reach to serve this request:
    /// the destination if one was selected, the origin otherwise.
    #[must_use]
    pub fn effective_target(&self) -> Floor {
        self.destination.unwrap_or(self.origin)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.served_on.is_none()
    }

    #[must_use]
    pub fn is_routed(&self) -> bool {
        self.destination.is_some()
    }

    /// Attach a destination to an unrouted call.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SameOriginAndDestination`] when
    /// `destination` equals the origin.
    pub fn route_to(&mut self, destination: Floor) -> Result<(), ValidationError> {
        if destination == self.origin {
            return Err(ValidationError::SameOriginAndDestination);
        }
        self.destination = Some(destination);
        Ok(())
    }

    /// Mark as served. A request is served at most once; later calls keep
    /// the first timestamp.
    pub fn mark_served(&mut self, at: Timestamp) {
        if self.served_on.is_none() {
            self.served_on = Some(at);
        }
    }

    /// Record that the dispatcher skipped this request once more.
    pub fn record_skip(&mut self) {
        self.skip_count = self.skip_count.saturating_add(1);
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SameOriginAndDestination`] for a routed
    /// request going nowhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.destination == Some(self.origin) {
            return Err(ValidationError::SameOriginAndDestination);
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    id: Option<RequestId>,
    system_id: Option<SystemId>,
    origin: Option<Floor>,
    destination: Option<Floor>,
    created: Option<Timestamp>,
    skip_count: u32,
}

impl RequestBuilder {
    #[must_use]
    pub fn id(mut self, id: RequestId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn system_id(mut self, system_id: SystemId) -> Self {
        self.system_id = Some(system_id);
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: Floor) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn destination(mut self, destination: Floor) -> Self {
        self.destination = Some(destination);
        self
    }

    #[must_use]
    pub fn created(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }

    #[must_use]
    pub fn skip_count(mut self, skip_count: u32) -> Self {
        self.skip_count = skip_count;
        self
    }

    /// Consume the builder, validate, and return a pending [`Request`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFloor`] if `origin` is missing, or
    /// [`ValidationError::SameOriginAndDestination`].
    pub fn build(self) -> Result<Request, ValidationError> {
        let request = Request {
            id: self.id.unwrap_or_default(),
            system_id: self.system_id.unwrap_or_default(),
            origin: self.origin.ok_or(ValidationError::InvalidFloor)?,
            destination: self.destination,
            created: self.created.unwrap_or_else(now),
            served_on: None,
            skip_count: self.skip_count,
        };
        request.validate()?;
        Ok(request)
    }
}
