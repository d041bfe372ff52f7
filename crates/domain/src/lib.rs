//! # elevator-domain
//!
//! Pure domain model for the elevatord dispatcher.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Floors** and travel **Directions**
//! - Define **Stations** (one landing per floor, possibly under maintenance)
//! - Define **Requests** (calls and floor selections waiting to be served)
//! - Define **Systems** (one building, one elevator, its current position)
//! - Contain the **Dispatcher**: the decision of which request to serve next
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod direction;
pub mod dispatch;
pub mod floor;
pub mod request;
pub mod station;
pub mod system;
