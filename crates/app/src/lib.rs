//! # elevator-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SystemRepository`: systems, their stations at creation, and move commits
//!   - `StationRepository`: station lookup and maintenance updates
//!   - `RequestRepository`: requests and the pending snapshot
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SystemService`: initialise, list, get
//!   - `RequestService`: list, get
//!   - `ElevatorService`: move, call, select floor, maintenance
//! - Serialize mutations per system so a decision is never taken on stale state
//!
//! ## Dependency rule
//! Depends on `elevator-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod locks;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod memory;
