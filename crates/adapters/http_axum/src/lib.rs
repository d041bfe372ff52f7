//! # elevator-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for systems, stations and requests
//!   (`/api/systems`, `/api/stations/{id}`, `/api/requests/{id}`)
//! - Expose the elevator operations (move, call, select, maintenance) as
//!   `PATCH` endpoints under `/api/systems/{id}`
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `elevator-app` (for port traits and services) and
//! `elevator-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
