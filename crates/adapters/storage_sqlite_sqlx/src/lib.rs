//! # elevator-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `elevator-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `elevator-app` (for port traits) and `elevator-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod request_repo;
pub mod station_repo;
pub mod system_repo;

mod codec;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use request_repo::SqliteRequestRepository;
pub use station_repo::SqliteStationRepository;
pub use system_repo::SqliteSystemRepository;
