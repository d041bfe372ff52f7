//! `SQLite` implementation of [`RequestRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use elevator_app::ports::RequestRepository;
use elevator_domain::error::ElevatorError;
use elevator_domain::floor::Floor;
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::request::Request;

use crate::codec::{
    decode_count, decode_floor, decode_id, decode_timestamp, encode_count, encode_floor,
    encode_timestamp,
};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Request`].
struct Wrapper(Request);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Request> {
        value.map(|w| w.0)
    }

    fn all(rows: Vec<Self>) -> Vec<Request> {
        rows.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let system_id: String = row.try_get("system_id")?;
        let origin: i64 = row.try_get("origin_floor")?;
        let destination: Option<i64> = row.try_get("destination_floor")?;
        let created: String = row.try_get("created")?;
        let served_on: Option<String> = row.try_get("served_on")?;
        let skip_count: i64 = row.try_get("skip_count")?;

        Ok(Self(Request {
            id: decode_id(&id)?,
            system_id: decode_id(&system_id)?,
            origin: decode_floor(origin)?,
            destination: destination.map(decode_floor).transpose()?,
            created: decode_timestamp(&created)?,
            served_on: served_on.as_deref().map(decode_timestamp).transpose()?,
            skip_count: decode_count(skip_count)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO elevator_requests
        (id, system_id, origin_floor, destination_floor, created, served_on, skip_count)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM elevator_requests WHERE id = ?";
const SELECT_BY_SYSTEM: &str =
    "SELECT * FROM elevator_requests WHERE system_id = ? ORDER BY created ASC";
// A request is pending while unserved and its target station is in service.
const SELECT_PENDING: &str = r"
    SELECT r.* FROM elevator_requests r
    JOIN elevator_stations s
      ON s.system_id = r.system_id
     AND s.floor = COALESCE(r.destination_floor, r.origin_floor)
    WHERE r.system_id = ?
      AND r.served_on IS NULL
      AND s.under_maintenance_since IS NULL
    ORDER BY r.created ASC
";
const SELECT_UNROUTED_PENDING_FROM: &str = r"
    SELECT r.* FROM elevator_requests r
    JOIN elevator_stations s
      ON s.system_id = r.system_id
     AND s.floor = r.origin_floor
    WHERE r.system_id = ?
      AND r.origin_floor = ?
      AND r.destination_floor IS NULL
      AND r.served_on IS NULL
      AND s.under_maintenance_since IS NULL
    ORDER BY r.created ASC
    LIMIT 1
";
const UPDATE: &str = r"
    UPDATE elevator_requests
    SET destination_floor = ?, served_on = ?, skip_count = ?
    WHERE id = ?
";

/// `SQLite`-backed request repository.
pub struct SqliteRequestRepository {
    pool: SqlitePool,
}

impl SqliteRequestRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RequestRepository for SqliteRequestRepository {
    fn create(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(request.id.to_string())
                .bind(request.system_id.to_string())
                .bind(encode_floor(request.origin))
                .bind(request.destination.map(encode_floor))
                .bind(encode_timestamp(request.created))
                .bind(request.served_on.map(encode_timestamp))
                .bind(encode_count(request.skip_count))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(request)
        }
    }

    fn get_by_id(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_SYSTEM)
                .bind(system_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn find_pending(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Request>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PENDING)
                .bind(system_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn find_unrouted_pending_from(
        &self,
        system_id: SystemId,
        origin: Floor,
    ) -> impl Future<Output = Result<Option<Request>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_UNROUTED_PENDING_FROM)
                .bind(system_id.to_string())
                .bind(encode_floor(origin))
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Request, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(request.destination.map(encode_floor))
                .bind(request.served_on.map(encode_timestamp))
                .bind(encode_count(request.skip_count))
                .bind(request.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(request)
        }
    }
}
