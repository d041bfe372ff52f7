//! `SQLite` implementation of [`StationRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use elevator_app::ports::StationRepository;
use elevator_domain::error::ElevatorError;
use elevator_domain::floor::Floor;
use elevator_domain::id::{StationId, SystemId};
use elevator_domain::station::Station;

use crate::codec::{decode_floor, decode_id, decode_timestamp, encode_floor, encode_timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Station`].
struct Wrapper(Station);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Station> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let system_id: String = row.try_get("system_id")?;
        let floor: i64 = row.try_get("floor")?;
        let under_maintenance_since: Option<String> = row.try_get("under_maintenance_since")?;

        Ok(Self(Station {
            id: decode_id(&id)?,
            system_id: decode_id(&system_id)?,
            floor: decode_floor(floor)?,
            under_maintenance_since: under_maintenance_since
                .as_deref()
                .map(decode_timestamp)
                .transpose()?,
        }))
    }
}

const SELECT_BY_ID: &str = "SELECT * FROM elevator_stations WHERE id = ?";
const SELECT_BY_FLOOR: &str = "SELECT * FROM elevator_stations WHERE system_id = ? AND floor = ?";
const SELECT_BY_SYSTEM: &str =
    "SELECT * FROM elevator_stations WHERE system_id = ? ORDER BY floor ASC";
const UPDATE: &str = "UPDATE elevator_stations SET under_maintenance_since = ? WHERE id = ?";

/// `SQLite`-backed station repository.
pub struct SqliteStationRepository {
    pool: SqlitePool,
}

impl SqliteStationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StationRepository for SqliteStationRepository {
    fn get_by_id(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
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

    fn find_by_floor(
        &self,
        system_id: SystemId,
        floor: Floor,
    ) -> impl Future<Output = Result<Option<Station>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_FLOOR)
                .bind(system_id.to_string())
                .bind(encode_floor(floor))
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_by_system(
        &self,
        system_id: SystemId,
    ) -> impl Future<Output = Result<Vec<Station>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_SYSTEM)
                .bind(system_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        station: Station,
    ) -> impl Future<Output = Result<Station, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(station.under_maintenance_since.map(encode_timestamp))
                .bind(station.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(station)
        }
    }
}
