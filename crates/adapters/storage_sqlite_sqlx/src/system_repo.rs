//! `SQLite` implementation of [`SystemRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use elevator_app::ports::{Movement, SystemRepository};
use elevator_domain::error::ElevatorError;
use elevator_domain::id::{RequestId, SystemId};
use elevator_domain::station::Station;
use elevator_domain::system::ElevatorSystem;

use crate::codec::{
    decode_count, decode_direction, decode_floor, decode_id, decode_timestamp, encode_count,
    encode_floor, encode_timestamp,
};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`ElevatorSystem`].
struct Wrapper(ElevatorSystem);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ElevatorSystem> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let building_name: String = row.try_get("building_name")?;
        let stations_count: i64 = row.try_get("stations_count")?;
        let current_floor: Option<i64> = row.try_get("current_floor")?;
        let current_direction: String = row.try_get("current_direction")?;
        let created: String = row.try_get("created")?;

        Ok(Self(ElevatorSystem {
            id: decode_id(&id)?,
            building_name,
            stations_count: decode_count(stations_count)?,
            current_floor: current_floor.map(decode_floor).transpose()?,
            current_direction: decode_direction(&current_direction)?,
            created: decode_timestamp(&created)?,
        }))
    }
}

struct RequestIdRow(RequestId);

impl<'r> FromRow<'r, SqliteRow> for RequestIdRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(decode_id(&id)?))
    }
}

const INSERT: &str = r"
    INSERT INTO elevator_systems
        (id, building_name, stations_count, current_floor, current_direction, created)
    VALUES (?, ?, ?, ?, ?, ?)
";
const INSERT_STATION: &str = r"
    INSERT INTO elevator_stations (id, system_id, floor, under_maintenance_since)
    VALUES (?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM elevator_systems WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM elevator_systems ORDER BY created ASC";
const UPDATE_POSITION: &str =
    "UPDATE elevator_systems SET current_floor = ?, current_direction = ? WHERE id = ?";
const SELECT_SERVED_AT_FLOOR: &str = r"
    SELECT id FROM elevator_requests
    WHERE system_id = ?
      AND served_on IS NULL
      AND COALESCE(destination_floor, origin_floor) = ?
    ORDER BY created ASC
";
const MARK_SERVED_AT_FLOOR: &str = r"
    UPDATE elevator_requests SET served_on = ?
    WHERE system_id = ?
      AND served_on IS NULL
      AND COALESCE(destination_floor, origin_floor) = ?
";
const BUMP_SKIP_COUNT: &str =
    "UPDATE elevator_requests SET skip_count = skip_count + 1 WHERE id = ? AND system_id = ?";

/// `SQLite`-backed system repository.
pub struct SqliteSystemRepository {
    pool: SqlitePool,
}

impl SqliteSystemRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SystemRepository for SqliteSystemRepository {
    fn create(
        &self,
        system: ElevatorSystem,
        stations: Vec<Station>,
    ) -> impl Future<Output = Result<ElevatorSystem, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(INSERT)
                .bind(system.id.to_string())
                .bind(&system.building_name)
                .bind(encode_count(system.stations_count))
                .bind(system.current_floor.map(encode_floor))
                .bind(system.current_direction.as_str())
                .bind(encode_timestamp(system.created))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            for station in &stations {
                sqlx::query(INSERT_STATION)
                    .bind(station.id.to_string())
                    .bind(station.system_id.to_string())
                    .bind(encode_floor(station.floor))
                    .bind(station.under_maintenance_since.map(encode_timestamp))
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }

            tx.commit().await.map_err(StorageError::from)?;
            Ok(system)
        }
    }

    fn get_by_id(
        &self,
        id: SystemId,
    ) -> impl Future<Output = Result<Option<ElevatorSystem>, ElevatorError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<ElevatorSystem>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn commit_move(
        &self,
        movement: Movement,
    ) -> impl Future<Output = Result<Vec<RequestId>, ElevatorError>> + Send {
        let pool = self.pool.clone();
        async move {
            let system_id = movement.system.id.to_string();
            let reached = encode_floor(movement.reached);
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(UPDATE_POSITION)
                .bind(movement.system.current_floor.map(encode_floor))
                .bind(movement.system.current_direction.as_str())
                .bind(&system_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            let served: Vec<RequestIdRow> = sqlx::query_as(SELECT_SERVED_AT_FLOOR)
                .bind(&system_id)
                .bind(reached)
                .fetch_all(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            sqlx::query(MARK_SERVED_AT_FLOOR)
                .bind(encode_timestamp(movement.served_at))
                .bind(&system_id)
                .bind(reached)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if let Some(skipped) = movement.skipped {
                sqlx::query(BUMP_SKIP_COUNT)
                    .bind(skipped.to_string())
                    .bind(&system_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }

            tx.commit().await.map_err(StorageError::from)?;
            Ok(served.into_iter().map(|row| row.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::request_repo::SqliteRequestRepository;
    use crate::station_repo::SqliteStationRepository;
    use elevator_app::ports::{RequestRepository, StationRepository};
    use elevator_domain::direction::Direction;
    use elevator_domain::floor::Floor;
    use elevator_domain::request::Request;
    use elevator_domain::time::now;

    fn floor(n: u32) -> Floor {
        Floor::new(n).unwrap()
    }

    async fn setup() -> SqlitePool {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        db.pool().clone()
    }

    fn test_system() -> ElevatorSystem {
        ElevatorSystem::builder()
            .building_name("Tower A")
            .stations_count(6)
            .current_floor(Floor::GROUND)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_system_with_stations() {
        let pool = setup().await;
        let repo = SqliteSystemRepository::new(pool.clone());
        let system = test_system();
        let stations = system.stations();

        repo.create(system.clone(), stations).await.unwrap();

        let fetched = repo.get_by_id(system.id).await.unwrap().unwrap();
        assert_eq!(fetched, system);

        let stations = SqliteStationRepository::new(pool)
            .list_by_system(system.id)
            .await
            .unwrap();
        assert_eq!(stations.len(), 6);
    }

    #[tokio::test]
    async fn should_return_none_when_system_not_found() {
        let repo = SqliteSystemRepository::new(setup().await);
        let result = repo.get_by_id(SystemId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_all_systems() {
        let repo = SqliteSystemRepository::new(setup().await);
        for _ in 0..3 {
            let system = test_system();
            let stations = system.stations();
            repo.create(system, stations).await.unwrap();
        }

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn should_roll_back_system_when_station_insert_fails() {
        let repo = SqliteSystemRepository::new(setup().await);
        let system = test_system();
        let mut stations = system.stations();
        // Two stations on the same floor break the unique constraint.
        stations[1].floor = stations[0].floor;

        let result = repo.create(system.clone(), stations).await;

        assert!(matches!(result, Err(ElevatorError::Storage(_))));
        assert!(repo.get_by_id(system.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_commit_move_atomically() {
        let pool = setup().await;
        let systems = SqliteSystemRepository::new(pool.clone());
        let requests = SqliteRequestRepository::new(pool);
        let mut system = test_system();
        let stations = system.stations();
        systems.create(system.clone(), stations).await.unwrap();

        let call = Request::call(system.id, floor(4));
        let trip = Request::builder()
            .system_id(system.id)
            .origin(floor(2))
            .destination(floor(4))
            .build()
            .unwrap();
        let elsewhere = Request::call(system.id, floor(5));
        for request in [&call, &trip, &elsewhere] {
            requests.create(request.clone()).await.unwrap();
        }

        system.advance_to(floor(4), Direction::Up);
        let served = systems
            .commit_move(Movement {
                system: system.clone(),
                reached: floor(4),
                served_at: now(),
                skipped: Some(elsewhere.id),
            })
            .await
            .unwrap();

        assert_eq!(served, vec![call.id, trip.id]);

        let fetched = systems.get_by_id(system.id).await.unwrap().unwrap();
        assert_eq!(fetched.current_floor, Some(floor(4)));

        let pending = requests.find_pending(system.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, elsewhere.id);
        assert_eq!(pending[0].skip_count, 1);
    }
}
