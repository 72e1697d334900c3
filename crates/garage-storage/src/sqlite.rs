//! SQLite record store
//!
//! Each session opens its own connection to the database file and closes it
//! on drop. Every statement binds its values as parameters. Each row also
//! stores its `plate_key` (computed in Rust, see [`plate_key`]) under a unique
//! index, so two concurrent creates with the same plate cannot both be written.

use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

use garage_core::{
    plate_key, NewVehicle, RecordStore, StorageError, StoreSession, Vehicle, VehicleId,
};

/// Default busy timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plate TEXT NOT NULL,
        plate_key TEXT NOT NULL,
        brand TEXT NOT NULL,
        model_year TEXT NOT NULL,
        color TEXT,
        owner TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_vehicles_plate
        ON vehicles (plate_key);";

const SELECT_COLUMNS: &str = "SELECT id, plate, brand, model_year, color, owner FROM vehicles";

/// Record store backed by an SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteRecordStore {
    /// Open (creating if needed) the database at `path` and ensure the schema
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn open_with_timeout(
        path: impl Into<PathBuf>,
        busy_timeout_ms: u64,
    ) -> Result<Self, StorageError> {
        let store = Self {
            path: path.into(),
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        };
        let connection = store.connect()?;
        connection
            .execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(map_error)?;
        connection.execute_batch(SCHEMA).map_err(map_error)?;
        tracing::info!(path = %store.path.display(), "sqlite record store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(&self.path, flags)
            .map_err(|err| StorageError::unavailable(err.to_string()))?;
        connection
            .busy_timeout(self.busy_timeout)
            .map_err(map_error)?;
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(map_error)?;
        Ok(connection)
    }
}

impl RecordStore for SqliteRecordStore {
    fn session(&self) -> Result<Box<dyn StoreSession>, StorageError> {
        let connection = self.connect()?;
        tracing::trace!(path = %self.path.display(), "sqlite session opened");
        Ok(Box::new(SqliteSession { connection }))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

struct SqliteSession {
    connection: Connection,
}

impl StoreSession for SqliteSession {
    fn list_all(&self) -> Result<Vec<Vehicle>, StorageError> {
        let mut stmt = self
            .connection
            .prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))
            .map_err(map_error)?;
        let rows = stmt.query_map(params![], map_vehicle_row).map_err(map_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(map_error)
    }

    fn find_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>, StorageError> {
        self.connection
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                map_vehicle_row,
            )
            .optional()
            .map_err(map_error)
    }

    fn exists_by_plate(&self, plate: &str) -> Result<bool, StorageError> {
        self.connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate_key = ?1)",
                params![plate_key(plate)],
                |row| row.get(0),
            )
            .map_err(map_error)
    }

    fn insert(&mut self, vehicle: &NewVehicle) -> Result<VehicleId, StorageError> {
        self.connection
            .execute(
                "INSERT INTO vehicles (plate, plate_key, brand, model_year, color, owner)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    vehicle.plate,
                    plate_key(&vehicle.plate),
                    vehicle.brand,
                    vehicle.model_year,
                    vehicle.color,
                    vehicle.owner
                ],
            )
            .map_err(map_error)?;
        Ok(self.connection.last_insert_rowid())
    }

    fn update_by_id(&mut self, id: VehicleId, vehicle: &NewVehicle) -> Result<(), StorageError> {
        self.connection
            .execute(
                "UPDATE vehicles
                 SET plate = ?1, plate_key = ?2, brand = ?3, model_year = ?4, color = ?5,
                     owner = ?6
                 WHERE id = ?7",
                params![
                    vehicle.plate,
                    plate_key(&vehicle.plate),
                    vehicle.brand,
                    vehicle.model_year,
                    vehicle.color,
                    vehicle.owner,
                    id
                ],
            )
            .map_err(map_error)?;
        Ok(())
    }

    fn delete_by_id(&mut self, id: VehicleId) -> Result<(), StorageError> {
        self.connection
            .execute("DELETE FROM vehicles WHERE id = ?1", params![id])
            .map_err(map_error)?;
        Ok(())
    }
}

/// Maps an `SQLite` row into a vehicle record.
fn map_vehicle_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        plate: row.get(1)?,
        brand: row.get(2)?,
        model_year: row.get(3)?,
        color: row.get(4)?,
        owner: row.get(5)?,
    })
}

/// Maps `SQLite` errors to storage errors.
fn map_error(err: rusqlite::Error) -> StorageError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => StorageError::constraint(err.to_string()),
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::NotADatabase => StorageError::unavailable(err.to_string()),
            _ => StorageError::query(err.to_string()),
        },
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => StorageError::Corrupt(err.to_string()),
        _ => StorageError::query(err.to_string()),
    }
}
