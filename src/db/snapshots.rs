use super::db::Db;
use super::storage::{Storage, StorageError};
use crate::libs::messages::Message;
use crate::libs::snapshot::{Bearings, ChargeSession, Snapshot};
use crate::libs::vehicle::{ChargingState, ShiftState};
use crate::{msg_debug, msg_info};
use chrono::DateTime;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;

const SCHEMA_SNAPSHOTS: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER NOT NULL PRIMARY KEY,
    timestamp INTEGER NOT NULL,
    name TEXT NOT NULL,
    vin TEXT NOT NULL,
    wake_state TEXT,
    driving_state TEXT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    speed REAL,
    charging_state TEXT,
    battery_level INTEGER NOT NULL,
    range_left REAL NOT NULL,
    charge_limit_soc INTEGER NOT NULL,
    charge_voltage REAL,
    charge_actual_current REAL,
    charge_pilot_current REAL,
    charge_time_to_full REAL,
    charge_miles_added REAL,
    charge_rate REAL,
    odometer REAL NOT NULL,
    activity TEXT NOT NULL
)";

const INDEX_SNAPSHOTS_TIMESTAMP: &str = "CREATE INDEX IF NOT EXISTS idx_snapshots_timestamp ON snapshots (timestamp)";

const INSERT_SNAPSHOT: &str = "INSERT INTO snapshots (
    timestamp, name, vin, wake_state, driving_state, latitude, longitude, speed,
    charging_state, battery_level, range_left, charge_limit_soc,
    charge_voltage, charge_actual_current, charge_pilot_current, charge_time_to_full,
    charge_miles_added, charge_rate, odometer, activity
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)";

const SELECT_LATEST: &str = "SELECT
    timestamp, name, vin, wake_state, driving_state, latitude, longitude, speed,
    charging_state, battery_level, range_left, charge_limit_soc,
    charge_voltage, charge_actual_current, charge_pilot_current, charge_time_to_full,
    charge_miles_added, charge_rate, odometer, activity
FROM snapshots ORDER BY timestamp DESC, id DESC LIMIT 1";

const COUNT_SNAPSHOTS: &str = "SELECT COUNT(*) FROM snapshots";

/// SQLite-backed snapshot store.
#[derive(Debug, Clone)]
pub struct Snapshots {
    pub conn: Arc<Mutex<Connection>>,
}

impl Snapshots {
    /// Opens (and if needed creates) the store at `path`, or the default database file.
    pub fn open(path: Option<&Path>) -> Result<Snapshots, StorageError> {
        let db = Db::open(path).map_err(|e| StorageError::Open(e.to_string()))?;
        let description = path.map(|p| p.display().to_string()).unwrap_or_else(|| super::db::DB_FILE_NAME.to_string());
        let snapshots = Self::with_connection(db.conn)?;
        msg_info!(Message::StorageOpened(format!("SQLite {}", description)));
        Ok(snapshots)
    }

    pub fn in_memory() -> Result<Snapshots, StorageError> {
        let db = Db::in_memory().map_err(|e| StorageError::Open(e.to_string()))?;
        Self::with_connection(db.conn)
    }

    fn with_connection(conn: Connection) -> Result<Snapshots, StorageError> {
        conn.execute(SCHEMA_SNAPSHOTS, [])?;
        conn.execute(INDEX_SNAPSHOTS_TIMESTAMP, [])?;
        Ok(Snapshots {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        let conn_guard = self.conn.lock();
        let count: i64 = conn_guard.query_row(COUNT_SNAPSHOTS, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn insert_sync(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let session = snapshot.charge_session.as_ref();
        let conn_guard = self.conn.lock();
        conn_guard.execute(
            INSERT_SNAPSHOT,
            params![
                snapshot.timestamp.timestamp_millis(),
                snapshot.name,
                snapshot.vin,
                snapshot.wake_state,
                snapshot.driving_state.as_ref().map(|s| s.as_str().to_string()),
                snapshot.bearings.latitude,
                snapshot.bearings.longitude,
                snapshot.bearings.speed,
                snapshot.charging_state.as_ref().map(|s| s.as_str().to_string()),
                snapshot.battery_level,
                snapshot.range_left,
                snapshot.charge_limit_soc,
                session.and_then(|s| s.voltage),
                session.and_then(|s| s.actual_current),
                session.and_then(|s| s.pilot_current),
                session.and_then(|s| s.time_to_full_charge),
                session.map(|s| s.charge_miles_added),
                session.map(|s| s.charge_rate),
                snapshot.odometer,
                snapshot.activity,
            ],
        )?;
        Ok(())
    }

    fn latest_sync(&self) -> Result<Snapshot, StorageError> {
        let conn_guard = self.conn.lock();
        let mut stmt = conn_guard.prepare(SELECT_LATEST)?;
        let row = stmt.query_row([], snapshot_from_row).optional()?;
        match row {
            Some(snapshot) => snapshot,
            None => Err(StorageError::Empty),
        }
    }
}

fn snapshot_from_row(row: &Row) -> rusqlite::Result<Result<Snapshot, StorageError>> {
    let millis: i64 = row.get(0)?;
    let Some(timestamp) = DateTime::from_timestamp_millis(millis) else {
        return Ok(Err(StorageError::Decode(format!("timestamp {} out of range", millis))));
    };

    let charge_miles_added: Option<f64> = row.get(16)?;
    let charge_session = match charge_miles_added {
        Some(charge_miles_added) => Some(ChargeSession {
            voltage: row.get(12)?,
            actual_current: row.get(13)?,
            pilot_current: row.get(14)?,
            time_to_full_charge: row.get(15)?,
            charge_miles_added,
            charge_rate: row.get::<_, Option<f64>>(17)?.unwrap_or_default(),
        }),
        None => None,
    };

    Ok(Ok(Snapshot {
        timestamp,
        name: row.get(1)?,
        vin: row.get(2)?,
        wake_state: row.get(3)?,
        driving_state: row.get::<_, Option<String>>(4)?.map(ShiftState::from),
        bearings: Bearings {
            latitude: row.get(5)?,
            longitude: row.get(6)?,
            speed: row.get(7)?,
        },
        charging_state: row.get::<_, Option<String>>(8)?.map(ChargingState::from),
        battery_level: row.get(9)?,
        range_left: row.get(10)?,
        charge_limit_soc: row.get(11)?,
        charge_session,
        odometer: row.get(18)?,
        activity: row.get(19)?,
    }))
}

impl Storage for Snapshots {
    async fn insert(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        self.insert_sync(&snapshot)?;
        msg_debug!(Message::SnapshotSaved {
            vin: snapshot.vin.clone(),
            timestamp: snapshot.timestamp.timestamp(),
        });
        Ok(())
    }

    async fn query_latest(&self) -> Result<Snapshot, StorageError> {
        self.latest_sync()
    }
}
