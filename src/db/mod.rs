//! Snapshot storage backends.

/// SQLite connection handling.
pub mod db;

/// InfluxDB line protocol writer.
pub mod influx;

/// SQLite `snapshots` table.
pub mod snapshots;

/// `Storage` trait, errors and backend selection.
pub mod storage;
