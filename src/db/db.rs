use crate::libs::data_storage::DataStorage;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "carwatch.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database at `path`, or `carwatch.db` in the data directory.
    pub fn open(path: Option<&Path>) -> anyhow::Result<Db> {
        let conn = match path {
            Some(path) => Connection::open(path)?,
            None => Connection::open(DataStorage::new().get_path(DB_FILE_NAME)?)?,
        };

        Ok(Db { conn })
    }

    pub fn in_memory() -> anyhow::Result<Db> {
        Ok(Db {
            conn: Connection::open_in_memory()?,
        })
    }
}
