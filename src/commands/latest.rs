use crate::db::storage::{Storage, StorageBackend, StorageError};
use crate::libs::{config::Config, messages::Message, view::View};
use crate::{msg_info, msg_print};
use anyhow::Result;
use std::path::Path;

pub async fn cmd(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let storage = StorageBackend::open(&config.storage_config())?;

    match storage.query_latest().await {
        Ok(snapshot) => {
            msg_print!(Message::SnapshotHeader(snapshot.vin.clone()), true);
            View::snapshot(&snapshot);
            Ok(())
        }
        Err(StorageError::Empty) => {
            msg_info!(Message::NoSnapshotsStored);
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
