use crate::api::{find_vehicle, tesla::Tesla, ApiError};
use crate::db::storage::{Storage, StorageBackend};
use crate::libs::{config::Config, fetcher::ResilientFetcher, messages::Message, tracker::Tracker, view::View};
use crate::{msg_bail_anyhow, msg_error, msg_info};
use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const SNAPSHOT_BUFFER: usize = 8;

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// VIN of the vehicle to track
    #[arg(long)]
    vin: String,
}

pub async fn cmd(config_path: Option<&Path>, args: TrackArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    config.validate_backoff()?;
    let Some(api_config) = &config.api else {
        msg_bail_anyhow!(Message::ConfigMissingApi);
    };

    let api = Arc::new(Tesla::new(api_config));
    let vehicle = match find_vehicle(api.as_ref(), &args.vin).await {
        Ok(vehicle) => vehicle,
        Err(ApiError::VehicleNotFound(vin)) => msg_bail_anyhow!(Message::VehicleNotFound(vin)),
        Err(error) => return Err(error.into()),
    };
    let storage = StorageBackend::open(&config.storage_config())?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
            Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
        }
        signal_cancel.cancel();
    });

    let (sender, mut receiver) = mpsc::channel(SNAPSHOT_BUFFER);
    let tracker = Tracker::new(ResilientFetcher::new(api, config.backoff_config()), vehicle);
    let handle = tokio::spawn(tracker.run(sender, cancel.clone()));

    while let Some(snapshot) = receiver.recv().await {
        View::snapshot(&snapshot);
        if let Err(error) = storage.insert(snapshot).await {
            msg_error!(Message::SnapshotStoreFailed(error.to_string()));
        }
    }

    handle.await??;
    Ok(())
}
