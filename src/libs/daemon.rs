//! Long-running watch process.
//!
//! Wires the vehicle API, storage and notifier into a [`StateMonitor`] with
//! one listener chain per configured vehicle, then runs until SIGINT or
//! SIGTERM (Ctrl+C on Windows). On shutdown the cancellation token stops the
//! poller, every recording session and every pending backoff sleep; the
//! process exits once all background tasks have finished.

use crate::api::tesla::Tesla;
use crate::api::VehicleApi;
use crate::db::storage::{Storage, StorageBackend};
use crate::libs::config::{Config, VehicleConfig};
use crate::libs::fetcher::ResilientFetcher;
use crate::libs::listener::{
    ChainBuilder, CountInvocations, GreetOnFirst, IgnoreFirst, ListenerChain, LogAndNotify, Noop, RecordWhileOnline, VinFilter,
};
use crate::libs::messages::Message;
use crate::libs::notify::{Notifications, Notifier};
use crate::libs::poller::StateMonitor;
use crate::libs::recorder::Recorder;
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Builds the listener chain for one configured vehicle.
pub fn vehicle_chain<A: VehicleApi, S: Storage, N: Notifier>(
    vehicle: &VehicleConfig,
    recorder: &Recorder<A, S>,
    notifier: &Arc<N>,
    quiet_startup: bool,
    tasks: &TaskTracker,
    cancel: &CancellationToken,
) -> ListenerChain {
    ChainBuilder::new()
        .with(VinFilter::new(&vehicle.vin, vehicle.monitor))
        .with(CountInvocations::new())
        .with(GreetOnFirst::new(Arc::clone(notifier), tasks.clone()))
        .with(RecordWhileOnline::new(
            recorder.clone(),
            Arc::clone(notifier),
            tasks.clone(),
            cancel.clone(),
        ))
        .with_if(quiet_startup, IgnoreFirst::new())
        .with(LogAndNotify::new(Arc::clone(notifier), tasks.clone()))
        .build(Noop)
}

/// Runs the monitor over the given collaborators until `cancel` fires.
///
/// Background sessions and notifications are spawned on `tasks`; the caller
/// decides whether to wait for them.
pub async fn watch<A: VehicleApi, S: Storage, N: Notifier>(
    api: Arc<A>,
    storage: Arc<S>,
    notifier: Arc<N>,
    config: &Config,
    tasks: &TaskTracker,
    cancel: &CancellationToken,
) {
    let fetcher = ResilientFetcher::new(Arc::clone(&api), config.backoff_config());
    let recorder = Recorder::new(fetcher, storage, config.recorder_config());
    let poller_config = config.poller_config();

    let mut monitor = StateMonitor::new(api, &poller_config);
    for vehicle in &config.vehicles {
        monitor.add_listener(vehicle_chain(
            vehicle,
            &recorder,
            &notifier,
            poller_config.quiet_startup,
            tasks,
            cancel,
        ));
    }

    msg_info!(Message::WatcherStarting(config.vehicles.iter().filter(|v| v.monitor).count()));
    monitor.run(cancel).await;
}

/// Runs the watch process until a termination signal arrives.
pub async fn run_with_signal_handling(config: Config) -> Result<()> {
    config.validate()?;

    let cancel = CancellationToken::new();
    let tasks = TaskTracker::new();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(_), _) => {
                    msg_error!(Message::FailedToCreateSigtermHandler);
                    return;
                }
                (_, Err(_)) => {
                    msg_error!(Message::FailedToCreateSigintHandler);
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
                Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        drop(shutdown_tx);
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
    }

    let storage = Arc::new(StorageBackend::open(&config.storage_config())?);
    let api = Arc::new(Tesla::new(&config.api_config()));
    let notifier = Arc::new(Notifications::from_config(&config.pushover));

    let monitor_cancel = cancel.clone();
    let monitor_tasks = tasks.clone();
    let mut monitor_handle =
        tokio::spawn(async move { watch(api, storage, notifier, &config, &monitor_tasks, &monitor_cancel).await });

    tokio::select! {
        result = &mut monitor_handle => {
            match result {
                Ok(()) => msg_info!(Message::MonitorExitedNormally),
                Err(e) => msg_error!(Message::MonitorTaskPanicked(e.to_string())),
            }
        }
        Ok(()) = shutdown_rx => {
            msg_info!(Message::MonitorShuttingDown);
            cancel.cancel();
            if let Err(e) = monitor_handle.await {
                msg_warning!(Message::MonitorTaskPanicked(e.to_string()));
            }
        }
    }

    cancel.cancel();
    tasks.close();
    tasks.wait().await;
    Ok(())
}
