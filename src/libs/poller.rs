//! Coarse state monitor.
//!
//! Lists every vehicle of the account at a fixed interval and compares each
//! vehicle's coarse state (online, asleep, offline) against the value seen
//! on the previous cycle. Every difference is handed to all registered
//! listeners. The listing call is cheap, so this loop never adapts its
//! cadence; detailed sampling is left to recording sessions.
//!
//! ## Change rule
//!
//! - no cached state for the VIN: always a change
//! - cached and current state differ: a change
//! - cached state known, current state missing: [`PollError::MissingState`]
//!   for that vehicle only; the others are still processed
//!
//! The cache is overwritten with the current value on every cycle.

use crate::api::{ApiError, VehicleApi};
use crate::libs::listener::Listener;
use crate::libs::messages::Message;
use crate::libs::vehicle::VehicleSummary;
use crate::{msg_debug, msg_error, msg_info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("vehicle {vin} reported no state after a known state")]
    MissingState { vin: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between two vehicle listings.
    pub poll_interval: u64,
    /// Skip logging and notifying the state found at startup.
    pub quiet_startup: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: 10,
            quiet_startup: false,
        }
    }
}

pub type SharedListener = Arc<Mutex<Box<dyn Listener>>>;

/// Decides whether `current` is a change compared to `previous`.
pub fn detect_change(previous: Option<&VehicleSummary>, current: &VehicleSummary) -> Result<bool, PollError> {
    let Some(previous) = previous else {
        return Ok(true);
    };
    if previous.state.is_some() && current.state.is_none() {
        return Err(PollError::MissingState {
            vin: current.vin.clone(),
        });
    }
    Ok(previous.state != current.state)
}

pub struct StateMonitor<A: VehicleApi> {
    api: Arc<A>,
    interval: Duration,
    cache: HashMap<String, VehicleSummary>,
    listeners: Vec<SharedListener>,
}

impl<A: VehicleApi> StateMonitor<A> {
    pub fn new(api: Arc<A>, config: &PollerConfig) -> Self {
        Self {
            api,
            interval: Duration::from_secs(config.poll_interval.max(1)),
            cache: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: impl Listener + 'static) -> SharedListener {
        let shared: SharedListener = Arc::new(Mutex::new(Box::new(listener)));
        self.listeners.push(Arc::clone(&shared));
        shared
    }

    /// Last coarse status seen for `vin`.
    pub fn last_known(&self, vin: &str) -> Option<&VehicleSummary> {
        self.cache.get(vin)
    }

    /// Runs one listing cycle and returns the number of changes reported.
    ///
    /// Listeners for every change run as separate tasks; all of them have
    /// finished when this returns.
    pub async fn poll_once(&mut self) -> Result<usize, PollError> {
        msg_debug!(Message::PollingVehicles);
        let vehicles = self.api.list_vehicles().await?;

        let mut invocations = JoinSet::new();
        let mut changes = 0;

        for vehicle in vehicles {
            msg_debug!(Message::VehicleStatusFound {
                vin: vehicle.vin.clone(),
                state: vehicle.state_string(),
            });
            let previous = self.cache.insert(vehicle.vin.clone(), vehicle.clone());

            match detect_change(previous.as_ref(), &vehicle) {
                Ok(false) => msg_debug!(Message::NothingToReport(vehicle.vin.clone())),
                Ok(true) => {
                    changes += 1;
                    msg_info!(Message::VehicleStateChanged {
                        name: vehicle.display_name.clone(),
                        state: vehicle.state_string(),
                    });
                    for listener in &self.listeners {
                        let listener = Arc::clone(listener);
                        let vehicle = vehicle.clone();
                        invocations.spawn(async move {
                            listener.lock().on_change(&vehicle);
                        });
                    }
                }
                Err(PollError::MissingState { vin }) => msg_error!(Message::MissingVehicleState(vin)),
                Err(error) => msg_error!(Message::PollFailed(error.to_string())),
            }
        }

        while let Some(joined) = invocations.join_next().await {
            if let Err(error) = joined {
                msg_error!(Message::ListenerPanicked(error.to_string()));
            }
        }
        Ok(changes)
    }

    /// Polls until `cancel` fires. Listing failures are logged and retried on the next tick.
    pub async fn run(&mut self, cancel: &CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = self.poll_once().await {
                        msg_error!(Message::PollFailed(error.to_string()));
                    }
                    msg_debug!(Message::PollerSleeping(self.interval.as_secs()));
                }
                _ = cancel.cancelled() => {
                    msg_info!(Message::PollerStopped);
                    break;
                }
            }
        }
    }
}
