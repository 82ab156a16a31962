//! Per-vehicle recording session.
//!
//! A session samples one vehicle at the cadence picked by the activity
//! classifier and stores a snapshot per sample:
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌────────┐   ┌────────────────┐
//! │  fetch  │──▶│ classify │──▶│ insert │──▶│ idle countdown │
//! └─────────┘   └──────────┘   └────────┘   └────────────────┘
//!      ▲                                       │         │
//!      │          sleep(poll interval)         │    expired
//!      └───────────────────────────────────────┘         ▼
//!                                                       done
//! ```
//!
//! The idle budget is `idle_time_before_sleep / idle_sampling_frequency`
//! samples (30 with the defaults). A non-idle sample refills the budget, an
//! idle sample spends one, and the session ends right after storing the
//! sample that spends the last one.
//!
//! Only one session may run per VIN. A second start is rejected with
//! [`RecordError::AlreadyRecording`] before anything is fetched.

use crate::api::VehicleApi;
use crate::db::storage::{Storage, StorageError};
use crate::libs::activity::classify;
use crate::libs::fetcher::{FetchError, ResilientFetcher};
use crate::libs::messages::Message;
use crate::libs::snapshot::Snapshot;
use crate::libs::vehicle::VehicleSummary;
use crate::{msg_error, msg_info};
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("VIN {vin} is already being recorded")]
    AlreadyRecording { vin: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("storage {operation} failed for VIN {vin}: {source}")]
    Storage {
        vin: String,
        operation: &'static str,
        #[source]
        source: StorageError,
    },
}

/// How a session ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The idle budget ran out.
    IdleExpired { samples: u64 },
    /// The cancellation token fired.
    Cancelled,
}

/// Idle timings, in seconds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RecorderConfig {
    pub idle_time_before_sleep: u64,
    pub idle_sampling_frequency: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            idle_time_before_sleep: 300,
            idle_sampling_frequency: 10,
        }
    }
}

impl RecorderConfig {
    pub fn sampling_frequency(&self) -> Duration {
        Duration::from_secs(self.idle_sampling_frequency)
    }

    /// Number of consecutive idle samples tolerated, at least one.
    pub fn idle_budget(&self) -> u64 {
        match self.idle_sampling_frequency {
            0 => 1,
            frequency => (self.idle_time_before_sleep / frequency).max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleCountdown {
    budget: u64,
    remaining: u64,
}

impl IdleCountdown {
    pub fn new(budget: u64) -> Self {
        let budget = budget.max(1);
        Self {
            budget,
            remaining: budget,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.budget;
    }

    /// Spends one idle sample. Returns `true` when the budget is exhausted.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }
}

/// VINs with a running session.
#[derive(Debug, Clone, Default)]
pub struct ActiveSessions {
    vins: Arc<Mutex<HashSet<String>>>,
}

impl ActiveSessions {
    /// Marks `vin` as recording, or `None` if it already is.
    pub fn try_acquire(&self, vin: &str) -> Option<SessionGuard> {
        if !self.vins.lock().insert(vin.to_string()) {
            return None;
        }
        Some(SessionGuard {
            sessions: self.clone(),
            vin: vin.to_string(),
        })
    }

    pub fn contains(&self, vin: &str) -> bool {
        self.vins.lock().contains(vin)
    }
}

/// Clears the recording mark of its VIN when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    sessions: ActiveSessions,
    vin: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.vins.lock().remove(&self.vin);
    }
}

pub struct Recorder<A: VehicleApi, S: Storage> {
    fetcher: ResilientFetcher<A>,
    storage: Arc<S>,
    config: RecorderConfig,
    sessions: ActiveSessions,
}

impl<A: VehicleApi, S: Storage> Clone for Recorder<A, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

impl<A: VehicleApi, S: Storage> Recorder<A, S> {
    pub fn new(fetcher: ResilientFetcher<A>, storage: Arc<S>, config: RecorderConfig) -> Self {
        Self {
            fetcher,
            storage,
            config,
            sessions: ActiveSessions::default(),
        }
    }

    pub fn is_recording(&self, vin: &str) -> bool {
        self.sessions.contains(vin)
    }

    pub fn sessions(&self) -> &ActiveSessions {
        &self.sessions
    }

    /// Records `vehicle` until it has been idle for the configured time, a
    /// fetch or storage error occurs, or `cancel` fires.
    pub async fn record_while_in_use(
        &self,
        vehicle: &VehicleSummary,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, RecordError> {
        let Some(_guard) = self.sessions.try_acquire(&vehicle.vin) else {
            msg_error!(Message::RecorderNotReentrant(vehicle.vin.clone()));
            return Err(RecordError::AlreadyRecording {
                vin: vehicle.vin.clone(),
            });
        };

        msg_info!(Message::RecordingStarted(vehicle.vin.clone()));
        let result = self.run_session(vehicle, cancel).await;

        match &result {
            Ok(SessionEnd::IdleExpired { .. }) => msg_info!(Message::RecordingDone(vehicle.vin.clone())),
            Ok(SessionEnd::Cancelled) => msg_info!(Message::RecordingCancelled(vehicle.vin.clone())),
            Err(error) => msg_error!(Message::RecordingStopped {
                vin: vehicle.vin.clone(),
                error: error.to_string(),
            }),
        }
        result
    }

    async fn run_session(&self, vehicle: &VehicleSummary, cancel: &CancellationToken) -> Result<SessionEnd, RecordError> {
        let sampling_frequency = self.config.sampling_frequency();
        let mut countdown = IdleCountdown::new(self.config.idle_budget());
        let mut samples: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Ok(SessionEnd::Cancelled);
            }

            let data = match self.fetcher.fetch(vehicle, cancel).await {
                Ok(data) => data,
                Err(FetchError::Cancelled { .. }) => return Ok(SessionEnd::Cancelled),
                Err(error) => return Err(error.into()),
            };

            let classification = classify(&data, sampling_frequency);
            let snapshot = Snapshot::new(&data, &classification, Utc::now());
            self.storage.insert(snapshot).await.map_err(|source| RecordError::Storage {
                vin: vehicle.vin.clone(),
                operation: "insert",
                source,
            })?;
            samples += 1;

            if classification.begin_idle_countdown {
                if countdown.tick() {
                    return Ok(SessionEnd::IdleExpired { samples });
                }
                msg_info!(Message::RecordingEndsIn {
                    vin: vehicle.vin.clone(),
                    remaining: countdown.remaining(),
                });
            } else {
                countdown.reset();
            }

            tokio::select! {
                _ = tokio::time::sleep(classification.poll_interval) => {}
                _ = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
            }
        }
    }
}
