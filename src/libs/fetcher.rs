//! Retrying wrapper around the detailed vehicle fetch.
//!
//! Every failed call is retried after an exponentially growing, randomized
//! delay. With the default [`BackoffConfig`] there is no elapsed-time limit:
//! the fetcher keeps retrying until the call succeeds or the cancellation
//! token fires, so a flaky network never ends a recording session.
//!
//! ```text
//! attempt ─▶ Ok ──────────────────────────────▶ VehicleData
//!    │
//!    └─▶ Err ─▶ next_backoff() ─▶ None ───────▶ FetchError::GaveUp
//!                   │
//!                   └─▶ Some(delay) ─▶ log + notify ─▶ sleep(delay) ─▶ attempt
//! ```

use crate::api::{ApiError, VehicleApi};
use crate::libs::messages::Message;
use crate::libs::vehicle::{VehicleData, VehicleSummary};
use crate::{msg_debug, msg_error, msg_warning};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch for VIN {vin} was cancelled")]
    Cancelled { vin: String },
    #[error("gave up fetching VIN {vin} after {attempts} attempts: {source}")]
    GaveUp {
        vin: String,
        attempts: u32,
        #[source]
        source: ApiError,
    },
}

/// Exponential backoff schedule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay before the first retry, in milliseconds.
    pub initial_interval_ms: u64,
    pub multiplier: f64,
    /// Each delay is drawn from `interval * (1 ± randomization_factor)`.
    pub randomization_factor: f64,
    /// Cap of the un-randomized interval, in milliseconds.
    pub max_interval_ms: u64,
    /// Total time after which retrying stops. `None` retries forever.
    pub max_elapsed_ms: Option<u64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            multiplier: 2.0,
            randomization_factor: 0.2,
            max_interval_ms: 120_000,
            max_elapsed_ms: None,
        }
    }
}

/// Running state of one retry sequence.
#[derive(Debug)]
pub struct ExponentialBackoff {
    config: BackoffConfig,
    current_interval: Duration,
    started: Instant,
}

impl ExponentialBackoff {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            config: config.clone(),
            current_interval: Duration::from_millis(config.initial_interval_ms),
            started: Instant::now(),
        }
    }

    /// Restarts the schedule from the initial interval.
    pub fn reset(&mut self) {
        self.current_interval = Duration::from_millis(self.config.initial_interval_ms);
        self.started = Instant::now();
    }

    /// Delay before the next attempt, or `None` once the elapsed-time limit is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.config.max_elapsed_ms {
            if self.started.elapsed() >= Duration::from_millis(max_elapsed) {
                return None;
            }
        }

        let delay = self.randomize(self.current_interval);
        self.current_interval = scale(self.current_interval, self.config.multiplier.max(1.0), self.max_interval());
        Some(delay)
    }

    fn max_interval(&self) -> Duration {
        Duration::from_millis(self.config.max_interval_ms)
    }

    fn randomize(&self, interval: Duration) -> Duration {
        let factor = self.config.randomization_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return interval;
        }
        let factor = factor.min(1.0);
        let spread = rand::thread_rng().gen_range(-factor..=factor);
        scale(interval, 1.0 + spread, Duration::MAX)
    }
}

/// `interval * factor`, saturating at `ceiling` instead of overflowing.
fn scale(interval: Duration, factor: f64, ceiling: Duration) -> Duration {
    Duration::try_from_secs_f64(interval.as_secs_f64() * factor)
        .unwrap_or(ceiling)
        .min(ceiling)
}

/// Fetches vehicle telemetry, retrying failures with exponential backoff.
#[derive(Debug)]
pub struct ResilientFetcher<A: VehicleApi> {
    api: Arc<A>,
    backoff: BackoffConfig,
}

impl<A: VehicleApi> Clone for ResilientFetcher<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            backoff: self.backoff.clone(),
        }
    }
}

impl<A: VehicleApi> ResilientFetcher<A> {
    pub fn new(api: Arc<A>, backoff: BackoffConfig) -> Self {
        Self { api, backoff }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Fetches detailed data for `vehicle`, logging every retry.
    pub async fn fetch(&self, vehicle: &VehicleSummary, cancel: &CancellationToken) -> Result<VehicleData, FetchError> {
        self.fetch_notify(vehicle, cancel, |_, _| {}).await
    }

    /// Like [`fetch`](Self::fetch), also calling `notify` with the error and
    /// the chosen delay right after each retry is logged.
    pub async fn fetch_notify<F>(
        &self,
        vehicle: &VehicleSummary,
        cancel: &CancellationToken,
        mut notify: F,
    ) -> Result<VehicleData, FetchError>
    where
        F: FnMut(&ApiError, Duration),
    {
        let mut backoff = ExponentialBackoff::new(&self.backoff);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let error = tokio::select! {
                result = self.api.fetch_vehicle_data(vehicle.id) => match result {
                    Ok(data) => return Ok(data),
                    Err(error) => error,
                },
                _ = cancel.cancelled() => return Err(self.cancelled(vehicle)),
            };

            let Some(delay) = backoff.next_backoff() else {
                msg_error!(Message::FetchGaveUp {
                    vin: vehicle.vin.clone(),
                    attempts,
                });
                return Err(FetchError::GaveUp {
                    vin: vehicle.vin.clone(),
                    attempts,
                    source: error,
                });
            };

            msg_warning!(Message::FetchRetrying {
                vin: vehicle.vin.clone(),
                delay_ms: delay.as_millis(),
                error: error.to_string(),
            });
            notify(&error, delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(self.cancelled(vehicle)),
            }
        }
    }

    fn cancelled(&self, vehicle: &VehicleSummary) -> FetchError {
        msg_debug!(Message::FetchCancelled(vehicle.vin.clone()));
        FetchError::Cancelled {
            vin: vehicle.vin.clone(),
        }
    }
}
