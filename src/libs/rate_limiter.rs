//! Refresh cadence of the snapshot tracker.
//!
//! The limiter owns a single deadline. Each call to
//! [`RateLimiter::rate_limit`] waits for it, then picks the next interval
//! from the snapshot just taken:
//!
//! | Latest snapshot                          | Next interval |
//! |------------------------------------------|---------------|
//! | driving state reported                   | 15s           |
//! | charger connected, charge not `Complete` | 1min          |
//! | anything else                            | 30min         |
//!
//! The first deadline is 15 seconds after construction. Time spent between
//! two calls counts against the interval.

use crate::libs::messages::Message;
use crate::libs::snapshot::Snapshot;
use crate::libs::vehicle::ChargingState;
use crate::msg_info;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const FIRST_REFRESH: Duration = Duration::from_secs(15);
pub const DRIVING_REFRESH: Duration = Duration::from_secs(15);
pub const CHARGING_REFRESH: Duration = Duration::from_secs(60);
pub const NORMAL_REFRESH: Duration = Duration::from_secs(30 * 60);

/// Interval to wait after `latest` was taken.
pub fn next_interval(latest: &Snapshot) -> Duration {
    if latest.driving_state.is_some() {
        msg_info!(Message::RefreshDriving(DRIVING_REFRESH.as_secs()));
        return DRIVING_REFRESH;
    }
    if latest.charge_session.is_some() {
        if latest.charging_state == Some(ChargingState::Complete) {
            msg_info!(Message::RefreshChargeComplete);
        } else {
            msg_info!(Message::RefreshCharging(CHARGING_REFRESH.as_secs()));
            return CHARGING_REFRESH;
        }
    }
    msg_info!(Message::RefreshParked(NORMAL_REFRESH.as_secs()));
    NORMAL_REFRESH
}

#[derive(Debug)]
pub struct RateLimiter {
    deadline: Instant,
    interval: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            deadline: Instant::now() + FIRST_REFRESH,
            interval: FIRST_REFRESH,
        }
    }

    /// Interval of the pending deadline.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the pending deadline and schedules the next one from
    /// `latest`. Returns `false` if `cancel` fired first.
    pub async fn rate_limit(&mut self, latest: &Snapshot, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = tokio::time::sleep_until(self.deadline) => {}
            _ = cancel.cancelled() => return false,
        }

        self.interval = next_interval(latest);
        self.deadline = Instant::now() + self.interval;
        true
    }
}
