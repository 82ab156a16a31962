//! Activity classification of detailed vehicle telemetry.
//!
//! Picks what the vehicle is doing right now and how soon it should be
//! sampled again. Rules are checked in priority order and the first match
//! wins, so a car charging with sentry mode on is classified as `Charging`.
//!
//! | Priority | Condition                      | Activity     | Interval |
//! |----------|--------------------------------|--------------|----------|
//! | 1        | speed > 0                      | `Moving`     | 1s       |
//! | 2        | shift state R, D or N          | `InGear`     | 2s       |
//! | 3        | charging state Charging/Starting | `Charging` | 3s       |
//! | 4        | sentry mode on                 | `SentryMode` | 30s      |
//! | 5        | center display on              | `DisplayOn`  | 10s      |
//! | 6        | climate on                     | `ClimateOn`  | 30s      |
//! | 7        | otherwise                      | `Idle`       | idle sampling frequency |

use crate::libs::messages::Message;
use crate::libs::vehicle::VehicleData;
use crate::msg_info;
use std::fmt;
use std::time::Duration;

const MOVING_INTERVAL: Duration = Duration::from_secs(1);
const IN_GEAR_INTERVAL: Duration = Duration::from_secs(2);
const CHARGING_INTERVAL: Duration = Duration::from_secs(3);
const SENTRY_MODE_INTERVAL: Duration = Duration::from_secs(30);
const DISPLAY_ON_INTERVAL: Duration = Duration::from_secs(10);
const CLIMATE_ON_INTERVAL: Duration = Duration::from_secs(30);

/// Sampling interval used for idle vehicles unless configured otherwise.
pub const DEFAULT_IDLE_SAMPLING_FREQUENCY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Moving,
    InGear,
    Charging,
    SentryMode,
    DisplayOn,
    ClimateOn,
    Idle,
}

impl Activity {
    /// Free-text description stored with each snapshot.
    pub fn description(&self) -> &'static str {
        match self {
            Activity::Moving => "Moving",
            Activity::InGear => "In gear",
            Activity::Charging => "Charging",
            Activity::SentryMode => "Sentry mode",
            Activity::DisplayOn => "Display on",
            Activity::ClimateOn => "Climate on",
            Activity::Idle => "Idle",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of classifying one telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityClassification {
    pub activity: Activity,
    pub poll_interval: Duration,
    /// Set only for `Idle`: the recording session should count this sample
    /// towards its idle countdown.
    pub begin_idle_countdown: bool,
}

impl ActivityClassification {
    fn active(activity: Activity, poll_interval: Duration) -> Self {
        Self {
            activity,
            poll_interval,
            begin_idle_countdown: false,
        }
    }

    fn idle(poll_interval: Duration) -> Self {
        Self {
            activity: Activity::Idle,
            poll_interval,
            begin_idle_countdown: true,
        }
    }
}

/// Classifies `data`, using `idle_sampling_frequency` as the interval for idle vehicles.
pub fn classify(data: &VehicleData, idle_sampling_frequency: Duration) -> ActivityClassification {
    let classification = pick(data, idle_sampling_frequency);
    msg_info!(Message::VehicleActivity {
        vin: data.vin.clone(),
        activity: classification.activity.to_string(),
        interval_secs: classification.poll_interval.as_secs(),
    });
    classification
}

fn pick(data: &VehicleData, idle_sampling_frequency: Duration) -> ActivityClassification {
    if data.drive_state.speed.is_some_and(|speed| speed > 0.0) {
        return ActivityClassification::active(Activity::Moving, MOVING_INTERVAL);
    }
    if data.drive_state.shift_state.as_ref().is_some_and(|shift| shift.is_in_gear()) {
        return ActivityClassification::active(Activity::InGear, IN_GEAR_INTERVAL);
    }
    if data.charge_state.charging_state.as_ref().is_some_and(|state| state.is_active()) {
        return ActivityClassification::active(Activity::Charging, CHARGING_INTERVAL);
    }
    if data.vehicle_state.sentry_mode.unwrap_or(false) {
        return ActivityClassification::active(Activity::SentryMode, SENTRY_MODE_INTERVAL);
    }
    if data.vehicle_state.center_display_state.unwrap_or(0) != 0 {
        return ActivityClassification::active(Activity::DisplayOn, DISPLAY_ON_INTERVAL);
    }
    if data.climate_state.is_climate_on.unwrap_or(false) {
        return ActivityClassification::active(Activity::ClimateOn, CLIMATE_ON_INTERVAL);
    }
    ActivityClassification::idle(idle_sampling_frequency)
}
