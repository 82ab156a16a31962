//! Storage-ready snapshot of a vehicle's state.
//!
//! A `Snapshot` is built once per successful fetch, never mutated afterwards
//! and handed to the storage backend by value.
//!
//! ## Charge session invariant
//!
//! The `charge_session` sub-record is `None` whenever the charger is
//! `Disconnected` (or the API did not report a charging state). In every
//! other case it is populated from the charge telemetry of the same sample.

use crate::libs::activity::ActivityClassification;
use crate::libs::vehicle::{ChargeState, ChargingState, ShiftState, VehicleData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Charger readings, present only while a charger is connected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeSession {
    pub voltage: Option<f64>,
    pub actual_current: Option<f64>,
    pub pilot_current: Option<f64>,
    pub time_to_full_charge: Option<f64>,
    pub charge_miles_added: f64,
    pub charge_rate: f64,
}

impl ChargeSession {
    /// Builds the sub-record from charge telemetry, `None` when no charger is connected.
    pub fn from_charge_state(charge: &ChargeState) -> Option<Self> {
        match &charge.charging_state {
            None | Some(ChargingState::Disconnected) => None,
            Some(_) => Some(Self {
                voltage: charge.charger_voltage,
                actual_current: charge.charger_actual_current,
                pilot_current: charge.charger_pilot_current,
                time_to_full_charge: charge.time_to_full_charge,
                charge_miles_added: charge.charge_miles_added_rated,
                charge_rate: charge.charge_rate,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bearings {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub vin: String,
    /// Coarse state the vehicle reported alongside the telemetry.
    pub wake_state: Option<String>,
    pub driving_state: Option<ShiftState>,
    pub bearings: Bearings,
    pub charging_state: Option<ChargingState>,
    pub battery_level: i64,
    pub range_left: f64,
    pub charge_limit_soc: i64,
    pub charge_session: Option<ChargeSession>,
    pub odometer: f64,
    pub activity: String,
}

impl Snapshot {
    /// Builds a snapshot of `data` taken at `timestamp`, described by `classification`.
    pub fn new(data: &VehicleData, classification: &ActivityClassification, timestamp: DateTime<Utc>) -> Self {
        Self::with_description(data, classification.activity.description(), timestamp)
    }

    /// Builds a snapshot with a free-text activity description.
    pub fn with_description(data: &VehicleData, activity: &str, timestamp: DateTime<Utc>) -> Self {
        let charge = &data.charge_state;
        Self {
            timestamp,
            name: data.display_name.clone(),
            vin: data.vin.clone(),
            wake_state: data.state.as_ref().map(|state| state.to_string()),
            driving_state: data.drive_state.shift_state.clone(),
            bearings: Bearings {
                latitude: data.drive_state.latitude,
                longitude: data.drive_state.longitude,
                speed: data.drive_state.speed,
            },
            charging_state: charge.charging_state.clone(),
            battery_level: charge.battery_level,
            range_left: charge.battery_range,
            charge_limit_soc: charge.charge_limit_soc,
            charge_session: ChargeSession::from_charge_state(charge),
            odometer: data.vehicle_state.odometer,
            activity: activity.to_string(),
        }
    }
}
