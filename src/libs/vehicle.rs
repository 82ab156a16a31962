//! Vehicle telemetry as reported by the vehicle API.
//!
//! Two shapes exist: the cheap [`VehicleSummary`] returned when listing all
//! vehicles (coarse online/asleep state) and the detailed [`VehicleData`]
//! fetched per vehicle while recording. Every field the API may omit is an
//! `Option`, so "not reported" never collapses into an empty string or zero.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Coarse connectivity state from the vehicle list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OnlineState {
    Online,
    Asleep,
    Offline,
    Other(String),
}

impl OnlineState {
    pub fn as_str(&self) -> &str {
        match self {
            OnlineState::Online => "online",
            OnlineState::Asleep => "asleep",
            OnlineState::Offline => "offline",
            OnlineState::Other(state) => state,
        }
    }
}

impl From<String> for OnlineState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "online" => OnlineState::Online,
            "asleep" => OnlineState::Asleep,
            "offline" => OnlineState::Offline,
            _ => OnlineState::Other(value),
        }
    }
}

impl From<OnlineState> for String {
    fn from(value: OnlineState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for OnlineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gear selector position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftState {
    Park,
    Reverse,
    Drive,
    Neutral,
    Other(String),
}

impl ShiftState {
    pub fn as_str(&self) -> &str {
        match self {
            ShiftState::Park => "P",
            ShiftState::Reverse => "R",
            ShiftState::Drive => "D",
            ShiftState::Neutral => "N",
            ShiftState::Other(code) => code,
        }
    }

    /// Reverse, Drive and Neutral count as "in gear".
    pub fn is_in_gear(&self) -> bool {
        matches!(self, ShiftState::Reverse | ShiftState::Drive | ShiftState::Neutral)
    }
}

impl From<String> for ShiftState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "P" => ShiftState::Park,
            "R" => ShiftState::Reverse,
            "D" => ShiftState::Drive,
            "N" => ShiftState::Neutral,
            _ => ShiftState::Other(value),
        }
    }
}

impl From<ShiftState> for String {
    fn from(value: ShiftState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ShiftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Charger state as reported by the charge telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargingState {
    Disconnected,
    Starting,
    Charging,
    Complete,
    Stopped,
    NoPower,
    Other(String),
}

impl ChargingState {
    pub fn as_str(&self) -> &str {
        match self {
            ChargingState::Disconnected => "Disconnected",
            ChargingState::Starting => "Starting",
            ChargingState::Charging => "Charging",
            ChargingState::Complete => "Complete",
            ChargingState::Stopped => "Stopped",
            ChargingState::NoPower => "NoPower",
            ChargingState::Other(state) => state,
        }
    }

    /// Energy is flowing or about to.
    pub fn is_active(&self) -> bool {
        matches!(self, ChargingState::Charging | ChargingState::Starting)
    }
}

impl From<String> for ChargingState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Disconnected" => ChargingState::Disconnected,
            "Starting" => ChargingState::Starting,
            "Charging" => ChargingState::Charging,
            "Complete" => ChargingState::Complete,
            "Stopped" => ChargingState::Stopped,
            "NoPower" => ChargingState::NoPower,
            _ => ChargingState::Other(value),
        }
    }
}

impl From<ChargingState> for String {
    fn from(value: ChargingState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChargingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the vehicle list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: u64,
    pub vin: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub state: Option<OnlineState>,
}

impl VehicleSummary {
    /// State for display purposes, `<unknown>` when the API sent none.
    pub fn state_string(&self) -> String {
        match &self.state {
            Some(state) => state.to_string(),
            None => "<unknown>".to_string(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state == Some(OnlineState::Online)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    #[serde(default, deserialize_with = "non_empty")]
    pub shift_state: Option<ShiftState>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub heading: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    #[serde(default, deserialize_with = "non_empty")]
    pub charging_state: Option<ChargingState>,
    #[serde(default)]
    pub battery_level: i64,
    #[serde(default)]
    pub battery_range: f64,
    #[serde(default)]
    pub charge_limit_soc: i64,
    #[serde(default)]
    pub charger_voltage: Option<f64>,
    #[serde(default)]
    pub charger_actual_current: Option<f64>,
    #[serde(default)]
    pub charger_pilot_current: Option<f64>,
    #[serde(default)]
    pub time_to_full_charge: Option<f64>,
    #[serde(default)]
    pub charge_miles_added_rated: f64,
    #[serde(default)]
    pub charge_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    #[serde(default)]
    pub sentry_mode: Option<bool>,
    #[serde(default)]
    pub center_display_state: Option<i64>,
    #[serde(default)]
    pub odometer: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    #[serde(default)]
    pub is_climate_on: Option<bool>,
}

/// Detailed telemetry of one vehicle at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub state: Option<OnlineState>,
    #[serde(default)]
    pub drive_state: DriveState,
    #[serde(default)]
    pub charge_state: ChargeState,
    #[serde(default)]
    pub vehicle_state: VehicleState,
    #[serde(default)]
    pub climate_state: ClimateState,
}

/// Maps `null` and `""` to `None`, any other string through `T::from`.
fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(T::from))
}

