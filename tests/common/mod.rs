#![allow(dead_code)]

use carwatch::api::{ApiError, VehicleApi};
use carwatch::db::storage::{Storage, StorageError};
use carwatch::libs::notify::{NotifyError, Notifier};
use carwatch::libs::snapshot::Snapshot;
use carwatch::libs::vehicle::{
    ChargeState, ChargingState, ClimateState, DriveState, OnlineState, ShiftState, VehicleData, VehicleState, VehicleSummary,
};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const VIN: &str = "5YJ3E1EA7KF000001";
pub const OTHER_VIN: &str = "5YJ3E1EA7KF000002";

pub fn summary(id: u64, vin: &str, name: &str, state: Option<OnlineState>) -> VehicleSummary {
    VehicleSummary {
        id,
        vin: vin.to_string(),
        display_name: name.to_string(),
        state,
    }
}

pub fn online(vin: &str) -> VehicleSummary {
    summary(1, vin, "Eve", Some(OnlineState::Online))
}

/// Parked, unplugged, nothing on.
pub fn idle_data(vin: &str) -> VehicleData {
    VehicleData {
        id: 1,
        vin: vin.to_string(),
        display_name: "Eve".to_string(),
        state: Some(OnlineState::Online),
        drive_state: DriveState {
            shift_state: None,
            speed: None,
            latitude: 37.4,
            longitude: -122.1,
            heading: None,
        },
        charge_state: ChargeState {
            charging_state: Some(ChargingState::Disconnected),
            battery_level: 80,
            battery_range: 240.5,
            charge_limit_soc: 90,
            ..Default::default()
        },
        vehicle_state: VehicleState {
            sentry_mode: Some(false),
            center_display_state: Some(0),
            odometer: 12_345.6,
        },
        climate_state: ClimateState {
            is_climate_on: Some(false),
        },
    }
}

pub fn moving_data(vin: &str) -> VehicleData {
    let mut data = idle_data(vin);
    data.drive_state.shift_state = Some(ShiftState::Drive);
    data.drive_state.speed = Some(42.0);
    data
}

pub fn charging_data(vin: &str) -> VehicleData {
    let mut data = idle_data(vin);
    data.charge_state.charging_state = Some(ChargingState::Charging);
    data.charge_state.charger_voltage = Some(240.0);
    data.charge_state.charger_actual_current = Some(32.0);
    data.charge_state.charger_pilot_current = Some(32.0);
    data.charge_state.time_to_full_charge = Some(1.5);
    data.charge_state.charge_miles_added_rated = 12.0;
    data.charge_state.charge_rate = 25.0;
    data
}

/// Vehicle API answering from scripted responses.
///
/// Listings repeat the last scripted one once the script runs out. Detail
/// fetches fail with `Unavailable` once theirs runs out.
#[derive(Default)]
pub struct FakeApi {
    listings: Mutex<VecDeque<Vec<VehicleSummary>>>,
    last_listing: Mutex<Vec<VehicleSummary>>,
    data: Mutex<VecDeque<Result<VehicleData, String>>>,
    fetches: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_listing(&self, vehicles: Vec<VehicleSummary>) {
        self.listings.lock().push_back(vehicles);
    }

    pub fn push_data(&self, data: VehicleData) {
        self.data.lock().push_back(Ok(data));
    }

    pub fn push_failure(&self, reason: &str) {
        self.data.lock().push_back(Err(reason.to_string()));
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl VehicleApi for FakeApi {
    async fn list_vehicles(&self) -> Result<Vec<VehicleSummary>, ApiError> {
        if let Some(listing) = self.listings.lock().pop_front() {
            *self.last_listing.lock() = listing;
        }
        Ok(self.last_listing.lock().clone())
    }

    async fn fetch_vehicle_data(&self, _id: u64) -> Result<VehicleData, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.data.lock().pop_front() {
            Some(Ok(data)) => Ok(data),
            Some(Err(reason)) => Err(ApiError::Unavailable(reason)),
            None => Err(ApiError::Unavailable("script exhausted".to_string())),
        }
    }
}

/// In-memory storage, optionally failing every insert after `fail_after` successes.
#[derive(Default)]
pub struct FakeStorage {
    snapshots: Mutex<Vec<Snapshot>>,
    fail_after: Option<usize>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(successes: usize) -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            fail_after: Some(successes),
        }
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }
}

impl Storage for FakeStorage {
    async fn insert(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        let mut snapshots = self.snapshots.lock();
        if self.fail_after.is_some_and(|limit| snapshots.len() >= limit) {
            return Err(StorageError::Status {
                status: StatusCode::INSUFFICIENT_STORAGE,
                body: "disk full".to_string(),
            });
        }
        snapshots.push(snapshot);
        Ok(())
    }

    async fn query_latest(&self) -> Result<Snapshot, StorageError> {
        self.snapshots.lock().last().cloned().ok_or(StorageError::Empty)
    }
}

/// Notifier remembering every `(title, body)` it was asked to send.
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

impl Notifier for FakeNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().push((title.to_string(), body.to_string()));
        if self.fail {
            return Err(NotifyError::Rejected(StatusCode::BAD_REQUEST));
        }
        Ok(())
    }
}
