//! Remote collaborators of the recording engine.
//!
//! - **Vehicle API**: lists vehicles with their coarse state and fetches
//!   detailed telemetry per vehicle ([`VehicleApi`], implemented by [`Tesla`])
//! - **Pushover**: push notifications about state changes and finished
//!   recording sessions ([`Pushover`])
//!
//! The engine only depends on the [`VehicleApi`] trait, so tests and
//! alternative backends plug in without touching the poller or recorder.
//!
//! ```rust,no_run
//! use carwatch::api::{tesla::{Tesla, ApiConfig}, VehicleApi};
//!
//! # async fn run() -> Result<(), carwatch::api::ApiError> {
//! let client = Tesla::new(&ApiConfig::default());
//! for vehicle in client.list_vehicles().await? {
//!     println!("{} is {}", vehicle.vin, vehicle.state_string());
//! }
//! # Ok(())
//! # }
//! ```

use crate::libs::messages::Message;
use crate::libs::vehicle::{VehicleData, VehicleSummary};
use crate::msg_info;
use reqwest::StatusCode;
use std::future::Future;
use thiserror::Error;

pub mod pushover;
pub mod tesla;

pub use pushover::{Pushover, PushoverConfig};
pub use tesla::{ApiConfig, Tesla};

/// Failures of a single vehicle API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
    #[error("no vehicle with VIN {0} in the account")]
    VehicleNotFound(String),
    #[error("vehicle API unavailable: {0}")]
    Unavailable(String),
}

/// Polling API of a vehicle account.
///
/// Calls must be idempotent from the caller's point of view: the fetcher
/// retries `fetch_vehicle_data` freely after a failure.
pub trait VehicleApi: Send + Sync + 'static {
    /// Lists every vehicle of the account with its coarse state.
    fn list_vehicles(&self) -> impl Future<Output = Result<Vec<VehicleSummary>, ApiError>> + Send;

    /// Fetches detailed telemetry for the vehicle with API id `id`.
    fn fetch_vehicle_data(&self, id: u64) -> impl Future<Output = Result<VehicleData, ApiError>> + Send;
}

/// Looks up a vehicle by VIN, ignoring case.
pub async fn find_vehicle<A: VehicleApi>(api: &A, vin: &str) -> Result<VehicleSummary, ApiError> {
    let vehicles = api.list_vehicles().await?;
    let vehicle = vehicles
        .into_iter()
        .find(|vehicle| vehicle.vin.eq_ignore_ascii_case(vin))
        .ok_or_else(|| ApiError::VehicleNotFound(vin.to_string()))?;
    msg_info!(Message::VehicleFound(vehicle.vin.clone()));
    Ok(vehicle)
}
