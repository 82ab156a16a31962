//! Display implementation for carwatch messages.
//!
//! Central place for all message text. Variants carrying data interpolate
//! their parameters here so call sites never format log strings themselves.
//!
//! ## Usage Integration
//!
//! ```rust
//! use carwatch::{msg_info, msg_error};
//! use carwatch::libs::messages::Message;
//!
//! msg_info!(Message::RecordingStarted("5YJ3E1EA7KF000001".to_string()));
//! msg_error!(Message::PollFailed("timeout".to_string()));
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigLoaded(path) => format!("Loaded configuration from {}", path),
            Message::ConfigMissingApi => "Vehicle API is not configured. Run `carwatch init` first.".to_string(),
            Message::ConfigNoVehicles => "No vehicles configured. Add at least one VIN with `carwatch init`.".to_string(),
            Message::ConfigNoMonitoredVehicles => "All configured vehicles have monitoring disabled".to_string(),
            Message::ConfigZeroInterval(name) => format!("Setting '{}' must be greater than zero", name),
            Message::ConfigInvalidBackoff(reason) => format!("Invalid retry settings: {}", reason),
            Message::ConfigModuleApi => "Vehicle API settings".to_string(),
            Message::ConfigModuleVehicles => "Vehicles".to_string(),
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::ConfigModulePushover => "Pushover notifications".to_string(),
            Message::ConfigModuleTimings => "Polling and recording timings".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptApiUrl => "Enter the vehicle API URL".to_string(),
            Message::PromptAccessToken => "Enter the API access token".to_string(),
            Message::PromptVin => "Enter the vehicle VIN".to_string(),
            Message::PromptMonitorVehicle => "Monitor this vehicle?".to_string(),
            Message::PromptAddAnotherVehicle => "Add another vehicle?".to_string(),
            Message::PromptStorageBackend => "Select a storage backend".to_string(),
            Message::PromptSqlitePath => "Enter the SQLite database path (empty for default)".to_string(),
            Message::PromptInfluxAddress => "Enter the InfluxDB address".to_string(),
            Message::PromptInfluxUsername => "Enter the InfluxDB username".to_string(),
            Message::PromptInfluxPassword => "Enter the InfluxDB password".to_string(),
            Message::PromptInfluxDatabase => "Enter the InfluxDB database".to_string(),
            Message::PromptPushoverToken => "Enter the Pushover application token".to_string(),
            Message::PromptPushoverUser => "Enter the Pushover user key".to_string(),
            Message::PromptIdleTimeBeforeSleep => "Idle time before recording stops (seconds)".to_string(),
            Message::PromptIdleSamplingFrequency => "Sampling interval while idle (seconds)".to_string(),
            Message::PromptPollInterval => "Vehicle list polling interval (seconds)".to_string(),

            // === VEHICLE API MESSAGES ===
            Message::VehicleFound(vin) => format!("Found vehicle with VIN {}", vin),
            Message::VehicleNotFound(vin) => format!("No vehicle found with VIN {} in the account", vin),
            Message::NoVehiclesFound => "No vehicles found in the account".to_string(),
            Message::VehiclesHeader => "Vehicles".to_string(),

            // === FETCHER MESSAGES ===
            Message::FetchRetrying { vin, delay_ms, error } => {
                format!("Error fetching VIN {}. Retrying in {}ms: {}", vin, delay_ms, error)
            }
            Message::FetchCancelled(vin) => format!("Fetch for VIN {} cancelled", vin),
            Message::FetchGaveUp { vin, attempts } => format!("Giving up fetching VIN {} after {} attempts", vin, attempts),

            // === ACTIVITY MESSAGES ===
            Message::VehicleActivity {
                vin,
                activity,
                interval_secs,
            } => format!("Car {} is {} (next sample in {}s)", vin, activity, interval_secs),

            // === RECORDER MESSAGES ===
            Message::RecordingStarted(vin) => format!("Recording started for VIN {}", vin),
            Message::RecordingEndsIn { vin, remaining } => format!("Recording ends for car {} in {} samples", vin, remaining),
            Message::RecordingDone(vin) => format!("Done monitoring VIN {}", vin),
            Message::RecordingCancelled(vin) => format!("Recording for VIN {} cancelled", vin),
            Message::RecordingStopped { vin, error } => format!("Stopped recording loop for VIN {}: {}", vin, error),
            Message::RecorderNotReentrant(vin) => format!("Recorder not reentrant (car VIN {})", vin),
            Message::SnapshotSaved { vin, timestamp } => format!("Saved record for {} with timestamp {}", vin, timestamp),

            // === POLLER MESSAGES ===
            Message::PollingVehicles => "Polling vehicle status".to_string(),
            Message::PollFailed(error) => format!("Error while fetching vehicles status: {}", error),
            Message::VehicleStatusFound { vin, state } => format!("Found vehicle status for VIN {}: {}", vin, state),
            Message::NothingToReport(vin) => format!("Nothing to report for VIN {}", vin),
            Message::VehicleStateChanged { name, state } => format!("Vehicle {} state changed: {}", name, state),
            Message::MissingVehicleState(vin) => format!("Vehicle {} reported no state after a known state", vin),
            Message::ListenerPanicked(error) => format!("Listener panicked: {}", error),
            Message::PollerSleeping(secs) => format!("Sleeping poller for {}s", secs),
            Message::PollerStopped => "Poller stopped".to_string(),

            // === LISTENER MESSAGES ===
            Message::ListenerCount { name, count } => format!("Count for {} is {}", name, count),
            Message::IgnoredMonitoringDisabled(vin) => format!("Ignored update for VIN {}. Monitoring disabled in config.", vin),
            Message::IgnoredFirstChange(vin) => format!("Ignoring first state report for VIN {}", vin),
            Message::NotRecordingOffline(name) => format!("Not recording metrics for {} because it's not online", name),
            Message::AlreadyRecording(vin) => format!("VIN {} is already being recorded", vin),
            Message::GreetingTitle(state) => format!("Car's state: {}", state),
            Message::GreetingBody(name) => format!("Monitoring for {} is ready!", name),
            Message::ChangeTitle { name, state } => format!("Vehicle {} state changed to {}", name, state),
            Message::DoneMonitoringTitle(name) => format!("Done monitoring: {}", name),
            Message::SessionSucceeded => "Success!".to_string(),
            Message::SessionFailed(error) => format!("Error: {}", error),
            Message::SessionCancelled => "Stopped at shutdown".to_string(),
            Message::NotificationFailed(error) => format!("Cannot send notification: {}", error),
            Message::NotificationLogged { title, body } => format!("[{}] {}", title, body),

            // === TRACKER MESSAGES ===
            Message::RefreshDriving(secs) => format!("Fast refreshing due to use: {}s", secs),
            Message::RefreshCharging(secs) => format!("Refreshing due to charging (not fully charged): {}s", secs),
            Message::RefreshChargeComplete => "Plugged in, but fully charged. Not using charging refresh rate.".to_string(),
            Message::RefreshParked(secs) => format!("Normal refreshing, car likely parked: {}s", secs),
            Message::TrackerStarted(vin) => format!("Tracking VIN {}", vin),
            Message::TrackerStopped(vin) => format!("Tracker for VIN {} stopped", vin),
            Message::TrackerConsumerGone(vin) => format!("Nobody is consuming snapshots for VIN {}", vin),

            // === STORAGE MESSAGES ===
            Message::StorageOpened(desc) => format!("Using storage: {}", desc),
            Message::InfluxWriteSucceeded => "Writing to InfluxDB successful".to_string(),
            Message::NoSnapshotsStored => "Cannot find any records! Is the database empty?".to_string(),
            Message::SnapshotHeader(vin) => format!("Latest snapshot for {}", vin),
            Message::SnapshotStoreFailed(error) => format!("Cannot store snapshot: {}", error),

            // === WATCHER MESSAGES ===
            Message::WatcherStarting(count) => format!("Watching {} vehicle(s). Press Ctrl+C to exit.", count),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Warning: Signal handling not supported on this platform".to_string(),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),
            Message::MonitorExitedNormally => "Monitor exited normally".to_string(),
            Message::MonitorShuttingDown => "Shutting down monitor...".to_string(),
            Message::MonitorTaskPanicked(error) => format!("Monitor task panicked: {}", error),
        };
        write!(f, "{}", text)
    }
}
