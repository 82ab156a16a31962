//! Configuration file handling.
//!
//! Settings live in `config.json` in the platform data directory
//! (`~/.local/share/carwatch/carwatch` on Linux, `Application Support` on
//! macOS, `%LOCALAPPDATA%` on Windows) unless `--config` points elsewhere.
//! Every section is optional and falls back to its defaults, so a file
//! holding only the API token and one VIN is a complete configuration.
//!
//! ```json
//! {
//!   "api": { "api_url": "https://owner-api.teslamotors.com", "access_token": "..." },
//!   "vehicles": [{ "vin": "5YJ3E1EA7KF000001", "monitor": true }],
//!   "storage": { "type": "sqlite" },
//!   "recorder": { "idle_time_before_sleep": 300, "idle_sampling_frequency": 10 },
//!   "poller": { "poll_interval": 10, "quiet_startup": false }
//! }
//! ```
//!
//! `CARWATCH_ACCESS_TOKEN` in the environment (or `.env`) replaces the
//! stored token when the configuration is loaded with [`Config::load`].

use super::data_storage::DataStorage;
use crate::api::pushover::PushoverConfig;
use crate::api::tesla::ApiConfig;
use crate::db::storage::StorageConfig;
use crate::libs::fetcher::BackoffConfig;
use crate::libs::messages::Message;
use crate::libs::poller::PollerConfig;
use crate::libs::recorder::RecorderConfig;
use crate::{msg_bail_anyhow, msg_debug, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ACCESS_TOKEN_ENV: &str = "CARWATCH_ACCESS_TOKEN";

/// Entry of the module selection in the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VehicleConfig {
    pub vin: String,
    #[serde(default = "default_monitor")]
    pub monitor: bool,
}

fn default_monitor() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vehicles: Vec<VehicleConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushover: Option<PushoverConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorder: Option<RecorderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poller: Option<PollerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<BackoffConfig>,
}

impl Config {
    /// Path of the configuration file: `custom` if given, the data directory otherwise.
    pub fn path(custom: Option<&Path>) -> Result<PathBuf> {
        match custom {
            Some(path) => Ok(path.to_path_buf()),
            None => DataStorage::new().get_path(CONFIG_FILE_NAME),
        }
    }

    /// Reads the default configuration file.
    pub fn read() -> Result<Config> {
        Self::read_from(&Self::path(None)?)
    }

    /// Reads `path`, or returns defaults when it does not exist.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        msg_debug!(Message::ConfigLoaded(path.display().to_string()));
        Ok(config)
    }

    /// Reads the configuration used by the commands, with environment overrides applied.
    pub fn load(custom: Option<&Path>) -> Result<Config> {
        let mut config = Self::read_from(&Self::path(custom)?)?;
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            config.override_access_token(token);
        }
        Ok(config)
    }

    /// Replaces the API token, creating the API section if needed. Empty tokens are ignored.
    pub fn override_access_token(&mut self, token: String) {
        if token.trim().is_empty() {
            return;
        }
        let mut api = self.api.clone().unwrap_or_default();
        api.access_token = token;
        self.api = Some(api);
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path(None)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Checks what the watch command needs before it starts polling.
    pub fn validate(&self) -> Result<()> {
        match &self.api {
            Some(api) if !api.api_url.trim().is_empty() => {}
            _ => msg_bail_anyhow!(Message::ConfigMissingApi),
        }
        if self.vehicles.is_empty() {
            msg_bail_anyhow!(Message::ConfigNoVehicles);
        }
        if !self.vehicles.iter().any(|vehicle| vehicle.monitor) {
            msg_bail_anyhow!(Message::ConfigNoMonitoredVehicles);
        }

        let recorder = self.recorder_config();
        let poller = self.poller_config();
        let zero = [
            ("recorder.idle_time_before_sleep", recorder.idle_time_before_sleep),
            ("recorder.idle_sampling_frequency", recorder.idle_sampling_frequency),
            ("poller.poll_interval", poller.poll_interval),
        ];
        if let Some((name, _)) = zero.iter().find(|(_, value)| *value == 0) {
            msg_bail_anyhow!(Message::ConfigZeroInterval(name.to_string()));
        }
        self.validate_backoff()
    }

    /// Checks the retry schedule used by every remote fetch.
    pub fn validate_backoff(&self) -> Result<()> {
        let backoff = self.backoff_config();
        if !backoff.multiplier.is_finite() || backoff.multiplier < 1.0 {
            msg_bail_anyhow!(Message::ConfigInvalidBackoff(format!(
                "backoff.multiplier must be a finite number of at least 1, got {}",
                backoff.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&backoff.randomization_factor) {
            msg_bail_anyhow!(Message::ConfigInvalidBackoff(format!(
                "backoff.randomization_factor must be between 0 and 1, got {}",
                backoff.randomization_factor
            )));
        }
        if backoff.initial_interval_ms > backoff.max_interval_ms {
            msg_bail_anyhow!(Message::ConfigInvalidBackoff(format!(
                "backoff.initial_interval_ms ({}) exceeds backoff.max_interval_ms ({})",
                backoff.initial_interval_ms, backoff.max_interval_ms
            )));
        }
        Ok(())
    }

    pub fn api_config(&self) -> ApiConfig {
        self.api.clone().unwrap_or_default()
    }

    pub fn storage_config(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    pub fn recorder_config(&self) -> RecorderConfig {
        self.recorder.clone().unwrap_or_default()
    }

    pub fn poller_config(&self) -> PollerConfig {
        self.poller.clone().unwrap_or_default()
    }

    pub fn backoff_config(&self) -> BackoffConfig {
        self.backoff.clone().unwrap_or_default()
    }

    /// Interactive setup of the selected modules, starting from the file at `custom`.
    pub fn init(custom: Option<&Path>) -> Result<Self> {
        let mut config = Self::path(custom).and_then(|path| Self::read_from(&path)).unwrap_or_default();

        let modules = vec![
            ApiConfig::module(),
            ConfigModule {
                key: "vehicles".to_string(),
                name: "Vehicles".to_string(),
            },
            StorageConfig::module(),
            PushoverConfig::module(),
            ConfigModule {
                key: "timings".to_string(),
                name: "Timings".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "api" => config.api = Some(ApiConfig::init(&config.api)?),
                "vehicles" => config.vehicles = Self::init_vehicles(&config.vehicles)?,
                "storage" => config.storage = Some(StorageConfig::init(&config.storage)?),
                "pushover" => config.pushover = Some(PushoverConfig::init(&config.pushover)?),
                "timings" => {
                    let recorder = config.recorder_config();
                    let poller = config.poller_config();
                    msg_print!(Message::ConfigModuleTimings);
                    config.recorder = Some(RecorderConfig {
                        idle_time_before_sleep: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleTimeBeforeSleep.to_string())
                            .default(recorder.idle_time_before_sleep)
                            .interact_text()?,
                        idle_sampling_frequency: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleSamplingFrequency.to_string())
                            .default(recorder.idle_sampling_frequency)
                            .interact_text()?,
                    });
                    config.poller = Some(PollerConfig {
                        poll_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(poller.poll_interval)
                            .interact_text()?,
                        quiet_startup: poller.quiet_startup,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }

    fn init_vehicles(current: &[VehicleConfig]) -> Result<Vec<VehicleConfig>> {
        msg_print!(Message::ConfigModuleVehicles);

        let theme = ColorfulTheme::default();
        let mut vehicles = Vec::new();
        let mut defaults = current.iter();
        loop {
            let default = defaults.next();
            let mut vin_prompt = Input::<String>::with_theme(&theme).with_prompt(Message::PromptVin.to_string());
            if let Some(default) = default {
                vin_prompt = vin_prompt.default(default.vin.clone());
            }
            let vin = vin_prompt.interact_text()?;
            let monitor = Confirm::with_theme(&theme)
                .with_prompt(Message::PromptMonitorVehicle.to_string())
                .default(default.map(|vehicle| vehicle.monitor).unwrap_or(true))
                .interact()?;
            vehicles.push(VehicleConfig {
                vin: vin.trim().to_uppercase(),
                monitor,
            });

            let another = Confirm::with_theme(&theme)
                .with_prompt(Message::PromptAddAnotherVehicle.to_string())
                .default(false)
                .interact()?;
            if !another {
                return Ok(vehicles);
            }
        }
    }
}
