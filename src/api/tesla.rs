//! Owner API client for listing vehicles and fetching their telemetry.
//!
//! Every response is wrapped in a `{"response": ...}` envelope and requests
//! authenticate with a bearer token. Token refresh is not handled here: an
//! expired token surfaces as `ApiError::Status` with `401`.

use super::{ApiError, VehicleApi};
use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::vehicle::{VehicleData, VehicleSummary};
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://owner-api.teslamotors.com";
const VEHICLES_URL: &str = "api/1/vehicles";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Clone)]
pub struct Tesla {
    client: Client,
    config: ApiConfig,
}

impl Tesla {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), path);
        let response = self.client.get(&url).bearer_auth(&self.config.access_token).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
                url,
            });
        }
        Ok(response.json::<Envelope<T>>().await?.response)
    }
}

impl VehicleApi for Tesla {
    async fn list_vehicles(&self) -> Result<Vec<VehicleSummary>, ApiError> {
        self.get(VEHICLES_URL).await
    }

    async fn fetch_vehicle_data(&self, id: u64) -> Result<VehicleData, ApiError> {
        self.get(&format!("{}/{}/vehicle_data", VEHICLES_URL, id)).await
    }
}

/// Connection settings of the vehicle API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without the `/api/1` suffix.
    pub api_url: String,
    /// Bearer token. `CARWATCH_ACCESS_TOKEN` overrides it at load time.
    pub access_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "api".to_string(),
            name: "Vehicle API".to_string(),
        }
    }

    /// Prompts for the API settings, pre-filled with the current values.
    pub fn init(config: &Option<ApiConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();

        msg_print!(Message::ConfigModuleApi);

        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            access_token: Password::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptAccessToken.to_string())
                .allow_empty_password(!config.access_token.is_empty())
                .interact()
                .map(|token| if token.is_empty() { config.access_token } else { token })?,
        })
    }
}
