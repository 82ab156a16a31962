use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::notify::{NotifyError, Notifier};
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MESSAGES_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Serialize)]
struct PushoverMessage<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: &'a str,
}

/// Push notification client for the Pushover service.
#[derive(Debug, Clone)]
pub struct Pushover {
    client: Client,
    config: PushoverConfig,
    url: String,
}

impl Pushover {
    pub fn new(config: &PushoverConfig) -> Self {
        Self::with_url(config, MESSAGES_URL)
    }

    /// Client posting to a different messages endpoint.
    pub fn with_url(config: &PushoverConfig, url: &str) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            url: url.to_string(),
        }
    }
}

impl Notifier for Pushover {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let payload = PushoverMessage {
            token: &self.config.token,
            user: &self.config.user,
            title,
            message: body,
        };
        let response = self.client.post(&self.url).form(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status()));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PushoverConfig {
    /// Application token.
    pub token: String,
    /// User or group key receiving the messages.
    pub user: String,
}

impl PushoverConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "pushover".to_string(),
            name: "Pushover".to_string(),
        }
    }

    pub fn init(config: &Option<PushoverConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();

        msg_print!(Message::ConfigModulePushover);

        Ok(Self {
            token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPushoverToken.to_string())
                .default(config.token)
                .interact_text()?,
            user: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPushoverUser.to_string())
                .default(config.user)
                .interact_text()?,
        })
    }
}
