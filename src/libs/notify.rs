//! Notification delivery.
//!
//! The listener chain reports greetings, state changes and finished
//! recording sessions through a [`Notifier`]. Delivery failures are logged by
//! the caller and never escalated.

use crate::api::pushover::{Pushover, PushoverConfig};
use crate::libs::messages::Message;
use crate::msg_info;
use reqwest::StatusCode;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification rejected with status {0}")]
    Rejected(StatusCode),
}

pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, title: &str, body: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        msg_info!(Message::NotificationLogged {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Notifier selected from configuration.
#[derive(Debug, Clone)]
pub enum Notifications {
    Pushover(Pushover),
    Log(LogNotifier),
}

impl Notifications {
    /// Pushover when configured, the log otherwise.
    pub fn from_config(config: &Option<PushoverConfig>) -> Self {
        match config {
            Some(pushover) => Notifications::Pushover(Pushover::new(pushover)),
            None => Notifications::Log(LogNotifier),
        }
    }
}

impl Notifier for Notifications {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        match self {
            Notifications::Pushover(pushover) => pushover.notify(title, body).await,
            Notifications::Log(log) => log.notify(title, body).await,
        }
    }
}
