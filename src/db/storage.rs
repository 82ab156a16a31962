//! Storage collaborator of the recording engine.
//!
//! Recording sessions only see the [`Storage`] trait. Which backend sits
//! behind it is decided once at startup from [`StorageConfig`]:
//!
//! - **SQLite** ([`Snapshots`]): the default, a local file in the data directory
//! - **InfluxDB** ([`InfluxDb`]): write-only time series over HTTP

use super::influx::InfluxDb;
use super::snapshots::Snapshots;
use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::snapshot::Snapshot;
use crate::msg_print;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
    #[error("no snapshots stored")]
    Empty,
    #[error("cannot decode stored snapshot: {0}")]
    Decode(String),
    #[error("cannot open storage: {0}")]
    Open(String),
}

pub trait Storage: Send + Sync + 'static {
    /// Persists one snapshot. Ownership passes to the backend.
    fn insert(&self, snapshot: Snapshot) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Most recent snapshot by timestamp.
    fn query_latest(&self) -> impl Future<Output = Result<Snapshot, StorageError>> + Send;
}

/// Backend selection as stored in the configuration file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Sqlite {
        /// Database file; defaults to `carwatch.db` in the data directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    Influxdb {
        address: String,
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
        database: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite { path: None }
    }
}

impl StorageConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "storage".to_string(),
            name: "Storage".to_string(),
        }
    }

    pub fn init(config: &Option<StorageConfig>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or_default();

        msg_print!(Message::ConfigModuleStorage);

        let backends = ["SQLite", "InfluxDB"];
        let current = match config {
            StorageConfig::Sqlite { .. } => 0,
            StorageConfig::Influxdb { .. } => 1,
        };
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptStorageBackend.to_string())
            .items(&backends)
            .default(current)
            .interact()?;

        if selection == 0 {
            let default_path = match &config {
                StorageConfig::Sqlite { path: Some(path) } => path.display().to_string(),
                _ => String::new(),
            };
            let path: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSqlitePath.to_string())
                .default(default_path)
                .allow_empty(true)
                .interact_text()?;
            return Ok(StorageConfig::Sqlite {
                path: (!path.trim().is_empty()).then(|| PathBuf::from(path.trim())),
            });
        }

        let (address, username, password, database) = match config {
            StorageConfig::Influxdb {
                address,
                username,
                password,
                database,
            } => (address, username, password, database),
            StorageConfig::Sqlite { .. } => ("http://localhost:8086".to_string(), String::new(), String::new(), "carwatch".to_string()),
        };

        Ok(StorageConfig::Influxdb {
            address: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptInfluxAddress.to_string())
                .default(address)
                .interact_text()?,
            username: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptInfluxUsername.to_string())
                .default(username)
                .allow_empty(true)
                .interact_text()?,
            password: Password::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptInfluxPassword.to_string())
                .allow_empty_password(true)
                .interact()
                .map(|entered| if entered.is_empty() { password } else { entered })?,
            database: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptInfluxDatabase.to_string())
                .default(database)
                .interact_text()?,
        })
    }
}

/// Storage backend chosen at startup.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Sqlite(Snapshots),
    Influx(InfluxDb),
}

impl StorageBackend {
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        match config {
            StorageConfig::Sqlite { path } => Ok(StorageBackend::Sqlite(Snapshots::open(path.as_deref())?)),
            StorageConfig::Influxdb {
                address,
                username,
                password,
                database,
            } => Ok(StorageBackend::Influx(InfluxDb::new(address, username, password, database))),
        }
    }
}

impl Storage for StorageBackend {
    async fn insert(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        match self {
            StorageBackend::Sqlite(sqlite) => sqlite.insert(snapshot).await,
            StorageBackend::Influx(influx) => influx.insert(snapshot).await,
        }
    }

    async fn query_latest(&self) -> Result<Snapshot, StorageError> {
        match self {
            StorageBackend::Sqlite(sqlite) => sqlite.query_latest().await,
            StorageBackend::Influx(influx) => influx.query_latest().await,
        }
    }
}
