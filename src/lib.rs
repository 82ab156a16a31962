//! # Carwatch - adaptive vehicle state recorder
//!
//! A command-line utility that watches the vehicles of an account and
//! records detailed snapshots while they are in use.
//!
//! ## Features
//!
//! - **State Monitoring**: Cheap periodic listing of every vehicle, with
//!   change detection on the coarse online/asleep/offline state
//! - **Adaptive Recording**: Sampling cadence follows the vehicle's activity,
//!   from one second while moving to ten seconds while parked
//! - **Resilient Fetching**: Exponential backoff with jitter on every remote call
//! - **Storage**: SQLite by default, InfluxDB line protocol as an alternative
//! - **Notifications**: Pushover, or plain log lines when it is not configured
//!
//! ## Usage
//!
//! ```rust,no_run
//! use carwatch::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
