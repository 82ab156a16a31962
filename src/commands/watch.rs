use crate::libs::{config::Config, daemon};
use anyhow::Result;
use std::path::Path;

pub async fn cmd(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    daemon::run_with_signal_handling(config).await
}
