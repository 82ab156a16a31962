use crate::api::{tesla::Tesla, VehicleApi};
use crate::libs::{config::Config, messages::Message, view::View};
use crate::{msg_bail_anyhow, msg_info, msg_print};
use anyhow::Result;
use std::path::Path;

pub async fn cmd(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let Some(api_config) = &config.api else {
        msg_bail_anyhow!(Message::ConfigMissingApi);
    };

    let vehicles = Tesla::new(api_config).list_vehicles().await?;
    if vehicles.is_empty() {
        msg_info!(Message::NoVehiclesFound);
        return Ok(());
    }

    msg_print!(Message::VehiclesHeader, true);
    View::vehicles(&vehicles);
    Ok(())
}
