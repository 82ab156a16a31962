use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use std::path::Path;

pub fn cmd(config_path: Option<&Path>) -> Result<()> {
    let config = Config::init(config_path)?;
    config.save_to(&Config::path(config_path)?)?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
