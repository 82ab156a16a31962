pub mod init;
pub mod latest;
pub mod track;
pub mod vehicles;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init,
    #[command(about = "Watch vehicles and record them while in use")]
    Watch,
    #[command(about = "Track one vehicle at a slow adaptive rate", arg_required_else_help = true)]
    Track(track::TrackArgs),
    #[command(about = "Show the latest stored snapshot")]
    Latest,
    #[command(about = "List vehicles of the account")]
    Vehicles,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Configuration file to use instead of the one in the data directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = cli.config.as_deref();
        match cli.command {
            Commands::Init => init::cmd(config),
            Commands::Watch => watch::cmd(config).await,
            Commands::Track(args) => track::cmd(config, args).await,
            Commands::Latest => latest::cmd(config).await,
            Commands::Vehicles => vehicles::cmd(config).await,
        }
    }
}
