pub mod init;
pub mod status;
pub mod update;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Show the installed channel and persisted release state")]
    Status,
    #[command(about = "Check the update channel and install a new build if needed")]
    Update(update::UpdateArgs),
    #[command(about = "Watch the configuration file and prompt for restart on reload-required changes")]
    Watch(watch::WatchArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Status => status::cmd(),
            Commands::Update(args) => update::cmd(args).await,
            Commands::Watch(args) => watch::cmd(args).await,
        }
    }
}
