use crate::libs::update::Updater;
use anyhow::Result;
use clap::Args;

/// Command-line arguments for the update command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Skip the nightly staleness window and check for a new build now
    #[arg(short, long)]
    force: bool,
}

/// Executes one pass of the update channel decision procedure.
///
/// Any path that installs a new build ends in a process restart and does
/// not return here.
pub async fn cmd(args: UpdateArgs) -> Result<()> {
    let updater = Updater::new(args.force)?;
    updater.run().await
}
