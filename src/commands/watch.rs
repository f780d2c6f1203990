//! Watch command: reacts to configuration file changes.
//!
//! Polls the configuration file and compares snapshots. When a change to a
//! reload-required key is detected, the user is asked whether to restart
//! the process; accepting replaces the process, so the loop only continues
//! on decline or on changes to live-read keys.

use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;
use std::time::Duration;

/// Command-line arguments for the watch command.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds
    #[arg(short, long, default_value_t = 2)]
    interval: u64,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let mut current = Config::read()?;
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));

    msg_print!(Message::WatchStarted(args.interval));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fresh = Config::read()?;
                // handle_change does not return if a restart is accepted
                current.handle_change(&fresh)?;
                current = fresh;
            }
            _ = tokio::signal::ctrl_c() => {
                msg_info!(Message::WatchReceivedCtrlC);
                break;
            }
        }
    }

    msg_print!(Message::WatchStopped);
    Ok(())
}
