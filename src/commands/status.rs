//! Status command: shows what the update pipeline believes is installed.

use crate::libs::channel::{parse_tag, Channel};
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::state::PersistedState;
use crate::libs::view::View;
use crate::{msg_print, msg_warning};
use anyhow::{anyhow, Result};

/// Renders the installed channel, persisted release metadata, and the
/// resolved server binary location.
pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let state = PersistedState::new()?;
    let storage = DataStorage::new();

    let release_tag = state.release_tag()?;
    let installed = match &release_tag {
        Some(tag) => Channel::from_tag(tag),
        None => Channel::Stable,
    };
    // Stable installs persist no release date, but their tag implies one
    let release_date = match state.release_date()? {
        Some(date) => Some(date),
        None => release_tag.as_deref().and_then(|tag| parse_tag(tag).ok()).and_then(|info| info.released),
    };
    let managed_binary = storage.server_binary_path().map_err(|e| anyhow!(e.to_string()))?;

    msg_print!(Message::StatusHeader);
    View::status(
        installed,
        config.update().channel,
        release_tag.clone(),
        release_date.map(|d| d.to_string()),
        config.server_path().map(|p| p.display().to_string()),
        managed_binary.display().to_string(),
    )
    .map_err(|e| anyhow!(e.to_string()))?;

    if release_tag.is_none() && config.server_path().is_none() && !managed_binary.exists() {
        msg_warning!(Message::ServerNotInstalled);
    }

    Ok(())
}
