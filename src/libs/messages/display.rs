//! Display implementation for lsup application messages.
//!
//! Converts structured `Message` variants into the human-readable text shown
//! in the terminal. All user-facing wording lives here, in one place, so the
//! rest of the code deals only in typed variants.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::ConfigModuleUpdate => "Update settings".to_string(),
            Message::ConfigChangedKeys(keys) => format!("Configuration changed: {}", keys.join(", ")),
            Message::ConfigReloadRequired(keys) => {
                format!("Changes to {} take effect only after a restart. Restart now?", keys.join(", "))
            }
            Message::ConfigReloadDeclined => "Restart declined; the new values apply on the next start.".to_string(),
            Message::ConfigChangeAppliedLive => "Configuration change applied.".to_string(),

            // === WATCH MESSAGES ===
            Message::WatchStarted(secs) => format!("Watching configuration for changes (every {}s). Press Ctrl-C to stop.", secs),
            Message::WatchStopped => "Configuration watch stopped.".to_string(),
            Message::WatchReceivedCtrlC => "Received Ctrl-C, shutting down...".to_string(),

            // === UPDATE MESSAGES ===
            Message::UpdateManagedExternally(path) => {
                format!("Server binary is set explicitly ({}); update management is disabled.", path)
            }
            Message::NoUpdateRequired => "No update required.".to_string(),
            Message::UpdateAlreadyInFlight => "An update is already in progress, ignoring this invocation.".to_string(),
            Message::UpdateDeclined => "Update declined.".to_string(),
            Message::UpdateFailed { channel, repository, error } => {
                format!("Failed to update the {} channel from {}: {}", channel, repository, error)
            }
            Message::NightlyUpToDate(date) => {
                format!("The latest nightly ({}) is not newer than the installed build; nothing to do.", date)
            }
            Message::ReinstallingStable(repository) => format!("Reinstalling the latest stable release from {}...", repository),
            Message::FetchingReleaseInfo(repository, tag) => format!("Fetching release metadata for {} (tag '{}')...", repository, tag),
            Message::DownloadingArtifact(name) => format!("Downloading {}...", name),
            Message::DownloadProgress(received, total) => format!("Downloaded {} of {} bytes", received, total),
            Message::DownloadCompleted(path) => format!("Download completed: {}", path),
            Message::InstallingArtifact(path) => format!("Installing {}...", path),
            Message::InstalledRelease { tag, date } => format!("Installed release '{}' ({})", tag, date),
            Message::ArtifactRemoved(path) => format!("Removed downloaded artifact {}", path),
            Message::RestartingProcess => "Restarting...".to_string(),

            // === STATUS MESSAGES ===
            Message::StatusHeader => "Managed server status".to_string(),
            Message::ServerNotInstalled => "The managed server binary is not installed yet. Run 'lsup update' to install it.".to_string(),

            // === PROMPT MESSAGES ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptServerPath => "Explicit server binary path (leave empty for the managed binary)".to_string(),
            Message::PromptServerFeatures => "Server feature flags (comma separated)".to_string(),
            Message::PromptStaticHighlighting => "Enable static highlighting".to_string(),
            Message::PromptInlayHints => "Enable inlay hints".to_string(),
            Message::PromptUpdateChannel => "Release channel (stable/nightly)".to_string(),
            Message::PromptRepoOwner => "Release repository owner".to_string(),
            Message::PromptRepoName => "Release repository name".to_string(),
            Message::ConfirmSwitchToStable => "Switch back to the stable channel and reinstall the stable build?".to_string(),
            Message::ConfirmSwitchToNightly => "Switch to the nightly channel and install the latest nightly build?".to_string(),
            Message::ConfirmNightlyUpdate(date) => {
                format!("The installed nightly is from {}. Download the latest nightly build?", date)
            }

            // === ERROR MESSAGES ===
            Message::InvalidReleaseTag(tag) => format!("Unrecognized release tag '{}'", tag),
            Message::RestartFailed(error) => format!("Failed to restart the process: {}", error),
        };
        write!(f, "{}", text)
    }
}
