//! Configuration management for the lsup application.
//!
//! Handles the settings that drive the managed language-server installation:
//! which binary to run, which feature flags to hand it, and which release
//! channel to track for updates. Configuration is stored as JSON in the
//! platform application data directory and is always read live from disk,
//! so a value is never served from a stale in-memory snapshot.
//!
//! ## Configuration Structure
//!
//! - **Server**: explicit binary path (opting out of update management),
//!   feature flags, static highlighting and inlay hint toggles
//! - **Update**: desired release channel and the release repository the
//!   update pipeline downloads from
//!
//! ## Change Handling
//!
//! A fixed set of keys ([`RELOAD_KEYS`]) takes effect only on process start:
//! the running server cannot pick them up mid-flight. When a change to one
//! of them is detected, the user is asked whether to restart immediately;
//! declining leaves the new value on disk for mechanisms that re-read
//! configuration live.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use lsup::libs::config::Config;
//!
//! # fn run() -> anyhow::Result<()> {
//! // Load existing configuration or create default
//! let config = Config::read()?;
//!
//! // Resolve the server binary the editor should launch
//! if let Some(path) = config.server_path() {
//!     println!("explicit server at {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

use super::data_storage::DataStorage;
use crate::libs::channel::Channel;
use crate::libs::messages::Message;
use crate::libs::restart;
use crate::{msg_info, msg_print};
use anyhow::{anyhow, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Dotted option names whose new values only apply after a full restart.
///
/// Everything else is read live by the code that needs it; these four feed
/// process-lifetime decisions (which binary was launched, with which flags)
/// and silently diverging from them would leave the running state lying.
pub const RELOAD_KEYS: [&str; 4] = ["server.path", "server.features", "server.static_highlighting", "server.inlay_hints"];

/// Represents a configurable module in the application.
///
/// Used during interactive setup to present the available sections and
/// route the selection to the matching wizard step.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Settings describing the language-server binary itself.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Explicit path to a user-supplied server binary.
    ///
    /// When set, the user manages the binary themselves (typically a local
    /// build) and the update pipeline performs no action at all. Tilde
    /// expansion applies when the path is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Feature flags passed to the server on startup.
    #[serde(default)]
    pub features: Vec<String>,

    /// Whether the server computes static syntax highlighting.
    #[serde(default = "default_enabled")]
    pub static_highlighting: bool,

    /// Whether the server emits inlay hints.
    #[serde(default = "default_enabled")]
    pub inlay_hints: bool,
}

fn default_enabled() -> bool {
    true
}

/// Settings for the update pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateConfig {
    /// Release channel the installation should track.
    pub channel: Channel,

    /// Owner of the release repository artifacts are downloaded from.
    pub repo_owner: String,

    /// Name of the release repository.
    pub repo_name: String,
}

/// Main configuration container for the entire application.
///
/// Each section is optional so a fresh installation works without any
/// configuration file at all; missing sections fall back to defaults at
/// the point of use.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Language-server binary settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Update channel and release repository settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            path: None,
            features: Vec::new(),
            static_highlighting: true,
            inlay_hints: true,
        }
    }
}

impl Default for UpdateConfig {
    /// Defaults to the stable channel of the project's own release
    /// repository, taken from the build-time package metadata.
    fn default() -> Self {
        UpdateConfig {
            channel: Channel::Stable,
            repo_owner: APP_METADATA_OWNER.to_string(),
            repo_name: APP_METADATA_SERVER_REPO.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config { server: None, update: None }
    }
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// Loads `config.json` from the platform data directory, falling back
    /// to the default configuration when no file exists yet. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME).map_err(|e| anyhow!(e.to_string()))?;

        // If no configuration file exists, return default configuration
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration to the filesystem.
    ///
    /// Writes pretty-printed JSON so the file stays hand-editable.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME).map_err(|e| anyhow!(e.to_string()))?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Effective server section, defaults applied.
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Effective update section, defaults applied.
    pub fn update(&self) -> UpdateConfig {
        self.update.clone().unwrap_or_default()
    }

    /// Explicit server binary path with tilde expansion applied, if one is
    /// configured.
    pub fn server_path(&self) -> Option<PathBuf> {
        self.server().path.as_deref().map(expand_tilde)
    }

    /// Dotted names of every recognized option whose value differs between
    /// the two snapshots.
    ///
    /// Comparison happens on effective values, so adding an explicit
    /// section that matches the defaults does not register as a change.
    pub fn changed_keys(&self, other: &Config) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let (before, after) = (self.server(), other.server());
        if before.path != after.path {
            changed.push("server.path");
        }
        if before.features != after.features {
            changed.push("server.features");
        }
        if before.static_highlighting != after.static_highlighting {
            changed.push("server.static_highlighting");
        }
        if before.inlay_hints != after.inlay_hints {
            changed.push("server.inlay_hints");
        }
        let (before, after) = (self.update(), other.update());
        if before.channel != after.channel {
            changed.push("update.channel");
        }
        if before.repo_owner != after.repo_owner {
            changed.push("update.repo_owner");
        }
        if before.repo_name != after.repo_name {
            changed.push("update.repo_name");
        }
        changed
    }

    /// Whether any of the given changed keys only takes effect on restart.
    pub fn requires_reload(changed: &[&str]) -> bool {
        changed.iter().any(|key| RELOAD_KEYS.contains(key))
    }

    /// Reacts to a detected configuration change.
    ///
    /// Re-reads nothing itself; callers pass the old and new snapshots. If
    /// a reload-required key changed, the user is asked whether to restart
    /// immediately. On an affirmative answer this function does not return:
    /// the process is replaced. Declining, or a change touching only
    /// live-read keys, is a no-op beyond an informational note.
    pub fn handle_change(&self, new: &Config) -> Result<()> {
        let changed = self.changed_keys(new);
        if changed.is_empty() {
            return Ok(());
        }
        msg_info!(Message::ConfigChangedKeys(changed.clone()));

        if !Self::requires_reload(&changed) {
            msg_info!(Message::ConfigChangeAppliedLive);
            return Ok(());
        }

        let reload_keys: Vec<&'static str> = changed.into_iter().filter(|key| RELOAD_KEYS.contains(key)).collect();
        let accepted = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfigReloadRequired(reload_keys).to_string())
            .default(true)
            .interact()?;

        if !accepted {
            msg_info!(Message::ConfigReloadDeclined);
            return Ok(());
        }

        match restart::restart()? {}
    }

    /// Runs an interactive configuration setup wizard.
    ///
    /// Presents the available sections, collects their settings with the
    /// current values as defaults, and returns the updated configuration
    /// ready for saving.
    pub fn init() -> Result<Self> {
        // Load existing configuration to use as defaults for the setup wizard
        let mut config = match Self::read() {
            Ok(config) => config,
            Err(_) => Config::default(),
        };

        let node_descriptions = vec![
            ConfigModule {
                key: "server".to_string(),
                name: "Server".to_string(),
            },
            ConfigModule {
                key: "update".to_string(),
                name: "Update".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "server" => {
                    let default = config.server.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleServer);

                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptServerPath.to_string())
                        .default(default.path.clone().unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;

                    let features: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptServerFeatures.to_string())
                        .default(default.features.join(","))
                        .allow_empty(true)
                        .interact_text()?;

                    config.server = Some(ServerConfig {
                        path: if path.trim().is_empty() { None } else { Some(path.trim().to_string()) },
                        features: features.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect(),
                        static_highlighting: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptStaticHighlighting.to_string())
                            .default(default.static_highlighting)
                            .interact()?,
                        inlay_hints: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInlayHints.to_string())
                            .default(default.inlay_hints)
                            .interact()?,
                    });
                }
                "update" => {
                    let default = config.update.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleUpdate);

                    let channel: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptUpdateChannel.to_string())
                        .default(default.channel.to_string())
                        .interact_text()?;

                    config.update = Some(UpdateConfig {
                        channel: channel.parse()?,
                        repo_owner: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRepoOwner.to_string())
                            .default(default.repo_owner)
                            .interact_text()?,
                        repo_name: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRepoName.to_string())
                            .default(default.repo_name)
                            .interact_text()?,
                    });
                }
                _ => {} // Unknown module keys are safely ignored
            }
        }

        Ok(config)
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        let home = env::var("HOME").or_else(|_| env::var("USERPROFILE")).unwrap_or_else(|_| ".".into());
        return PathBuf::from(path.replacen('~', &home, 1));
    }
    PathBuf::from(path)
}
