//! Update orchestration for the managed language-server binary.
//!
//! On every invocation the orchestrator re-derives the installed channel
//! from persisted state, reads the desired channel live from configuration,
//! and settles on exactly one of three outcomes: leave the installation
//! alone, reinstall the latest stable release, or fetch and install the
//! latest nightly artifact. Any path that installs something ends in a hard
//! process restart, which never returns.
//!
//! ## Decision table
//!
//! | Installed | Desired | Action |
//! |-----------|---------|--------|
//! | stable    | stable  | nothing |
//! | nightly   | stable  | confirm, reinstall latest stable, restart |
//! | stable    | nightly | confirm, fetch+install nightly, restart |
//! | nightly   | nightly | if the installed nightly is at least 25 hours old (whole UTC days), confirm and fetch+install with a staleness guard |
//!
//! Before the table is evaluated, a stable installation clears any
//! lingering nightly release date from persisted state.
//!
//! An explicit `server.path` in the configuration opts out of all of this:
//! manually built servers are never touched.
//!
//! ## Failure policy
//!
//! Everything inside the guarded fetch+install procedure is caught at its
//! boundary and reported with channel and repository context; the user
//! stays on the working installation and no restart happens. Failures in
//! the surrounding decision logic (configuration or state reads, a nightly
//! installation without a persisted release date) propagate to the
//! top-level handler.

use crate::libs::channel::{hours_since_date, Channel, STALENESS_THRESHOLD_HOURS};
use crate::libs::config::Config;
use crate::libs::data_storage::{server_binary_name, DataStorage};
use crate::libs::messages::Message;
use crate::libs::release::{self, ArtifactDescriptor, ArtifactReleaseInfo};
use crate::libs::restart;
use crate::libs::state::PersistedState;
use crate::{msg_error, msg_info, msg_print, msg_warning};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use flate2::read::GzDecoder;
use parking_lot::Mutex;
use reqwest::Client;
use std::fs::{self, File};
use std::path::Path;
use tar::Archive;
use thiserror::Error;

/// Consistency failures the orchestrator can hit.
///
/// These describe persisted state that contradicts what the current flow
/// already observed; they are never repaired silently.
#[derive(Debug, Error, PartialEq)]
pub enum UpdateError {
    #[error("nightly channel is active but no release date is persisted")]
    MissingReleaseDate,
    #[error("persisted release date changed while this update was in flight; another instance raced this one")]
    ConcurrentStateChange,
    #[error("downloaded archive does not contain the server binary")]
    BinaryNotFoundInArchive,
}

/// Outcome of one evaluation of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the installation as it is.
    Nothing,
    /// Install the latest stable release over the current nightly.
    ReinstallStable,
    /// Fetch and install the latest nightly artifact. `verify_newer` is set
    /// on the staleness path, where the fetched release date must be
    /// re-checked against persisted state before downloading.
    FetchNightly { verify_newer: bool },
}

/// Evaluates the channel decision table.
///
/// Pure in all inputs so the table is testable without touching the
/// network, the prompt surface, or the state file. `persisted` is the
/// release date of the installed build; `force` skips the staleness window
/// on the nightly-to-nightly path.
pub fn decide(current: Channel, desired: Channel, persisted: Option<NaiveDate>, now: DateTime<Utc>, force: bool) -> Result<Decision> {
    match (current, desired) {
        (Channel::Stable, Channel::Stable) => Ok(Decision::Nothing),
        (Channel::Nightly, Channel::Stable) => Ok(Decision::ReinstallStable),
        (Channel::Stable, Channel::Nightly) => Ok(Decision::FetchNightly { verify_newer: false }),
        (Channel::Nightly, Channel::Nightly) => {
            let installed = persisted.ok_or(UpdateError::MissingReleaseDate)?;
            if force || hours_since_date(now, installed) >= STALENESS_THRESHOLD_HOURS {
                Ok(Decision::FetchNightly { verify_newer: true })
            } else {
                Ok(Decision::Nothing)
            }
        }
    }
}

/// Pre-download check on the nightly staleness path.
///
/// Re-verifies persisted state after the network fetch: if another process
/// advanced the release date since this invocation started, the two raced
/// and the flow fails; if the fetched release is no newer than what is
/// installed, the whole procedure aborts silently.
pub struct StalenessGuard<'a> {
    state: &'a PersistedState,
    /// Release date observed when the decision was made.
    observed: Option<NaiveDate>,
}

impl<'a> StalenessGuard<'a> {
    pub fn new(state: &'a PersistedState, observed: Option<NaiveDate>) -> Self {
        Self { state, observed }
    }

    /// Returns `false` to abort without side effects, or an error when the
    /// persisted date no longer matches what this flow observed.
    pub fn check(&self, info: &ArtifactReleaseInfo) -> Result<bool> {
        let persisted = self.state.release_date()?;
        if persisted != self.observed {
            return Err(UpdateError::ConcurrentStateChange.into());
        }
        if Some(info.released) == persisted {
            msg_info!(Message::NightlyUpToDate(info.released.to_string()));
            return Ok(false);
        }
        Ok(true)
    }
}

/// The update orchestrator.
///
/// One instance per invocation; the re-entrancy flag rejects a nested
/// fetch+install while one is already in flight in this process.
pub struct Updater {
    client: Client,
    config: Config,
    state: PersistedState,
    in_flight: Mutex<()>,
    force: bool,
}

impl Updater {
    pub fn new(force: bool) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            config: Config::read()?,
            state: PersistedState::new()?,
            in_flight: Mutex::new(()),
            force,
        })
    }

    /// Claims the in-flight flag for one fetch+install pass.
    ///
    /// Returns `None` while another pass in this process holds it; the flag
    /// is released when the returned token drops, on every exit path.
    pub fn try_begin(&self) -> Option<parking_lot::MutexGuard<'_, ()>> {
        self.in_flight.try_lock()
    }

    /// Channel of the currently installed build, derived from the persisted
    /// release tag. A fresh installation without a tag counts as stable.
    pub fn current_channel(&self) -> Result<Channel> {
        Ok(match self.state.release_tag()? {
            Some(tag) => Channel::from_tag(&tag),
            None => Channel::Stable,
        })
    }

    /// Runs one pass of the channel decision procedure.
    pub async fn run(&self) -> Result<()> {
        // Manual installations opt out of all update management
        if let Some(path) = self.config.server_path() {
            msg_info!(Message::UpdateManagedExternally(path.display().to_string()));
            return Ok(());
        }

        let current = self.current_channel()?;
        let desired = self.config.update().channel;

        // A stable installation must not carry a nightly release date
        if current == Channel::Stable && self.state.release_date()?.is_some() {
            self.state.set_release_date(None)?;
        }

        let persisted = self.state.release_date()?;
        match decide(current, desired, persisted, Utc::now(), self.force)? {
            Decision::Nothing => {
                msg_info!(Message::NoUpdateRequired);
                Ok(())
            }
            Decision::ReinstallStable => {
                if !confirm(Message::ConfirmSwitchToStable)? {
                    msg_info!(Message::UpdateDeclined);
                    return Ok(());
                }
                let descriptor = ArtifactDescriptor::stable(&self.config.update());
                msg_print!(Message::ReinstallingStable(descriptor.repository()));
                self.fetch_and_install(descriptor, None).await
            }
            Decision::FetchNightly { verify_newer } => {
                let prompt = match persisted {
                    Some(date) if verify_newer => Message::ConfirmNightlyUpdate(date.to_string()),
                    _ => Message::ConfirmSwitchToNightly,
                };
                if !confirm(prompt)? {
                    msg_info!(Message::UpdateDeclined);
                    return Ok(());
                }
                let descriptor = ArtifactDescriptor::nightly(&self.config.update());
                let guard = verify_newer.then(|| StalenessGuard::new(&self.state, persisted));
                self.fetch_and_install(descriptor, guard).await
            }
        }
    }

    /// Guarded fetch+install procedure.
    ///
    /// A second invocation while one is in flight warns and no-ops instead
    /// of interleaving persisted-state writes with the first. All failures
    /// of the inner procedure are absorbed here and reported with channel
    /// and repository context; they never reach the caller.
    async fn fetch_and_install(&self, descriptor: ArtifactDescriptor, guard: Option<StalenessGuard<'_>>) -> Result<()> {
        let _token = match self.try_begin() {
            Some(token) => token,
            None => {
                msg_warning!(Message::UpdateAlreadyInFlight);
                return Ok(());
            }
        };

        let channel = if descriptor.tag.is_some() { Channel::Nightly } else { Channel::Stable };
        if let Err(error) = self.fetch_and_install_inner(&descriptor, guard).await {
            msg_error!(Message::UpdateFailed {
                channel: channel.to_string(),
                repository: descriptor.repository(),
                error: error.to_string(),
            });
        }
        Ok(())
    }

    /// The procedure itself: resolve, fetch, verify, download, install,
    /// persist, clean up, restart. Returns only when the guard aborted the
    /// flow; every successful install ends in a restart that does not
    /// return.
    async fn fetch_and_install_inner(&self, descriptor: &ArtifactDescriptor, guard: Option<StalenessGuard<'_>>) -> Result<()> {
        msg_print!(Message::FetchingReleaseInfo(
            descriptor.repository(),
            descriptor.tag.clone().unwrap_or_else(|| "latest".to_string())
        ));
        let info = release::fetch_release_info(&self.client, descriptor).await?;

        if let Some(guard) = guard {
            if !guard.check(&info)? {
                return Ok(());
            }
        }

        let storage = DataStorage::new();
        let dest_dir = storage.base_path().map_err(|e| anyhow!(e.to_string()))?;
        let archive_path = release::download(&self.client, &info, &dest_dir).await?;

        msg_print!(Message::InstallingArtifact(archive_path.display().to_string()));
        install_from_archive(&archive_path, &storage)?;

        self.state.set_release_date(if descriptor.tag.is_some() { Some(info.released) } else { None })?;
        self.state.set_release_tag(Some(info.tag.clone()))?;

        fs::remove_file(&archive_path)?;
        msg_info!(Message::ArtifactRemoved(archive_path.display().to_string()));
        msg_print!(Message::InstalledRelease {
            tag: info.tag,
            date: info.released.to_string(),
        });

        match restart::restart()? {}
    }
}

/// Unpacks a downloaded tar.gz archive over the managed server binary.
///
/// The previous binary is kept as a `.bak` sibling until the next install
/// overwrites it; any extra files in the archive land next to the binary.
fn install_from_archive(archive_path: &Path, storage: &DataStorage) -> Result<()> {
    let tar_gz = File::open(archive_path)?;
    let tar = GzDecoder::new(tar_gz);
    let mut archive = Archive::new(tar);

    let binary_path = storage.server_binary_path().map_err(|e| anyhow!(e.to_string()))?;
    let binary_backup = binary_path.with_extension("bak");
    let dest_dir = binary_path.parent().ok_or_else(|| anyhow!("server binary path has no parent"))?.to_path_buf();

    let mut replaced = false;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        if entry_path.ends_with(server_binary_name()) {
            if binary_path.exists() {
                fs::rename(&binary_path, &binary_backup)?;
            }
            entry.unpack(&binary_path)?;
            replaced = true;
        } else {
            let dest_path = dest_dir.join(&entry_path);
            entry.unpack(dest_path)?;
        }
    }

    if !replaced {
        return Err(UpdateError::BinaryNotFoundInArchive.into());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&binary_path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Asks a yes/no question, defaulting to no. No answer is a decline.
fn confirm(prompt: Message) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default()).with_prompt(prompt.to_string()).default(false).interact_opt()?;
    Ok(answer.unwrap_or(false))
}
