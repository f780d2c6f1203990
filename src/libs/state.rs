//! Durable key/value state persisted across process restarts.
//!
//! The update pipeline records two facts about the installed server build:
//! the tag it was installed from and, for nightly builds, its release date.
//! Both live in a small JSON document in the application data directory.
//!
//! Getters always re-read the file rather than caching, because another
//! process instance may have advanced the state in the meantime; the
//! staleness-guard path in the updater depends on observing such writes.
//! Every get and set is logged through `msg_debug!`, since no in-memory
//! history survives a restart and the log is the only way to reconstruct
//! what happened across one.

use crate::libs::data_storage::DataStorage;
use crate::msg_debug;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const STATE_FILE_NAME: &str = "state.json";

/// On-disk shape of the persisted state document.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StateDocument {
    /// Release date of the installed build; present only on the nightly
    /// channel, cleared when the installation returns to stable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,

    /// Tag the installed build was downloaded under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_tag: Option<String>,
}

/// Typed accessor over the durable state file.
pub struct PersistedState {
    path: PathBuf,
}

impl PersistedState {
    pub fn new() -> Result<Self> {
        let path = DataStorage::new().get_path(STATE_FILE_NAME).map_err(|e| anyhow!(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn release_date(&self) -> Result<Option<NaiveDate>> {
        let value = self.load()?.release_date;
        msg_debug!(format!("state get release_date = {:?}", value));
        Ok(value)
    }

    pub fn set_release_date(&self, value: Option<NaiveDate>) -> Result<()> {
        msg_debug!(format!("state set release_date = {:?}", value));
        let mut doc = self.load()?;
        doc.release_date = value;
        self.store(&doc)
    }

    pub fn release_tag(&self) -> Result<Option<String>> {
        let value = self.load()?.release_tag;
        msg_debug!(format!("state get release_tag = {:?}", value));
        Ok(value)
    }

    pub fn set_release_tag(&self, value: Option<String>) -> Result<()> {
        msg_debug!(format!("state set release_tag = {:?}", value));
        let mut doc = self.load()?;
        doc.release_tag = value;
        self.store(&doc)
    }

    fn load(&self) -> Result<StateDocument> {
        if !self.path.exists() {
            return Ok(StateDocument::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the document and syncs it to disk before returning, so that
    /// dependent logic never proceeds on an unflushed write.
    fn store(&self, doc: &StateDocument) -> Result<()> {
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(&file, doc)?;
        file.sync_all()?;
        Ok(())
    }
}
