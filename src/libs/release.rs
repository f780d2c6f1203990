//! Release metadata fetching and artifact download.
//!
//! Talks to the GitHub releases API of the configured server repository.
//! Nightly builds live under the rolling `nightly` tag; the stable reinstall
//! path asks for the latest published release instead.

use crate::libs::channel::NIGHTLY_MARKER;
use crate::libs::config::UpdateConfig;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_print};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
struct Release {
    tag_name: String,
    published_at: DateTime<Utc>,
    assets: Vec<Asset>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Asset {
    browser_download_url: String,
    name: String,
}

/// Addressing information for a downloadable release artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDescriptor {
    pub repo_owner: String,
    pub repo_name: String,
    /// Platform-specific fragment the asset name must contain.
    pub file_name: String,
    /// Release tag to query; `None` selects the latest published release.
    pub tag: Option<String>,
}

/// Metadata of a concrete release resolved from a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactReleaseInfo {
    pub tag: String,
    /// Authoritative release date reported by the repository.
    pub released: NaiveDate,
    pub name: String,
    pub download_url: String,
}

impl ArtifactDescriptor {
    /// Descriptor for the rolling nightly artifact of the configured
    /// repository.
    pub fn nightly(update: &UpdateConfig) -> Self {
        Self {
            repo_owner: update.repo_owner.clone(),
            repo_name: update.repo_name.clone(),
            file_name: platform_file_name(),
            tag: Some(NIGHTLY_MARKER.to_string()),
        }
    }

    /// Descriptor for the latest published stable release.
    pub fn stable(update: &UpdateConfig) -> Self {
        Self {
            repo_owner: update.repo_owner.clone(),
            repo_name: update.repo_name.clone(),
            file_name: platform_file_name(),
            tag: None,
        }
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    fn release_url(&self) -> String {
        match &self.tag {
            Some(tag) => format!("https://api.github.com/repos/{}/{}/releases/tags/{}", self.repo_owner, self.repo_name, tag),
            None => format!("https://api.github.com/repos/{}/{}/releases/latest", self.repo_owner, self.repo_name),
        }
    }
}

/// Platform fragment used to pick the right release asset.
fn platform_file_name() -> String {
    let arch = env::consts::ARCH;
    let os = match env::consts::OS {
        "windows" => "pc-windows-msvc",
        "macos" => "apple-darwin",
        _ => "unknown-linux-gnu",
    };
    format!("lsup-server-{}-{}", arch, os)
}

/// Queries release metadata for a descriptor.
///
/// Fails when the release cannot be fetched or carries no asset matching
/// the platform file name.
pub async fn fetch_release_info(client: &Client, descriptor: &ArtifactDescriptor) -> Result<ArtifactReleaseInfo> {
    msg_debug!(format!("fetching release metadata from {}", descriptor.release_url()));
    let release = client
        .get(descriptor.release_url())
        .header("User-Agent", "lsup")
        .send()
        .await?
        .error_for_status()?
        .json::<Release>()
        .await?;

    let asset = release
        .assets
        .iter()
        .find(|asset| asset.name.contains(&descriptor.file_name))
        .ok_or_else(|| anyhow!("no release asset matches '{}' in {}", descriptor.file_name, descriptor.repository()))?;

    Ok(ArtifactReleaseInfo {
        tag: release.tag_name,
        released: release.published_at.date_naive(),
        name: asset.name.clone(),
        download_url: asset.browser_download_url.clone(),
    })
}

/// Downloads the artifact into `dest_dir` with progress feedback.
///
/// Returns the path of the downloaded file. Partial files are left behind
/// on failure; the caller deletes the artifact after installation anyway.
pub async fn download(client: &Client, info: &ArtifactReleaseInfo, dest_dir: &Path) -> Result<PathBuf> {
    msg_print!(Message::DownloadingArtifact(info.name.clone()));

    let mut response = client.get(&info.download_url).header("User-Agent", "lsup").send().await?.error_for_status()?;
    let total = response.content_length().unwrap_or(0);
    let dest_path = dest_dir.join(&info.name);
    let mut out = File::create(&dest_path)?;

    let mut received: u64 = 0;
    let mut last_reported: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        out.write_all(&chunk)?;
        received += chunk.len() as u64;
        // Report in megabyte steps to keep the log readable
        if received - last_reported >= 1024 * 1024 {
            msg_debug!(format!("{}", Message::DownloadProgress(received, total)));
            last_reported = received;
        }
    }
    out.flush()?;

    msg_print!(Message::DownloadCompleted(dest_path.display().to_string()));
    Ok(dest_path)
}
