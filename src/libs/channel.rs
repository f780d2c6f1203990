//! Release channel model and version tag parsing.
//!
//! The managed server is published on two channels. Stable builds carry
//! tags of the form `N.N.YYYYMMDD`; nightly builds use the same form with a
//! `-nightly` suffix, or the bare rolling tag `nightly`. The `YYYYMMDD`
//! segment of a versioned tag implies the build's release date.
//!
//! Staleness arithmetic works in whole UTC calendar days: two timestamps on
//! the same UTC date are zero hours apart, timestamps one UTC day apart are
//! 24 hours apart, regardless of clock time or local timezone.

use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker suffix identifying nightly release tags.
pub const NIGHTLY_MARKER: &str = "nightly";

/// A nightly build older than this is considered stale and worth refreshing.
pub const STALENESS_THRESHOLD_HOURS: i64 = 25;

/// Release track of an installed or requested build.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Nightly,
}

impl Channel {
    /// Derives the channel from a release tag.
    ///
    /// A tag whose last dash-separated component is the literal `nightly`
    /// (including the bare rolling tag `nightly` itself) belongs to the
    /// nightly channel; everything else is stable.
    pub fn from_tag(tag: &str) -> Channel {
        if tag == NIGHTLY_MARKER || tag.ends_with(&format!("-{}", NIGHTLY_MARKER)) {
            Channel::Nightly
        } else {
            Channel::Stable
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "stable"),
            Channel::Nightly => write!(f, "nightly"),
        }
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Ok(Channel::Stable),
            "nightly" => Ok(Channel::Nightly),
            other => Err(msg_error_anyhow!(Message::InvalidReleaseTag(other.to_string()))),
        }
    }
}

/// Channel and implied release date decoded from a version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub channel: Channel,
    /// Release date implied by the `YYYYMMDD` tag segment. The bare rolling
    /// `nightly` tag carries no date of its own.
    pub released: Option<NaiveDate>,
}

/// Parses a release tag of the form `N.N.YYYYMMDD[-nightly]` or `nightly`.
pub fn parse_tag(tag: &str) -> Result<TagInfo> {
    let channel = Channel::from_tag(tag);
    let version = tag.strip_suffix(&format!("-{}", NIGHTLY_MARKER)).unwrap_or(tag);

    if version == NIGHTLY_MARKER {
        return Ok(TagInfo { channel, released: None });
    }

    let mut parts = version.split('.');
    let (major, minor, date) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), Some(date), None) => (major, minor, date),
        _ => return Err(msg_error_anyhow!(Message::InvalidReleaseTag(tag.to_string()))),
    };
    if major.parse::<u32>().is_err() || minor.parse::<u32>().is_err() {
        return Err(msg_error_anyhow!(Message::InvalidReleaseTag(tag.to_string())));
    }

    let released = NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| msg_error_anyhow!(Message::InvalidReleaseTag(tag.to_string())))?;

    Ok(TagInfo {
        channel,
        released: Some(released),
    })
}

/// Hours between two timestamps, counted in whole UTC calendar days.
///
/// Time of day is discarded on both sides, so the result is always a
/// multiple of 24 and independent of the local timezone.
pub fn diff_in_hours(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days() * 24
}

/// Hours elapsed from a bare release date to a timestamp, same day rules.
pub fn hours_since_date(now: DateTime<Utc>, released: NaiveDate) -> i64 {
    diff_in_hours(now, released.and_time(NaiveTime::MIN).and_utc())
}
