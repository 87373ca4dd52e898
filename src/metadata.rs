use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

pub const METADATA_SUFFIX: &str = ".info.json";
pub const CHANNEL_INFO_FILENAME: &str = "channel.info.json";

/// The slice of a yt-dlp `*.info.json` sidecar this generator cares about.
/// Sidecars carry dozens of other fields; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fulltitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 8-digit `YYYYMMDD` string.
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Remote thumbnail URL, the last-resort fallback when no local image exists.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Optional `channel.info.json` next to a channel's video folders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Loads the video descriptor sidecar from a video folder.
///
/// Returns `Ok(None)` both when no `*.info.json` exists and when one exists
/// but cannot be read or parsed: a single corrupt video must never abort the
/// surrounding directory walk.
pub fn read_video_metadata(video_dir: &Path) -> Result<Option<VideoMetadata>> {
    let Some(sidecar) = find_metadata_sidecar(video_dir)? else {
        return Ok(None);
    };

    let contents = match fs::read_to_string(&sidecar) {
        Ok(contents) => contents,
        Err(error) => {
            warn!(path = %sidecar.display(), %error, "skipping unreadable metadata sidecar");
            return Ok(None);
        }
    };

    match serde_json::from_str::<VideoMetadata>(&contents) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(error) => {
            warn!(path = %sidecar.display(), %error, "skipping unparseable metadata sidecar");
            Ok(None)
        }
    }
}

fn find_metadata_sidecar(video_dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(video_dir)
        .with_context(|| format!("failed to read video folder {}", video_dir.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", video_dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(METADATA_SUFFIX) && name != CHANNEL_INFO_FILENAME {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Loads `channel.info.json` from a channel folder, with the same lenient
/// policy as video sidecars: any failure degrades to defaults.
pub fn read_channel_info(channel_dir: &Path) -> ChannelInfo {
    let path = channel_dir.join(CHANNEL_INFO_FILENAME);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => {
            warn!(path = %path.display(), "no channel.info.json, using directory-name defaults");
            return ChannelInfo::default();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(info) => info,
        Err(error) => {
            warn!(path = %path.display(), %error, "unparseable channel.info.json, using defaults");
            ChannelInfo::default()
        }
    }
}

/// Renders an 8-digit `YYYYMMDD` upload date as the `d/m/yyyy` display form.
/// Anything unparseable renders as "N/A".
pub fn format_upload_date(upload_date: Option<&str>) -> String {
    let Some(raw) = upload_date else {
        return "N/A".to_owned();
    };
    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => date.format("%-d/%-m/%Y").to_string(),
        Err(_) => "N/A".to_owned(),
    }
}
