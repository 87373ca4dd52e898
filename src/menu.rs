//! Builds the flat channel directory consumed by the sidebar menu and emits
//! it as the `js/menu_data.js` ES module.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::pages::write_atomic;
use crate::schema::{is_reserved_dir_name, ChannelDirectoryEntry, OUTPUT_FILENAME};

pub const MENU_DATA_FILENAME: &str = "menu_data.js";
const MENU_DATA_PREFIX: &str = "export const menuData = ";

pub fn menu_data_path(root: &Path) -> PathBuf {
    root.join("js").join(MENU_DATA_FILENAME)
}

/// One entry per top-level directory that is not a reserved utility name, in
/// filesystem iteration order. Sorting happens client-side at render time.
pub fn collect_channels(root: &Path) -> Result<Vec<ChannelDirectoryEntry>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("failed to read root directory {}", root.display()))?;

    let mut channels = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !entry.path().is_dir() || is_reserved_dir_name(&name) {
            continue;
        }
        channels.push(ChannelDirectoryEntry {
            url: format!("./{name}/{OUTPUT_FILENAME}"),
            icon: format!("./{name}/img/icon.png"),
            name,
        });
    }
    Ok(channels)
}

/// Writes the menu data module. The payload is an ES export so the client
/// menu can import it without a fetch, which would not work from file://.
pub fn write_menu_data(root: &Path, channels: &[ChannelDirectoryEntry]) -> Result<PathBuf> {
    let js_dir = root.join("js");
    fs::create_dir_all(&js_dir)
        .with_context(|| format!("failed to create {}", js_dir.display()))?;

    let json = serde_json::to_string_pretty(channels)
        .context("failed to serialize menu data JSON")?;
    let path = menu_data_path(root);
    write_atomic(&path, format!("{MENU_DATA_PREFIX}{json};\n").as_bytes())?;
    Ok(path)
}

/// Reads the generated module back for the root page's static channel list.
/// A missing or malformed file degrades to an empty list with a warning.
pub fn read_menu_data(root: &Path) -> Vec<ChannelDirectoryEntry> {
    let path = menu_data_path(root);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => {
            warn!(path = %path.display(), "menu data module missing, static channel list omitted");
            return Vec::new();
        }
    };

    let json = contents
        .trim()
        .strip_prefix(MENU_DATA_PREFIX)
        .map(|rest| rest.trim_end_matches(';'))
        .unwrap_or_default();
    match serde_json::from_str(json) {
        Ok(channels) => channels,
        Err(error) => {
            warn!(path = %path.display(), %error, "menu data module unparseable, static channel list omitted");
            Vec::new()
        }
    }
}
