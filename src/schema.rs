use serde::{Deserialize, Serialize};

/// Top-level directory names that hold site machinery, never channel content.
pub const RESERVED_DIR_NAMES: [&str; 4] = ["css", "img", "js", "stuff"];

/// Per-channel explicit display order, one video id per line.
pub const ORDERING_FILE_NAME: &str = "video_ids_for_download.txt";

pub const OUTPUT_FILENAME: &str = "index.html";
pub const PLACEHOLDER_THUMBNAIL: &str = "placeholder.png";

/// Grid batch sizes: the root index pages more aggressively than a single
/// channel because it aggregates every channel at once.
pub const ROOT_VIDEOS_PER_PAGE: usize = 50;
pub const CHANNEL_VIDEOS_PER_PAGE: usize = 30;

pub fn is_reserved_dir_name(name: &str) -> bool {
    RESERVED_DIR_NAMES.contains(&name)
}

/// One render-ready video entry. Serialized camelCase because the client
/// scripts consume the embedded JSON verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub id: String,
    pub title: String,
    pub channel: String,
    /// Truncated display form (100 chars + ellipsis).
    pub description: String,
    /// Untruncated text, searched by the client filter.
    pub full_description: String,
    /// Localized display date, "N/A" when the upload date is unknown.
    pub date: String,
    /// Page link, relative to the page embedding this descriptor.
    pub link: String,
    /// Resolved thumbnail: local file, remote fallback, or placeholder.
    pub thumbnail: String,
}

/// One sidebar menu entry, emitted into `js/menu_data.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDirectoryEntry {
    pub name: String,
    pub url: String,
    pub icon: String,
}
