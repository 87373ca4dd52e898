//! Walks the archive tree and folds per-video metadata, on-disk assets, and
//! the optional explicit ordering file into render-ready descriptor
//! sequences for the channel and root pages.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::metadata::{format_upload_date, read_video_metadata, VideoMetadata};
use crate::schema::{
    is_reserved_dir_name, VideoDescriptor, ORDERING_FILE_NAME, OUTPUT_FILENAME,
    PLACEHOLDER_THUMBNAIL,
};

const DESCRIPTION_PREFIX_CHARS: usize = 100;
const MISSING_DESCRIPTION: &str = "Sin descripción.";

/// Display form plus the untruncated text kept for search. The display form
/// is always the 100-char prefix with an ellipsis suffix.
pub fn truncate_description(raw: Option<&str>) -> (String, String) {
    let full = match raw {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => MISSING_DESCRIPTION.to_owned(),
    };
    let prefix: String = full.chars().take(DESCRIPTION_PREFIX_CHARS).collect();
    (format!("{prefix}..."), full)
}

/// Reads the per-channel ordering override. A missing file is a soft
/// fallback to alphabetical order, not a failure.
pub fn read_ordering_file(channel_dir: &Path) -> Vec<String> {
    let path = channel_dir.join(ORDERING_FILE_NAME);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let ids: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect();
            debug!(path = %path.display(), count = ids.len(), "loaded ordering override");
            ids
        }
        Err(_) => {
            warn!(path = %path.display(), "no ordering file, falling back to alphabetical order");
            Vec::new()
        }
    }
}

fn title_key(descriptor: &VideoDescriptor) -> (String, String) {
    (descriptor.title.to_lowercase(), descriptor.title.clone())
}

/// Override order first (override ids with no collected descriptor are
/// silently dropped), then every collected-but-unlisted descriptor sorted by
/// title. An empty override degenerates to the pure alphabetical order.
pub fn apply_ordering(
    collected: Vec<VideoDescriptor>,
    ordered_ids: &[String],
) -> Vec<VideoDescriptor> {
    let mut by_id: HashMap<String, VideoDescriptor> = collected
        .into_iter()
        .map(|descriptor| (descriptor.id.clone(), descriptor))
        .collect();

    let mut ordered = Vec::with_capacity(by_id.len());
    for id in ordered_ids {
        if let Some(descriptor) = by_id.remove(id) {
            ordered.push(descriptor);
        }
    }

    let mut remainder: Vec<VideoDescriptor> = by_id.into_values().collect();
    remainder.sort_by_key(title_key);
    ordered.extend(remainder);
    ordered
}

/// Thumbnail preference for channel pages, in this exact order: local
/// `<id>.jpg`, any `.jpg`/`.webp` in the folder, the remote metadata URL,
/// the placeholder path.
fn resolve_channel_thumbnail(video_dir: &Path, video_id: &str, metadata: &VideoMetadata) -> String {
    let local_jpg = video_dir.join(format!("{video_id}.jpg"));
    if local_jpg.is_file() {
        return format!("./{video_id}/{video_id}.jpg");
    }

    if let Ok(entries) = fs::read_dir(video_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".jpg") || name.ends_with(".webp") {
                return format!("./{video_id}/{name}");
            }
        }
    }

    match &metadata.thumbnail {
        Some(url) if !url.is_empty() => url.clone(),
        _ => PLACEHOLDER_THUMBNAIL.to_owned(),
    }
}

/// Non-reserved subdirectories of `dir`: channel folders at the root level,
/// video folders inside a channel.
pub fn content_subdirs(dir: &Path) -> Result<Vec<(String, std::path::PathBuf)>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !entry.path().is_dir() || is_reserved_dir_name(&name) {
            continue;
        }
        out.push((name, entry.path()));
    }
    Ok(out)
}

/// Collects one channel's videos, lenient about missing media: anything with
/// readable metadata gets a descriptor, thumbnails fall back down the
/// preference chain. Ordered per the override file, else alphabetically.
pub fn collect_channel_videos(channel_dir: &Path, channel_title: &str) -> Result<Vec<VideoDescriptor>> {
    let ordered_ids = read_ordering_file(channel_dir);

    let mut collected = Vec::new();
    for (video_id, video_dir) in content_subdirs(channel_dir)? {
        let Some(metadata) = read_video_metadata(&video_dir)? else {
            debug!(video = %video_id, "no metadata, skipping");
            continue;
        };

        let (description, full_description) = truncate_description(metadata.description.as_deref());
        collected.push(VideoDescriptor {
            id: video_id.clone(),
            title: metadata.title.clone(),
            channel: channel_title.to_owned(),
            description,
            full_description,
            date: format_upload_date(metadata.upload_date.as_deref()),
            link: format!("./{video_id}/{OUTPUT_FILENAME}"),
            thumbnail: resolve_channel_thumbnail(&video_dir, &video_id, &metadata),
        });
    }

    Ok(apply_ordering(collected, &ordered_ids))
}

/// Both conventional files must exist before a video may appear on the root
/// index. Broken or partial downloads never reach the public page.
fn has_required_files(video_dir: &Path, video_id: &str) -> bool {
    video_dir.join(format!("{video_id}.mp4")).is_file()
        && video_dir.join(format!("{video_id}.jpg")).is_file()
}

/// Collects every complete video across all channels and shuffles the final
/// sequence uniformly: the home page intentionally surfaces a different
/// order on each regeneration.
pub fn collect_root_videos(root: &Path) -> Result<Vec<VideoDescriptor>> {
    let mut all = Vec::new();

    for (channel_name, channel_dir) in content_subdirs(root)? {
        for (video_id, video_dir) in content_subdirs(&channel_dir)? {
            let Some(metadata) = read_video_metadata(&video_dir)? else {
                continue;
            };
            if !has_required_files(&video_dir, &video_id) {
                debug!(channel = %channel_name, video = %video_id, "incomplete download, excluded from root index");
                continue;
            }

            let (description, full_description) =
                truncate_description(metadata.description.as_deref());
            let channel = match &metadata.uploader {
                Some(uploader) if !uploader.is_empty() => uploader.clone(),
                _ => channel_name.clone(),
            };
            all.push(VideoDescriptor {
                id: video_id.clone(),
                title: metadata.title.clone(),
                channel,
                description,
                full_description,
                date: format_upload_date(metadata.upload_date.as_deref()),
                link: format!("./{channel_name}/{video_id}/{OUTPUT_FILENAME}"),
                thumbnail: format!("./{channel_name}/{video_id}/{video_id}.jpg"),
            });
        }
    }

    all.shuffle(&mut rand::thread_rng());
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_video(channel: &Path, id: &str, title: &str, complete: bool) -> PathBuf {
        let dir = channel.join(id);
        fs::create_dir_all(&dir).expect("create video dir");
        fs::write(
            dir.join(format!("{id}.info.json")),
            format!(
                r#"{{"id":"{id}","title":"{title}","description":"about {title}","upload_date":"20230101","uploader":"Uploader"}}"#
            ),
        )
        .expect("write sidecar");
        if complete {
            fs::write(dir.join(format!("{id}.mp4")), b"video").expect("write mp4");
            fs::write(dir.join(format!("{id}.jpg")), b"jpg").expect("write jpg");
        }
        dir
    }

    #[test]
    fn truncation_keeps_full_text_for_search() {
        let long = "x".repeat(150);
        let (display, full) = truncate_description(Some(&long));
        assert_eq!(display.chars().count(), 103);
        assert!(display.ends_with("..."));
        assert_eq!(full, long);

        let (display, full) = truncate_description(None);
        assert_eq!(display, "Sin descripción....");
        assert_eq!(full, "Sin descripción.");
    }

    #[test]
    fn override_order_then_alphabetical_remainder() {
        let tmp = tempdir().expect("tempdir");
        let channel = tmp.path().to_path_buf();
        write_video(&channel, "A", "Alpha", true);
        write_video(&channel, "B", "beta", true);
        write_video(&channel, "C", "Gamma", true);
        fs::write(
            channel.join(ORDERING_FILE_NAME),
            "C\nA\nmissing-id\n\n",
        )
        .expect("write ordering");

        let videos = collect_channel_videos(&channel, "Chan").expect("collect");
        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn missing_ordering_file_sorts_by_title_case_insensitively() {
        let tmp = tempdir().expect("tempdir");
        let channel = tmp.path().to_path_buf();
        write_video(&channel, "1", "banana", true);
        write_video(&channel, "2", "Apple", true);
        write_video(&channel, "3", "cherry", true);

        let videos = collect_channel_videos(&channel, "Chan").expect("collect");
        let titles: Vec<&str> = videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn channel_walk_skips_reserved_dirs_and_metadata_less_folders() {
        let tmp = tempdir().expect("tempdir");
        let channel = tmp.path().to_path_buf();
        write_video(&channel, "ok", "Fine", true);
        fs::create_dir_all(channel.join("img")).expect("img dir");
        fs::create_dir_all(channel.join("empty")).expect("empty dir");

        let videos = collect_channel_videos(&channel, "Chan").expect("collect");
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "ok");
    }

    #[test]
    fn thumbnail_preference_chain_is_exact() {
        let tmp = tempdir().expect("tempdir");
        let channel = tmp.path().to_path_buf();

        // Local <id>.jpg wins.
        let dir = write_video(&channel, "v1", "One", true);
        fs::write(dir.join("other.webp"), b"x").expect("write webp");
        // No <id>.jpg, but another image in the folder.
        let dir = write_video(&channel, "v2", "Two", false);
        fs::write(dir.join("frame.webp"), b"x").expect("write webp");
        // Nothing local at all: remote URL from metadata.
        let dir = write_video(&channel, "v3", "Three", false);
        fs::write(
            dir.join("v3.info.json"),
            r#"{"id":"v3","title":"Three","thumbnail":"https://example.test/t.jpg"}"#,
        )
        .expect("rewrite sidecar");

        let videos = collect_channel_videos(&channel, "Chan").expect("collect");
        let by_id: HashMap<&str, &str> = videos
            .iter()
            .map(|v| (v.id.as_str(), v.thumbnail.as_str()))
            .collect();
        assert_eq!(by_id["v1"], "./v1/v1.jpg");
        assert_eq!(by_id["v2"], "./v2/frame.webp");
        assert_eq!(by_id["v3"], "https://example.test/t.jpg");
    }

    #[test]
    fn root_gate_excludes_incomplete_downloads() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path();
        let channel = root.join("Chan");
        write_video(&channel, "good", "Good", true);
        write_video(&channel, "partial", "Partial", false);
        fs::create_dir_all(root.join("js")).expect("js dir");

        let videos = collect_root_videos(root).expect("collect");
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "good");
        assert_eq!(videos[0].link, "./Chan/good/index.html");
        assert_eq!(videos[0].thumbnail, "./Chan/good/good.jpg");
        assert_eq!(videos[0].channel, "Uploader");
    }

    #[test]
    fn root_shuffle_never_drops_or_duplicates() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path();
        let channel = root.join("Chan");
        for i in 0..20 {
            write_video(&channel, &format!("v{i}"), &format!("Title {i}"), true);
        }

        let expected: BTreeSet<String> = (0..20).map(|i| format!("v{i}")).collect();
        for _ in 0..3 {
            let videos = collect_root_videos(root).expect("collect");
            let ids: BTreeSet<String> = videos.iter().map(|v| v.id.clone()).collect();
            assert_eq!(ids, expected);
            assert_eq!(videos.len(), 20);
        }
    }
}
