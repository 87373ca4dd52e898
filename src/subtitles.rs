//! Subtitle handling for video pages: `<track>` discovery for the HTML5
//! player and timestamp-stripped full text for crawlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use crate::html::escape;

/// Whether the first discovered track gets the `default` attribute, i.e.
/// subtitles start enabled without a user toggle.
pub const DEFAULT_SUBTITLE_ACTIVE: bool = true;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub file_name: String,
    pub lang_code: String,
    pub label: String,
}

fn is_subtitle_file(name: &str) -> bool {
    name.ends_with(".vtt") || name.ends_with(".srt")
}

/// Language code convention from yt-dlp: the filename segment just before
/// the extension (`clip.es.vtt` → `es`); auto-generated captions insert an
/// `auto` segment (`clip.en.auto.vtt` → `en`).
fn lang_code_of(file_name: &str) -> String {
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() < 3 {
        return "desconocido".to_owned();
    }
    let candidate = parts[parts.len() - 2];
    if candidate == "auto" && parts.len() >= 4 {
        parts[parts.len() - 3].to_owned()
    } else {
        candidate.to_owned()
    }
}

/// Enumerates subtitle files in a video folder, in directory order.
pub fn discover_tracks(video_dir: &Path) -> Result<Vec<SubtitleTrack>> {
    let entries = fs::read_dir(video_dir)
        .with_context(|| format!("failed to read video folder {}", video_dir.display()))?;

    let mut tracks = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", video_dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_subtitle_file(&name) {
            continue;
        }
        let lang_code = lang_code_of(&name);
        let label = if name.contains(".auto.") {
            format!("{lang_code} (Auto)")
        } else {
            lang_code.clone()
        };
        tracks.push(SubtitleTrack {
            file_name: name,
            lang_code,
            label,
        });
    }
    Ok(tracks)
}

/// Renders the `<track>` elements for the player. Only the first track is
/// marked `default`, and only when the default-subtitles toggle is on.
pub fn track_elements(tracks: &[SubtitleTrack], default_active: bool) -> String {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let default_attr = if default_active && index == 0 {
                " default"
            } else {
                ""
            };
            format!(
                r#"<track kind="subtitles" src="./{src}" srclang="{lang}" label="{label}"{default_attr}>"#,
                src = escape(&track.file_name),
                lang = escape(&track.lang_code),
                label = escape(&track.label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenates every subtitle file with timestamps, cue counters and
/// bracketed stage directions stripped. Used for the collapsible
/// search-engine text block; read failures degrade to whatever was collected.
pub fn read_subtitles_text(video_dir: &Path) -> Result<String> {
    // VTT: `00:00:01.000 --> 00:00:04.000 position:50%`; SRT: a cue number
    // line followed by `00:00:01,000 --> 00:00:04,000`.
    let vtt_timestamps = Regex::new(
        r"\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}[^\n]*\n?",
    )
    .context("invalid vtt timestamp pattern")?;
    let srt_timestamps = Regex::new(
        r"\d+\n\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3}\n",
    )
    .context("invalid srt timestamp pattern")?;
    let cue_numbers = Regex::new(r"\n\d+\n").context("invalid cue number pattern")?;
    let stage_directions = Regex::new(r"\[[^\]]*\]").context("invalid stage direction pattern")?;

    let mut all = String::new();
    for track in discover_tracks(video_dir)? {
        let path = video_dir.join(&track.file_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable subtitle file");
                continue;
            }
        };

        let mut clean = contents.replacen("WEBVTT\n", "", 1);
        clean = vtt_timestamps.replace_all(&clean, "").into_owned();
        clean = srt_timestamps.replace_all(&clean, "").into_owned();
        clean = cue_numbers.replace_all(&clean, "\n").into_owned();
        clean = stage_directions.replace_all(&clean, "").into_owned();
        let clean = clean.trim();

        all.push_str(&format!(
            "\n--- Subtítulos ({}) ---\n{}\n",
            track.file_name, clean
        ));
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lang_codes_come_from_the_filename() {
        assert_eq!(lang_code_of("clip.es.vtt"), "es");
        assert_eq!(lang_code_of("clip.en.auto.vtt"), "en");
        assert_eq!(lang_code_of("clip.srt"), "desconocido");
    }

    #[test]
    fn auto_tracks_are_labeled() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("clip.en.auto.vtt"), "WEBVTT\n").expect("write");
        fs::write(tmp.path().join("clip.es.vtt"), "WEBVTT\n").expect("write");
        fs::write(tmp.path().join("clip.mp4"), b"x").expect("write");

        let tracks = discover_tracks(tmp.path()).expect("discover");
        assert_eq!(tracks.len(), 2);
        let auto = tracks
            .iter()
            .find(|t| t.file_name.contains(".auto."))
            .expect("auto track");
        assert_eq!(auto.label, "en (Auto)");
        assert_eq!(auto.lang_code, "en");
    }

    #[test]
    fn only_first_track_gets_default_when_active() {
        let tracks = vec![
            SubtitleTrack {
                file_name: "a.es.vtt".into(),
                lang_code: "es".into(),
                label: "es".into(),
            },
            SubtitleTrack {
                file_name: "a.en.vtt".into(),
                lang_code: "en".into(),
                label: "en".into(),
            },
        ];
        let markup = track_elements(&tracks, true);
        assert_eq!(markup.matches(" default>").count(), 1);
        assert!(markup.lines().next().expect("first line").ends_with(" default>"));

        let markup = track_elements(&tracks, false);
        assert_eq!(markup.matches(" default>").count(), 0);
    }

    #[test]
    fn vtt_timestamps_and_cues_are_stripped() {
        let tmp = tempdir().expect("tempdir");
        fs::write(
            tmp.path().join("clip.es.vtt"),
            "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nhola mundo\n\n00:00:05.000 --> 00:00:08.000 position:50%\n[Música]\nadiós\n",
        )
        .expect("write");

        let text = read_subtitles_text(tmp.path()).expect("read");
        assert!(text.contains("hola mundo"));
        assert!(text.contains("adiós"));
        assert!(!text.contains("-->"));
        assert!(!text.contains("[Música]"));
        assert!(text.contains("--- Subtítulos (clip.es.vtt) ---"));
    }

    #[test]
    fn no_subtitles_yields_empty_text() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("clip.mp4"), b"x").expect("write");
        let text = read_subtitles_text(tmp.path()).expect("read");
        assert!(text.trim().is_empty());
    }
}
