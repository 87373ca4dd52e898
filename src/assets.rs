//! Shared static assets, embedded at compile time and written into the
//! site's `css/` and `js/` directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pages::write_atomic;

pub const STYLE_CSS: &str = include_str!("../assets/web/style.css");
pub const LAZY_LIST_JS: &str = include_str!("../assets/web/lazy-list.js");
pub const GRID_JS: &str = include_str!("../assets/web/grid.js");
pub const MENU_JS: &str = include_str!("../assets/web/menu.js");
pub const THEME_TOGGLE_JS: &str = include_str!("../assets/web/theme-toggle.js");
pub const FONT_SIZE_JS: &str = include_str!("../assets/web/font-size.js");
pub const VIDEO_PAGE_JS: &str = include_str!("../assets/web/video-page.js");

const JS_ASSETS: [(&str, &str); 6] = [
    ("lazy-list.js", LAZY_LIST_JS),
    ("grid.js", GRID_JS),
    ("menu.js", MENU_JS),
    ("theme-toggle.js", THEME_TOGGLE_JS),
    ("font-size.js", FONT_SIZE_JS),
    ("video-page.js", VIDEO_PAGE_JS),
];

/// Writes `css/style.css` and the client scripts under `js/`. Returns the
/// paths written, for the CLI confirmation output.
pub fn write_static_assets(root: &Path) -> Result<Vec<PathBuf>> {
    let css_dir = root.join("css");
    let js_dir = root.join("js");
    fs::create_dir_all(&css_dir)
        .with_context(|| format!("failed to create {}", css_dir.display()))?;
    fs::create_dir_all(&js_dir)
        .with_context(|| format!("failed to create {}", js_dir.display()))?;

    let mut written = Vec::new();
    let css_path = css_dir.join("style.css");
    write_atomic(&css_path, STYLE_CSS.as_bytes())?;
    written.push(css_path);

    for (name, contents) in JS_ASSETS {
        let path = js_dir.join(name);
        write_atomic(&path, contents.as_bytes())?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn assets_land_in_css_and_js_dirs() {
        let tmp = tempdir().expect("tempdir");
        let written = write_static_assets(tmp.path()).expect("write");
        assert_eq!(written.len(), 7);
        assert!(tmp.path().join("css/style.css").is_file());
        for (name, _) in JS_ASSETS {
            assert!(tmp.path().join("js").join(name).is_file(), "{name}");
        }
    }

    #[test]
    fn grid_script_reads_explicit_page_data() {
        // The client must not probe ambient globals; it reads the embedded
        // payload and deactivates when it is missing.
        assert!(GRID_JS.contains("window.PAGE_DATA"));
        assert!(GRID_JS.contains("PAGE_DATA missing"));
        assert!(!GRID_JS.contains("typeof ALL_VIDEOS_DATA"));
    }
}
