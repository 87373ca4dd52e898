//! Assembles aggregated descriptor sequences and channel/site chrome into
//! complete HTML documents, and writes them without ever leaving a
//! half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::aggregate::{collect_channel_videos, collect_root_videos};
use crate::html;
use crate::listview::{HtmlListSink, ListRenderer};
use crate::menu::read_menu_data;
use crate::metadata::{
    format_upload_date, read_channel_info, read_video_metadata,
};
use crate::schema::{
    ChannelDirectoryEntry, VideoDescriptor, CHANNEL_VIDEOS_PER_PAGE, OUTPUT_FILENAME,
    ROOT_VIDEOS_PER_PAGE,
};
use crate::subtitles::{
    discover_tracks, read_subtitles_text, track_elements, DEFAULT_SUBTITLE_ACTIVE,
};

const PLACEHOLDER_BANNER: &str = "./img/placeholder-banner.jpg";
const PLACEHOLDER_ICON: &str = "./img/placeholder-icon.png";

/// Writes to a temporary sibling, then renames into place. Output files are
/// all-or-nothing; a failed run never corrupts an existing page.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", path.display()))?;
    Ok(())
}

/// Scans `<channel>/img` for the banner (`banner_*.jpg`/`.jpeg`) and the
/// icon (`icon.png`, case-insensitive). Missing images fall back to
/// placeholder paths, never to a failure.
fn detect_channel_images(channel_dir: &Path) -> (String, String) {
    let mut banner = PLACEHOLDER_BANNER.to_owned();
    let mut icon = PLACEHOLDER_ICON.to_owned();

    let img_dir = channel_dir.join("img");
    let Ok(entries) = fs::read_dir(&img_dir) else {
        warn!(path = %img_dir.display(), "no img directory, using placeholder banner and icon");
        return (banner, icon);
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.eq_ignore_ascii_case("icon.png") {
            icon = format!("./img/{name}");
        }
        if name.starts_with("banner_") && (name.ends_with(".jpg") || name.ends_with(".jpeg")) {
            banner = format!("./img/{name}");
        }
    }
    (banner, icon)
}

/// Renders the hidden crawler-visible link list through the same batched
/// cursor the client grid uses.
fn static_video_list(videos: &[VideoDescriptor], batch_size: usize) -> Result<String> {
    let mut list = ListRenderer::new(videos.to_vec(), batch_size)?;
    let mut sink = HtmlListSink::new(html::static_link_item);
    list.render_all(&mut sink);
    Ok(sink.into_markup())
}

fn static_channel_list(channels: &[ChannelDirectoryEntry]) -> Result<String> {
    fn item(channel: &ChannelDirectoryEntry) -> String {
        format!(
            r#"<li><a href="{url}">{name}</a></li>"#,
            url = html::escape(&channel.url),
            name = html::escape(&channel.name),
        )
    }
    let mut list = ListRenderer::new(channels.to_vec(), ROOT_VIDEOS_PER_PAGE)?;
    let mut sink = HtmlListSink::new(item);
    list.render_all(&mut sink);
    Ok(sink.into_markup())
}

fn script_tags(prefix: &str) -> String {
    format!(
        r#"<script src="{prefix}js/theme-toggle.js" defer></script>
<script src="{prefix}js/font-size.js" defer></script>
<script type="module" src="{prefix}js/grid.js" defer></script>
<script type="module" src="{prefix}js/menu.js" defer></script>"#
    )
}

/// Generates `<channel>/index.html` and returns its path.
pub fn generate_channel_page(channel_dir: &Path) -> Result<PathBuf> {
    let channel_name = dir_name(channel_dir)?;
    let info = read_channel_info(channel_dir);
    let channel_title = info.channel.unwrap_or_else(|| channel_name.clone());
    let channel_description = info
        .description
        .unwrap_or_else(|| "Sin descripción.".to_owned());

    let videos = collect_channel_videos(channel_dir, &channel_title)?;
    let (banner_path, icon_path) = detect_channel_images(channel_dir);

    let body = format!(
        r#"{topbar}
{sidebar}
<div class="main-content-wrapper">
    <div class="banner-container-channel">
        <img src="{banner}" alt="Banner del Canal {title_attr}" class="main-banner"/>
    </div>
    <div class="channel-header">
        <img src="{icon}" alt="Icono de {title_attr}" class="channel-icon-large">
        <h1>{title}</h1>
        <p class="channel-description">{description}</p>
    </div>
    <h2>Videos del Canal ({count} videos)</h2>
{grid}
</div>
<div class="static-video-list" hidden>
    <h2>Todos los Videos de {title}</h2>
{static_list}
</div>
{page_data}
{scripts}"#,
        topbar = html::topbar(Some("../index.html")),
        sidebar = html::sidebar("Canales"),
        banner = html::escape(&banner_path),
        icon = html::escape(&icon_path),
        title = html::escape(&channel_title),
        title_attr = html::escape(&channel_title),
        description = html::escape(&channel_description),
        count = videos.len(),
        grid = html::grid_section(&format!("Mostrando {} videos del canal.", videos.len())),
        static_list = static_video_list(&videos, CHANNEL_VIDEOS_PER_PAGE)?,
        page_data = html::page_data_script(&videos, CHANNEL_VIDEOS_PER_PAGE)?,
        scripts = script_tags("../"),
    );

    let page = html::page(
        &format!("Canal: {channel_title}"),
        &body,
        "../css/style.css",
    );
    let out = channel_dir.join(OUTPUT_FILENAME);
    write_atomic(&out, page.as_bytes())?;
    Ok(out)
}

/// Generates `root/index.html` (the shuffled all-channels home page).
pub fn generate_root_page(root: &Path) -> Result<PathBuf> {
    let videos = collect_root_videos(root)?;
    let channels = read_menu_data(root);

    let seo_section = if channels.is_empty() {
        String::new()
    } else {
        format!(
            r#"<section id="seo-channel-list" class="offscreen" hidden>
    <h2>Índice de Canales para Rastreadores</h2>
    <ul>
{list}
    </ul>
</section>"#,
            list = static_channel_list(&channels)?,
        )
    };

    let count_message = format!(
        "Mostrando {} videos de todos los canales. (Videos cargados de forma aleatoria).",
        videos.len()
    );
    let body = format!(
        r#"{sidebar}
{seo_section}
{topbar}
<div class="main-content-wrapper">
    <header class="main-header">
        <h1><a href="./">Página Principal de Contenido</a></h1>
    </header>
    <hr>
{grid}
</div>
{page_data}
{scripts}"#,
        sidebar = html::sidebar("📚 Archivos Offline"),
        topbar = html::topbar(None),
        grid = html::grid_section(&count_message),
        page_data = html::page_data_script(&videos, ROOT_VIDEOS_PER_PAGE)?,
        scripts = script_tags("./"),
    );

    let page = html::page("Índice Principal", &body, "./css/style.css");
    let out = root.join(OUTPUT_FILENAME);
    write_atomic(&out, page.as_bytes())?;
    Ok(out)
}

/// Generates `<channel>/<videoId>/index.html`. A folder without readable
/// metadata is skipped with a warning (`Ok(None)`) so one broken video never
/// aborts a whole-site run.
pub fn generate_video_page(video_dir: &Path) -> Result<Option<PathBuf>> {
    let video_dir_name = dir_name(video_dir)?;
    let Some(metadata) = read_video_metadata(video_dir)? else {
        warn!(video = %video_dir_name, "no metadata sidecar, video page not generated");
        return Ok(None);
    };

    let channel_dir_name = video_dir
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let video_id = if metadata.id.is_empty() {
        video_dir_name.clone()
    } else {
        metadata.id.clone()
    };
    let title = metadata
        .fulltitle
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| metadata.title.clone());
    let uploader = metadata.uploader.clone().unwrap_or_else(|| channel_dir_name.clone());
    let upload_date = format_upload_date(metadata.upload_date.as_deref());
    let description = metadata
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Sin descripción.".to_owned());

    let video_filename = format!("{video_id}.mp4");
    let tracks = discover_tracks(video_dir)?;
    let subtitles_text = read_subtitles_text(video_dir)?;
    let subtitles_section = if subtitles_text.trim().is_empty() {
        String::new()
    } else {
        format!(
            r#"<details class="subtitles-details">
    <summary><h3>📜 Subtítulos Completos (para motores de búsqueda - haz click para ver)</h3></summary>
    <div class="subtitles-scroll"><pre>{}</pre></div>
</details>"#,
            html::escape(&subtitles_text),
        )
    };

    let body = format!(
        r#"{topbar}
{sidebar}
<div class="main-content-wrapper">
    <header class="channel-header">
        <div class="banner-container-channel">
            <img src="../img/banner_{channel_dir}.jpg" alt="Banner del Canal {uploader}" class="main-banner"/>
        </div>
        <h1>{title}</h1>
        <p><strong>Canal:</strong> <a href="../index.html">{uploader}</a></p>
        <p><strong>Fecha de subida:</strong> {date}</p>
    </header>
    <hr>
    <video controls poster="./{video_id}.jpg" id="mainVideo">
        <source src="./{video_file}" type="video/mp4">
{tracks}
        Tu navegador no soporta el elemento de video.
    </video>
    <div class="controls-bar">
        <button class="buttons" id="back30s">⏪ Atrás 30s</button>
        <button class="buttons" id="forward30s">Adelante 30s ⏩</button>
    </div>
    <hr>
    <div class="description">
        <h3>📝 Descripción del Video</h3>
        <pre>{description}</pre>
    </div>
    <div class="info-bar">
        <div>
            <h3>🔗 Enlaces</h3>
            <a href="https://www.youtube.com/watch?v={video_id}" target="_blank" rel="noopener noreferrer">URL Original en YouTube</a>
        </div>
        <div>
            <h3>⬇️ Descarga</h3>
            <a href="./{video_file}" download="{download_name}.mp4" class="download-link">Descargar Video 📥</a>
        </div>
    </div>
    <hr>
{subtitles_section}
</div>
<script src="../../js/theme-toggle.js" defer></script>
<script src="../../js/font-size.js" defer></script>
<script src="../../js/video-page.js" defer></script>
<script type="module" src="../../js/menu.js" defer></script>"#,
        topbar = html::topbar(Some("../../index.html")),
        sidebar = html::sidebar("Canales"),
        channel_dir = html::escape(&channel_dir_name),
        uploader = html::escape(&uploader),
        title = html::escape(&title),
        date = html::escape(&upload_date),
        video_id = html::escape(&video_id),
        video_file = html::escape(&video_filename),
        description = html::escape(&description),
        download_name = html::escape(&metadata.title),
        tracks = track_elements(&tracks, DEFAULT_SUBTITLE_ACTIVE),
    );

    let page = html::page(&title, &body, "../../css/style.css");
    let out = video_dir.join(OUTPUT_FILENAME);
    write_atomic(&out, page.as_bytes())?;
    Ok(Some(out))
}

fn dir_name(dir: &Path) -> Result<String> {
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("directory {} has no name component", dir.display()))
}
