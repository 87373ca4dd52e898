//! Pure markup helpers: every function here maps plain values to HTML
//! fragments with no filesystem access, so the page builders stay testable
//! against literal descriptor inputs.

use anyhow::{Context, Result};

use crate::schema::VideoDescriptor;

/// Escapes text for interpolation into element content or attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The shared document shell. `css_path` is depth-relative: `./css/...` on
/// the root page, `../css/...` on channel pages, `../../css/...` on video
/// pages.
pub fn page(title: &str, body: &str, css_path: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{css_path}">
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// One grid card. This is the server-side twin of the client's `renderCard`
/// in `js/grid.js`; both must stay in sync structurally.
pub fn video_card(video: &VideoDescriptor) -> String {
    format!(
        r#"<div class="video-item">
    <a href="{link}">
        <img src="{thumbnail}" alt="{title}" loading="lazy">
    </a>
    <div class="video-item-content">
        <h3><a href="{link}">{title}</a></h3>
        <p class="channel-name-text">Canal: {channel}</p>
        <p class="description-text">{description}</p>
        <p class="date-text">Subido el: {date}</p>
    </div>
</div>"#,
        link = escape(&video.link),
        thumbnail = escape(&video.thumbnail),
        title = escape(&video.title),
        channel = escape(&video.channel),
        description = escape(&video.description),
        date = escape(&video.date),
    )
}

/// One entry of the hidden static link list kept for crawlers.
pub fn static_link_item(video: &VideoDescriptor) -> String {
    format!(
        r#"<a href="{link}">{title}</a>"#,
        link = escape(&video.link),
        title = escape(&video.title),
    )
}

/// The inline payload every grid page embeds before loading client scripts:
/// the full descriptor sequence for the page's scope plus the batch size.
/// These two values are the sole inputs of the client renderer and search.
pub fn page_data_script(videos: &[VideoDescriptor], batch_size: usize) -> Result<String> {
    let data = serde_json::to_string(videos).context("failed to serialize page video data")?;
    // `</script>` inside a description would end the inline block early.
    let data = data.replace("</", "<\\/");
    Ok(format!(
        r#"<script>
window.PAGE_DATA = {{ videos: {data}, batchSize: {batch_size} }};
</script>"#
    ))
}

/// Font-size / theme / home controls. `home_href` is None on the root page,
/// which has nowhere upward to go.
pub fn topbar(home_href: Option<&str>) -> String {
    let home_button = match home_href {
        Some(href) => format!(
            r#"
    <a href="{href}" class="home-button-banner" title="Volver a la Página Principal">
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor">
            <path d="M10 20v-6h4v6h5v-8h3L12 3 2 12h3v8z"/>
        </svg>
    </a>"#
        ),
        None => String::new(),
    };
    format!(
        r#"<div id="topbar" class="topbar-controls">
    <button id="fontDecrease" class="font-control" title="Disminuir Tamaño de Fuente">A-</button>
    <button id="fontIncrease" class="font-control" title="Aumentar Tamaño de Fuente">A+</button>
    <button id="themeToggle" class="theme-toggle" title="Alternar Modo Claro/Oscuro">Cambiar Tema</button>{home_button}
</div>"#
    )
}

/// The collapsed sidebar shell. The client menu script fills and pages it.
pub fn sidebar(header: &str) -> String {
    format!(
        r#"<nav id="sidebar" class="collapsed">
    <button id="toggleSidebar" title="Alternar menú">☰</button>
    <div class="sidebar-header">{header}</div>
    <ul id="sidebar-content">
        <li class="sidebar-item sidebar-placeholder">Cargando canales...</li>
    </ul>
    <div id="sidebarSentinel" class="sidebar-sentinel"></div>
</nav>"#,
        header = escape(header),
    )
}

/// Search box plus the grid container, proximity sentinel and status line.
pub fn grid_section(count_message: &str) -> String {
    format!(
        r#"<div class="search-bar">
    <input type="search" id="searchInput" placeholder="Buscar por título, canal o descripción..." autocomplete="off">
</div>
<p id="videoCountMessage">{count_message}</p>
<div id="videoListContainer" class="video-list-grid"></div>
<div id="loadingSentinel" class="loading-sentinel">
    <p id="loadingMessage">Cargando más videos...</p>
</div>"#,
        count_message = escape(count_message),
    )
}
