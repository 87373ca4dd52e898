//! Static-site generator for a local/offline video archive: walks a tree of
//! downloaded videos (metadata sidecars, thumbnails, subtitles) and emits
//! self-contained HTML pages plus shared CSS/JS for browsing, searching and
//! playing everything offline.

pub mod aggregate;
pub mod assets;
pub mod html;
pub mod listview;
pub mod menu;
pub mod metadata;
pub mod pages;
pub mod schema;
pub mod search;
pub mod subtitles;
