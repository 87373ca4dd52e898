use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use you2pub::aggregate::content_subdirs;
use you2pub::assets::write_static_assets;
use you2pub::menu::{collect_channels, write_menu_data};
use you2pub::pages::{generate_channel_page, generate_root_page, generate_video_page};

fn long_version() -> String {
    match option_env!("YOU2PUB_GIT_HASH") {
        Some(hash) => format!("{} ({hash})", env!("CARGO_PKG_VERSION")),
        None => env!("CARGO_PKG_VERSION").to_owned(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "you2pub")]
#[command(about = "Offline video archive site generator")]
#[command(version, long_version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the whole site: assets, menu data, every page.
    Site { root: PathBuf },
    /// Generate the root index page.
    Root { root: PathBuf },
    /// Generate one channel's index page.
    Channel { channel_dir: PathBuf },
    /// Generate one video's page.
    Video { video_dir: PathBuf },
    /// Generate the sidebar menu data module.
    Menu { root: PathBuf },
    /// Write the shared CSS/JS assets.
    Assets { root: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Site { root } => run_site(&root),
        Commands::Root { root } => run_root(&root),
        Commands::Channel { channel_dir } => run_channel(&channel_dir),
        Commands::Video { video_dir } => run_video(&video_dir),
        Commands::Menu { root } => run_menu(&root),
        Commands::Assets { root } => run_assets(&root),
    }
}

fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("{} is not a directory", path.display());
    }
    Ok(())
}

fn run_assets(root: &Path) -> Result<()> {
    require_dir(root)?;
    let written = write_static_assets(root).context("failed to write static assets")?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_menu(root: &Path) -> Result<()> {
    require_dir(root)?;
    let channels = collect_channels(root)?;
    let path = write_menu_data(root, &channels)?;
    println!("Wrote {} ({} channels)", path.display(), channels.len());
    Ok(())
}

fn run_channel(channel_dir: &Path) -> Result<()> {
    require_dir(channel_dir)?;
    let path = generate_channel_page(channel_dir)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_video(video_dir: &Path) -> Result<()> {
    require_dir(video_dir)?;
    match generate_video_page(video_dir)? {
        Some(path) => println!("Wrote {}", path.display()),
        None => warn!(path = %video_dir.display(), "no video page generated"),
    }
    Ok(())
}

fn run_root(root: &Path) -> Result<()> {
    require_dir(root)?;
    let path = generate_root_page(root)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_site(root: &Path) -> Result<()> {
    require_dir(root)?;
    run_assets(root)?;
    run_menu(root)?;

    for (channel_name, channel_dir) in content_subdirs(root)? {
        for (_video_id, video_dir) in content_subdirs(&channel_dir)? {
            if let Some(path) = generate_video_page(&video_dir)? {
                println!("Wrote {}", path.display());
            }
        }
        let path = generate_channel_page(&channel_dir)
            .with_context(|| format!("failed to generate channel page for {channel_name}"))?;
        println!("Wrote {}", path.display());
    }

    run_root(root)
}
