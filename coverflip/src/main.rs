use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coverflip_state::Playlist;

mod app;
mod config;
mod cover_renderer;
mod style;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to scan for music, overriding `music_directory` in the config
    directory: Option<PathBuf>,

    /// Number of placeholder songs to show when no music directory is set
    #[arg(long)]
    demo_songs: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coverflip=info")),
        )
        .init();

    let args = Args::parse();

    // Load and save config at startup; failing to save is not fatal
    let config = config::Config::load();
    if let Err(e) = config.save() {
        tracing::warn!("Failed to save config: {e:#}");
    }

    let playlist = load_playlist(&args, &config)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.general.window_width, config.general.window_height]),
        ..eframe::NativeOptions::default()
    };

    eframe::run_native(
        "coverflip",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, config, playlist)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the UI: {e}"))
}

fn load_playlist(args: &Args, config: &config::Config) -> anyhow::Result<Playlist> {
    let directory = args
        .directory
        .as_ref()
        .or(config.general.music_directory.as_ref());

    let Some(directory) = directory else {
        tracing::info!("No music directory set, showing the demo playlist");
        return Ok(Playlist::demo(
            args.demo_songs.unwrap_or(config.general.demo_songs),
        ));
    };

    let songs = coverflip_state::scan_directory(directory)
        .with_context(|| format!("Failed to scan {}", directory.display()))?;
    if songs.is_empty() {
        anyhow::bail!("No music found in {}", directory.display());
    }
    Ok(Playlist::new(songs))
}
