use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::{info, warn};

use ant_downloader::commands::interactive::{
    run_until_interrupted, DialoguerPrompter, Session, SessionEnd,
};
use ant_downloader::core::{output, AppConfig, Downloader, YtDlpEngine};
use ant_downloader::utils::logging::init_tracing;

/// Paste a link, pick mp3 or mp4, and download it (playlists supported)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Destination folder, relative to your home directory unless absolute
    #[arg(short = 'o', long, env = "ANT_DL_OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Path to the yt-dlp executable
    #[arg(long, env = "ANT_DL_ENGINE")]
    engine: Option<String>,

    /// Use this settings file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Load before the subscriber exists so the file can pick the log level
    let loaded = AppConfig::load_at(cli.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|cfg| cfg.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(&level, cli.verbose);

    let mut config = AppConfig::resolve(loaded);
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(engine) = cli.engine {
        config.engine.binary = engine;
    }
    config.validate()?;

    let save_path = output::save_path(&output::home_dir()?, &config.output_dir);
    info!("📁 Saving downloads into {}", save_path.display());

    let engine = YtDlpEngine::new(&config.engine.binary);
    match engine.check_available().await {
        Ok(Some(version)) => info!("🎥 Using yt-dlp {}", version),
        Ok(None) => eprintln!(
            "{} '{}' was not found; downloads will fail until yt-dlp is installed\n",
            style("[warning]").yellow(),
            engine.binary().display()
        ),
        Err(e) => warn!("Could not check engine availability: {}", e),
    }

    let downloader = Downloader::new(engine, config.engine.clone(), save_path);
    let mut session = Session::new(downloader, DialoguerPrompter);

    if run_until_interrupted(&mut session).await == SessionEnd::Interrupted {
        // A prompt may still be blocked on stdin; don't wait for it
        std::process::exit(0);
    }

    Ok(())
}
