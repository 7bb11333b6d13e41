mod manifest;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use threadreel_core::{ReelConfig, CONFIG_FILE_NAME};
use threadreel_render::{BackgroundProvider, ReelPipeline};

use crate::manifest::Manifest;

#[derive(Parser)]
#[command(
    name = "threadreel",
    version,
    about = "Threadreel: narrated short-form videos from threads",
    long_about = "Threadreel assembles vertical videos from a title, body parts and ranked comments.\nEach segment is narrated by its own audio file and overlaid on a background video or image."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a manifest to video
    Render {
        /// Path to the manifest JSON ({"segments": [...], "audio": [...]})
        manifest: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "output/video.mp4")]
        output: PathBuf,

        /// Config file (defaults to ./threadreel.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for background selection
        #[arg(long)]
        seed: Option<u64>,

        /// Leave narration files on disk after rendering
        #[arg(long)]
        keep_audio: bool,
    },

    /// List the backgrounds available to a render
    Backgrounds {
        /// Config file (defaults to ./threadreel.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default threadreel.toml
    Init {
        /// Where to write the config
        #[arg(default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
    },

    /// Show version and environment info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Render {
            manifest,
            output,
            config,
            seed,
            keep_audio,
        } => cmd_render(&manifest, &output, config.as_deref(), seed, keep_audio),
        Commands::Backgrounds { config } => cmd_backgrounds(config.as_deref()),
        Commands::Init { path } => cmd_init(&path),
        Commands::Info => cmd_info(),
    }
}

fn load_config(path: Option<&Path>) -> Result<ReelConfig> {
    let config = match path {
        Some(path) => ReelConfig::load_from_file(path),
        None => ReelConfig::load_or_default(Path::new(CONFIG_FILE_NAME)),
    };
    config.context("failed to load config")
}

fn cmd_render(
    manifest_path: &Path,
    output: &Path,
    config: Option<&Path>,
    seed: Option<u64>,
    keep_audio: bool,
) -> Result<()> {
    let start = Instant::now();
    let mut config = load_config(config)?;
    if seed.is_some() {
        config.render.seed = seed;
    }

    let manifest = Manifest::load(manifest_path)?;
    println!("Threadreel v{}", env!("CARGO_PKG_VERSION"));
    println!("   Manifest: {}", manifest_path.display());
    println!(
        "   Segments: {} ({}x{} @ {} fps)",
        manifest.segments.len(),
        config.video.width,
        config.video.height,
        config.video.fps
    );

    let pipeline = ReelPipeline::new(config)
        .context("invalid config")?
        .keep_audio(keep_audio);
    let report = pipeline
        .render(&manifest.segments, &manifest.audio, output)
        .with_context(|| format!("failed to render {}", manifest_path.display()))?;

    for (index, reason) in &report.dropped {
        println!("   Dropped segment {}: {}", index, reason);
    }
    println!(
        "   Wrote {} ({} of {} segments, {})",
        report.output.display(),
        report.included.len(),
        manifest.segments.len(),
        report.duration
    );
    println!("   Done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn cmd_backgrounds(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let provider = BackgroundProvider::new(config.background.clone());
    let assets = provider.list_available();

    println!("Backgrounds in {}", provider.dir().display());
    if assets.is_empty() {
        match config.background.fallback_color {
            Some(color) => println!("   (none, renders will use solid {})", color),
            None => println!("   (none, and no fallback colour is configured)"),
        }
        return Ok(());
    }
    for asset in &assets {
        println!("   [{}] {}", asset.kind, asset.path.display());
    }
    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("'{}' already exists", path.display());
    }
    ReelConfig::default()
        .save_to_file(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_info() -> Result<()> {
    let available = |yes: bool| if yes { "available" } else { "NOT FOUND" };
    println!("Threadreel");
    println!("   Version:  {}", env!("CARGO_PKG_VERSION"));
    println!("   Encoder:  FFmpeg (H.264 + AAC)");
    println!(
        "   FFmpeg:   {}",
        available(threadreel_encode::FfmpegEncoder::is_available())
    );
    println!(
        "   FFprobe:  {}",
        available(threadreel_encode::probe::is_available())
    );
    Ok(())
}
