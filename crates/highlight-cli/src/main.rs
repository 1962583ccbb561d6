//! Highlight - extract the best scenes of a video
//!
//! Entry point: parses arguments, runs the analysis pipeline against the
//! FFmpeg backend and writes clips, thumbnails and a JSON summary.

use anyhow::{Context, Result};
use clap::Parser;
use highlight_analysis::{analyze, run_highlight_pipeline, AnalysisConfig, AnalysisProgress};
use highlight_media::{StreamCopyCutter, VideoDecoder, DEFAULT_THUMBNAIL_QUALITY};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod output;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "highlight")]
#[command(version)]
#[command(about = "Find and cut the highlight scenes of a video", long_about = None)]
struct Args {
    /// Input video file path
    input: PathBuf,

    /// Directory for clips, thumbnails and highlights.json
    #[arg(short, long, default_value = "highlights")]
    output: PathBuf,

    /// JSON analysis config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene length in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(5..=30))]
    scene_duration: Option<u32>,

    /// Number of scenes to extract
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5))]
    clips: Option<u32>,

    /// Thumbnail JPEG quality
    #[arg(long, default_value_t = DEFAULT_THUMBNAIL_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    thumbnail_quality: u8,

    /// Log filter, e.g. "debug" or "highlight_analysis=trace" (default: $RUST_LOG or "info")
    #[arg(long)]
    log_level: Option<String>,

    /// Print the selected scenes as JSON without cutting anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;

    // Initialize media subsystem
    highlight_media::init()?;

    let decoder = VideoDecoder::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    info!(
        input = %args.input.display(),
        duration = decoder.probe().duration,
        window = config.scenes.window_secs,
        clips = config.scenes.top_k,
        "Analyzing video"
    );

    let progress = |p: &AnalysisProgress| {
        let percent = p.percent.round();
        let stage = p.stage.display_name();
        match &p.current_task {
            Some(task) => info!(percent, stage, "{task}"),
            None => debug!(percent, stage, "Progress"),
        }
    };

    if args.dry_run {
        let analysis = analyze(&decoder, &config, &progress)?;
        println!("{}", serde_json::to_string_pretty(&analysis.scenes)?);
        return Ok(());
    }

    let cutter = StreamCopyCutter::new(decoder.path());
    let reel = run_highlight_pipeline(&decoder, &cutter, &config, &progress)?;

    for failure in &reel.failures {
        warn!(
            scene = failure.index + 1,
            start = failure.start_time,
            reason = %failure.reason,
            "Scene skipped"
        );
    }
    if reel.is_empty() {
        info!("No highlights found");
    }

    let summary = output::write_reel(&reel, &args.input, &args.output, args.thumbnail_quality)?;
    info!(
        clips = summary.scenes.len(),
        output = %args.output.display(),
        "Highlights written"
    );

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(secs) = args.scene_duration {
        config.scenes.window_secs = secs as f64;
    }
    if let Some(clips) = args.clips {
        config.scenes.top_k = clips as usize;
    }

    config.validate()?;
    Ok(config)
}
