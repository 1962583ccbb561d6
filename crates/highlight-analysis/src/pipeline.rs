//! Highlight extraction pipeline.
//!
//! Runs every stage for one source video:
//! 1. Frame skin analysis and audio loudness (concurrently)
//! 2. Signal fusion
//! 3. Window scoring and top-K selection
//! 4. Thumbnail and clip cut per selected scene (concurrently)
//!
//! Reports progress through a [`ProgressSink`] so a caller can show a
//! progress bar.

use crate::config::{AnalysisConfig, MAX_FRAME_SAMPLES};
use crate::error::{AnalysisError, AnalysisResult};
use crate::fusion::{self, FusedSample};
use crate::loudness::{self, AudioFeature};
use crate::progress::{AnalysisStage, ProgressSink, ProgressTracker};
use crate::scenes::{self, SelectedScene};
use crate::skin::{self, FrameFeature};
use highlight_core::{ClipCutter, FrameBuffer, HighlightError, MediaSource};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of the analysis half of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnalysis {
    /// Source duration in seconds.
    pub duration: f64,
    /// Fused per-frame signal.
    pub fused: Vec<FusedSample>,
    /// Selected scenes, chronological.
    pub scenes: Vec<SelectedScene>,
}

/// A scene with its thumbnail and cut clip.
#[derive(Debug, Clone)]
pub struct ExtractedScene {
    pub scene: SelectedScene,
    /// Decoded frame near the start of the scene.
    pub thumbnail: FrameBuffer,
    /// Stream-copied clip bytes.
    pub clip: Vec<u8>,
}

/// A selected scene that could not be extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFailure {
    /// Position of the scene in the selection.
    pub index: usize,
    pub start_time: f64,
    pub reason: String,
}

/// Output of a full run.
#[derive(Debug, Clone)]
pub struct HighlightReel {
    /// Source duration in seconds.
    pub duration: f64,
    /// Successfully extracted scenes, chronological.
    pub scenes: Vec<ExtractedScene>,
    /// Scenes dropped during extraction.
    pub failures: Vec<SceneFailure>,
}

impl HighlightReel {
    /// True when no highlight could be produced.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Instant at which a scene's thumbnail is taken.
///
/// `start + offset` while that still falls inside the scene, otherwise the
/// scene start.
pub fn thumbnail_time(scene: &SelectedScene, offset: f64) -> f64 {
    let at = scene.start_time + offset.max(0.0);
    if at < scene.end_time {
        at
    } else {
        scene.start_time
    }
}

/// Analyze `source` and select its highlight windows without extracting them.
pub fn analyze(
    source: &dyn MediaSource,
    config: &AnalysisConfig,
    progress: &dyn ProgressSink,
) -> AnalysisResult<SceneAnalysis> {
    let tracker = ProgressTracker::new(progress);
    let analysis = analyze_tracked(source, config, &tracker)?;
    tracker.complete();
    Ok(analysis)
}

/// Run the full pipeline on `source`.
///
/// A decode failure during analysis aborts the run. A scene whose thumbnail
/// or clip cannot be produced is dropped and recorded in
/// [`HighlightReel::failures`]; the other scenes are unaffected.
pub fn run_highlight_pipeline(
    source: &dyn MediaSource,
    cutter: &dyn ClipCutter,
    config: &AnalysisConfig,
    progress: &dyn ProgressSink,
) -> AnalysisResult<HighlightReel> {
    let tracker = ProgressTracker::new(progress);
    let analysis = analyze_tracked(source, config, &tracker)?;

    // ── Extraction ────────────────────────────────────────────────────
    tracker.enter(AnalysisStage::Extracting, Some("Extracting highlights".into()));

    let total = analysis.scenes.len();
    let offset = config.thumbnail_offset_secs;
    let outcomes: Vec<Result<ExtractedScene, SceneFailure>> = analysis
        .scenes
        .par_iter()
        .enumerate()
        .map(|(index, scene)| {
            let outcome = extract_scene(source, cutter, scene, offset).map_err(|e| {
                warn!(
                    index,
                    start = scene.start_time,
                    error = %e,
                    "Scene extraction failed, dropping scene"
                );
                SceneFailure {
                    index,
                    start_time: scene.start_time,
                    reason: e.to_string(),
                }
            });
            tracker.scene_done(total, format!("Clip {}/{}", index + 1, total));
            outcome
        })
        .collect();

    let mut scenes = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(extracted) => scenes.push(extracted),
            Err(failure) => failures.push(failure),
        }
    }

    info!(
        extracted = scenes.len(),
        failed = failures.len(),
        "Highlight pipeline complete"
    );
    tracker.complete();

    Ok(HighlightReel {
        duration: analysis.duration,
        scenes,
        failures,
    })
}

fn analyze_tracked(
    source: &dyn MediaSource,
    config: &AnalysisConfig,
    tracker: &ProgressTracker<'_>,
) -> AnalysisResult<SceneAnalysis> {
    config.validate()?;

    // ── Preparing ─────────────────────────────────────────────────────
    tracker.enter(AnalysisStage::Preparing, Some("Reading media".into()));

    let duration = source.duration();
    if !duration.is_finite() || duration < 0.0 {
        return Err(AnalysisError::DecodeFailure {
            stage: "duration",
            source: HighlightError::Decoder(format!("invalid duration {duration}")),
        });
    }
    let samples = skin::sample_count(duration, config.frame.sample_interval_secs);
    if samples > MAX_FRAME_SAMPLES {
        return Err(AnalysisError::InvalidConfig(format!(
            "{samples} frame samples for a {duration:.0}s video exceeds {MAX_FRAME_SAMPLES}; \
             raise frame.sample_interval_secs"
        )));
    }
    info!(duration, samples, "Starting highlight analysis");

    // ── Frames ∥ audio ────────────────────────────────────────────────
    let (frames, audio) = rayon::join(
        || analyze_frames(source, duration, config, tracker),
        || analyze_audio(source, config, tracker),
    );
    let frames = frames?;
    let audio = audio?;
    info!(
        frames = frames.len(),
        audio_chunks = audio.len(),
        "Signal extraction complete"
    );

    // ── Scoring ───────────────────────────────────────────────────────
    tracker.enter(AnalysisStage::Scoring, Some("Scoring scenes".into()));

    let fused = fusion::fuse(&frames, &audio, config.fusion.tolerance_secs);
    let scenes = scenes::select_scenes(
        &fused,
        config.scenes.window_secs,
        config.scenes.top_k,
        duration,
    );
    for scene in &scenes {
        debug!(
            start = scene.start_time,
            end = scene.end_time,
            score = scene.score,
            "Selected scene"
        );
    }
    if scenes.is_empty() {
        info!(duration, window = config.scenes.window_secs, "No highlight window fits");
    }

    Ok(SceneAnalysis {
        duration,
        fused,
        scenes,
    })
}

fn analyze_frames(
    source: &dyn MediaSource,
    duration: f64,
    config: &AnalysisConfig,
    tracker: &ProgressTracker<'_>,
) -> AnalysisResult<Vec<FrameFeature>> {
    let mut cursor = source
        .open_cursor()
        .map_err(AnalysisError::decode("open cursor"))?;
    let frames = skin::extract_frames(cursor.as_mut(), duration, &config.frame, |f| {
        tracker.frames(f)
    })
    .map_err(AnalysisError::decode("frames"))?;
    // Nothing to sample still completes the stage
    tracker.frames(1.0);
    Ok(frames)
}

fn analyze_audio(
    source: &dyn MediaSource,
    config: &AnalysisConfig,
    tracker: &ProgressTracker<'_>,
) -> AnalysisResult<Vec<AudioFeature>> {
    let buffer = source.audio().map_err(AnalysisError::decode("audio"))?;
    if buffer.is_empty() {
        debug!("No audio samples, scoring on skin tone alone");
    }
    let features = loudness::extract_audio(
        &buffer.samples,
        buffer.sample_rate,
        config.audio.chunk_secs,
        |f| tracker.audio(f),
    );
    tracker.audio(1.0);
    Ok(features)
}

fn extract_scene(
    source: &dyn MediaSource,
    cutter: &dyn ClipCutter,
    scene: &SelectedScene,
    thumbnail_offset: f64,
) -> highlight_core::Result<ExtractedScene> {
    let at = thumbnail_time(scene, thumbnail_offset);
    let thumbnail = source.open_cursor()?.seek(at)?;
    let clip = cutter.cut(scene.start_time, scene.duration())?;
    debug!(
        start = scene.start_time,
        thumbnail_at = at,
        clip_bytes = clip.len(),
        "Scene extracted"
    );
    Ok(ExtractedScene {
        scene: *scene,
        thumbnail,
        clip,
    })
}
