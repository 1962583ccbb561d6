//! Writes a highlight reel to disk.
//!
//! Layout of the output directory:
//! - `clip_N.mp4` - the cut clip of scene N (1-based, chronological)
//! - `clip_N.jpg` - its thumbnail
//! - `highlights.json` - a [`ReelSummary`]
//!
//! A scene whose files cannot be produced is left out and listed under
//! `failures`; the remaining scenes and the summary are still written.

use anyhow::{Context, Result};
use highlight_analysis::{ExtractedScene, HighlightReel, SceneFailure};
use highlight_media::encode_jpeg;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Name of the summary file in the output directory.
pub const SUMMARY_FILE: &str = "highlights.json";

/// One written scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntry {
    pub clip: String,
    pub thumbnail: String,
    pub start_time: f64,
    pub end_time: f64,
    pub score: f32,
}

/// Contents of `highlights.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelSummary {
    pub source: String,
    pub duration: f64,
    pub scenes: Vec<SceneEntry>,
    pub failures: Vec<SceneFailure>,
}

/// Write every extracted scene plus the summary into `dir`, creating it if needed.
pub fn write_reel(
    reel: &HighlightReel,
    source: &Path,
    dir: &Path,
    thumbnail_quality: u8,
) -> Result<ReelSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut scenes = Vec::with_capacity(reel.scenes.len());
    let mut failures = reel.failures.clone();
    let selection_indices = (0..).filter(|k| !reel.failures.iter().any(|f| f.index == *k));
    for ((n, extracted), index) in reel.scenes.iter().enumerate().zip(selection_indices) {
        match write_scene(dir, n + 1, extracted, thumbnail_quality) {
            Ok(entry) => scenes.push(entry),
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(
                    scene = index + 1,
                    start = extracted.scene.start_time,
                    reason = %reason,
                    "Failed to write scene, skipping"
                );
                failures.push(SceneFailure {
                    index,
                    start_time: extracted.scene.start_time,
                    reason,
                });
            }
        }
    }
    failures.sort_by_key(|f| f.index);

    let summary = ReelSummary {
        source: source.display().to_string(),
        duration: reel.duration,
        scenes,
        failures,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(dir.join(SUMMARY_FILE), json)
        .with_context(|| format!("Failed to write {SUMMARY_FILE}"))?;

    Ok(summary)
}

/// Write `clip_N.mp4` and `clip_N.jpg`; on failure neither file is left behind.
fn write_scene(
    dir: &Path,
    n: usize,
    extracted: &ExtractedScene,
    thumbnail_quality: u8,
) -> Result<SceneEntry> {
    let clip = format!("clip_{n}.mp4");
    let thumbnail = format!("clip_{n}.jpg");

    let jpeg = encode_jpeg(&extracted.thumbnail, thumbnail_quality)
        .with_context(|| format!("Failed to encode {thumbnail}"))?;
    fs::write(dir.join(&clip), &extracted.clip)
        .with_context(|| format!("Failed to write {clip}"))?;
    if let Err(e) = fs::write(dir.join(&thumbnail), jpeg) {
        let _ = fs::remove_file(dir.join(&clip));
        return Err(e).with_context(|| format!("Failed to write {thumbnail}"));
    }

    Ok(SceneEntry {
        clip,
        thumbnail,
        start_time: extracted.scene.start_time,
        end_time: extracted.scene.end_time,
        score: extracted.scene.score,
    })
}
