//! Sliding-window scene scoring and top-K selection.

use crate::fusion::FusedSample;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight of mean skin confidence in a window score.
pub const SKIN_WEIGHT: f32 = 0.7;
/// Weight of mean audio intensity in a window score.
pub const AUDIO_WEIGHT: f32 = 0.3;

/// A scored window starting at one fused sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateWindow {
    pub start_time: f64,
    pub score: f32,
}

/// A window chosen for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedScene {
    pub start_time: f64,
    /// `start_time + window`, clamped to the video duration.
    pub end_time: f64,
    pub score: f32,
}

impl SelectedScene {
    /// Length of the scene in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Score a window at every fused sample whose window fits inside the
/// sampled range.
///
/// `fused` must be ordered by time. A window `[t, t + window_secs)` fits when
/// the last sample lies at or past its end. Windows overlap freely.
pub fn score_candidates(fused: &[FusedSample], window_secs: f64) -> Vec<CandidateWindow> {
    let Some(last) = fused.last() else {
        return Vec::new();
    };
    if window_secs.is_nan() || window_secs <= 0.0 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for (i, sample) in fused.iter().enumerate() {
        let start = sample.time;
        let end = start + window_secs;
        if last.time < end {
            break;
        }

        let len = fused[i..].partition_point(|s| s.time < end);
        let window = &fused[i..i + len];
        candidates.push(CandidateWindow {
            start_time: start,
            score: window_score(window),
        });
    }
    candidates
}

/// Weighted mean of skin confidence and audio intensity over `window`.
fn window_score(window: &[FusedSample]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let n = window.len() as f32;
    let skin = window.iter().map(|s| s.skin_confidence).sum::<f32>() / n;
    let audio = window.iter().map(|s| s.audio_intensity).sum::<f32>() / n;
    SKIN_WEIGHT * skin + AUDIO_WEIGHT * audio
}

/// Pick the `top_k` best windows and return them in chronological order.
///
/// Equal scores keep their start order. Selected scenes may overlap.
pub fn select_scenes(
    fused: &[FusedSample],
    window_secs: f64,
    top_k: usize,
    total_duration: f64,
) -> Vec<SelectedScene> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut candidates = score_candidates(fused, window_secs);
    let considered = candidates.len();

    // Vec::sort_by is stable
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_k);
    candidates.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let scenes: Vec<SelectedScene> = candidates
        .into_iter()
        .map(|c| SelectedScene {
            start_time: c.start_time,
            end_time: (c.start_time + window_secs).min(total_duration),
            score: c.score,
        })
        .collect();

    debug!(
        candidates = considered,
        selected = scenes.len(),
        window_secs,
        "Scenes selected"
    );
    scenes
}
