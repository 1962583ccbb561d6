//! Time alignment of the frame and audio feature streams.

use crate::loudness::AudioFeature;
use crate::skin::FrameFeature;
use serde::{Deserialize, Serialize};

/// One frame feature joined with its nearest audio feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedSample {
    /// Frame timestamp in seconds.
    pub time: f64,
    pub skin_confidence: f32,
    /// Intensity of the nearest audio chunk, or 0 if none is within tolerance.
    pub audio_intensity: f32,
}

/// Join every frame with the audio feature closest in time.
///
/// A match farther than `tolerance` seconds contributes 0 intensity. On a
/// distance tie the earlier audio feature wins.
pub fn fuse(frames: &[FrameFeature], audio: &[AudioFeature], tolerance: f64) -> Vec<FusedSample> {
    let sorted = audio.windows(2).all(|w| w[0].time <= w[1].time);

    frames
        .iter()
        .map(|frame| {
            let nearest = if sorted {
                nearest_sorted(audio, frame.time)
            } else {
                nearest_linear(audio, frame.time)
            };
            let audio_intensity = nearest
                .filter(|a| (a.time - frame.time).abs() <= tolerance)
                .map_or(0.0, |a| a.intensity);

            FusedSample {
                time: frame.time,
                skin_confidence: frame.skin_confidence,
                audio_intensity,
            }
        })
        .collect()
}

/// First audio feature with the minimum distance to `time`.
fn nearest_linear(audio: &[AudioFeature], time: f64) -> Option<&AudioFeature> {
    let mut best: Option<(&AudioFeature, f64)> = None;
    for a in audio {
        let dist = (a.time - time).abs();
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((a, dist));
        }
    }
    best.map(|(a, _)| a)
}

/// Same result as [`nearest_linear`] for time-ordered audio, in O(log n).
fn nearest_sorted(audio: &[AudioFeature], time: f64) -> Option<&AudioFeature> {
    let idx = audio.partition_point(|a| a.time < time);

    let before = idx.checked_sub(1).map(|mut i| {
        // Walk back to the first of a run of equal timestamps
        while i > 0 && audio[i - 1].time == audio[i].time {
            i -= 1;
        }
        i
    });
    let after = (idx < audio.len()).then_some(idx);

    match (before, after) {
        (Some(b), Some(a)) => {
            if (time - audio[b].time) <= (audio[a].time - time) {
                Some(&audio[b])
            } else {
                Some(&audio[a])
            }
        }
        (Some(b), None) => Some(&audio[b]),
        (None, Some(a)) => Some(&audio[a]),
        (None, None) => None,
    }
}
