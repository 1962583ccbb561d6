//! Per-chunk loudness of the audio track.
//!
//! Intensity blends RMS energy with peak amplitude and is normalized against
//! the loudest chunk of the whole track, so the pass buffers every chunk
//! before emitting anything.

use serde::{Deserialize, Serialize};

/// Weight of chunk RMS in the raw intensity.
pub const RMS_WEIGHT: f32 = 0.7;
/// Weight of chunk peak amplitude in the raw intensity.
pub const PEAK_WEIGHT: f32 = 0.3;

/// Loudness of one audio chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeature {
    /// Chunk start in seconds.
    pub time: f64,
    /// Normalized intensity (0.0 to 1.0).
    pub intensity: f32,
}

/// Raw (unnormalized) intensity of a chunk.
pub fn chunk_intensity(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = chunk.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / chunk.len() as f64).sqrt() as f32;
    let peak = chunk.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    rms * RMS_WEIGHT + peak * PEAK_WEIGHT
}

/// Split `samples` into `chunk_secs` chunks and score each one.
///
/// The final partial chunk is kept. `on_progress` receives the fraction of
/// chunks measured during the first pass. A silent track comes back as
/// all-zero intensities.
pub fn extract_audio(
    samples: &[f32],
    sample_rate: u32,
    chunk_secs: f64,
    mut on_progress: impl FnMut(f32),
) -> Vec<AudioFeature> {
    if samples.is_empty() || sample_rate == 0 || chunk_secs.is_nan() || chunk_secs <= 0.0 {
        return Vec::new();
    }

    let chunk_len = ((sample_rate as f64 * chunk_secs) as usize).max(1);
    let total = samples.len().div_ceil(chunk_len);

    let mut features = Vec::with_capacity(total);
    for (i, chunk) in samples.chunks(chunk_len).enumerate() {
        features.push(AudioFeature {
            time: i as f64 * chunk_secs,
            intensity: chunk_intensity(chunk),
        });
        on_progress((i + 1) as f32 / total as f32);
    }

    normalize(&mut features);
    features
}

/// Divide every intensity by the track maximum. A zero maximum leaves
/// everything at zero.
fn normalize(features: &mut [AudioFeature]) {
    let max = features.iter().fold(0.0f32, |m, f| m.max(f.intensity));
    if max > 0.0 {
        for f in features.iter_mut() {
            f.intensity /= max;
        }
    }
}
