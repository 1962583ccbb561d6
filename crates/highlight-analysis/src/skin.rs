//! Skin-tone prevalence per sampled frame.
//!
//! A fixed analytic RGB rule, no model. The frame is sampled on a
//! `block_size` grid (one pixel per block) and every sample that looks like
//! skin contributes to the frame score and to the coarse region grid cell it
//! falls in.

use crate::config::{FrameAnalysisConfig, MAX_BLOCK_SIZE, MAX_REGION_SIDE};
use highlight_core::{FrameBuffer, FrameCursor, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A cell of the coarse region grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Summed block confidence over the cell's block capacity, in `[0, 1]`.
    pub confidence: f32,
}

/// Skin features of one sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameFeature {
    /// Timestamp in seconds.
    pub time: f64,
    /// Frame-level skin confidence (0.0 to 1.0).
    pub skin_confidence: f32,
    /// Grid cells above the confidence threshold, row-major.
    pub regions: Vec<SkinRegion>,
}

/// Whether `(r, g, b)` falls in one of the three skin tone ranges.
pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    // Mid tones
    let mid = r > 95
        && g > 40
        && b > 20
        && r > g
        && r > b
        && (r - g).abs() > 15
        && r - g > 15
        && r - b > 15;
    // Light tones
    let light = r > 220 && g > 190 && b > 170;
    // Dark tones
    let dark = r > 40 && r < 110 && g > 20 && g < 90 && b > 10 && b < 60 && r > g && r > b;

    mid || light || dark
}

/// Skin confidence of a single pixel, 0 when it matches no rule.
pub fn skin_tone_confidence(r: u8, g: u8, b: u8) -> f32 {
    if !is_skin_tone(r, g, b) {
        return 0.0;
    }
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let confidence = (rf.min(255.0) / 255.0)
        * (0.5 + (rf - gf).abs() / 100.0)
        * (0.5 + (rf - bf).abs() / 100.0);
    confidence.min(1.0)
}

/// Analyze one decoded frame.
///
/// Out-of-range block and grid sizes are clamped to the accepted config range.
pub fn extract_frame(frame: &FrameBuffer, time: f64, config: &FrameAnalysisConfig) -> FrameFeature {
    let block = config.block_size.clamp(1, MAX_BLOCK_SIZE);
    let rows = config.region_rows.clamp(1, MAX_REGION_SIDE) as usize;
    let cols = config.region_cols.clamp(1, MAX_REGION_SIDE) as usize;
    let threshold = config.confidence_threshold;

    let width = frame.width as f32;
    let height = frame.height as f32;
    let region_width = width / cols as f32;
    let region_height = height / rows as f32;

    // One accumulator per grid cell, indexed row * cols + col
    let mut region_sums = vec![0.0f32; rows * cols].into_boxed_slice();
    let mut skin_blocks: u32 = 0;
    let mut total_confidence: f32 = 0.0;

    for y in (0..frame.height).step_by(block as usize) {
        let row = ((y as f32 / region_height) as usize).min(rows - 1);
        for x in (0..frame.width).step_by(block as usize) {
            let Some([r, g, b]) = frame.rgb_at(x, y) else {
                continue;
            };
            let confidence = skin_tone_confidence(r, g, b);
            if confidence > threshold {
                skin_blocks += 1;
                total_confidence += confidence;

                let col = ((x as f32 / region_width) as usize).min(cols - 1);
                region_sums[row * cols + col] += confidence;
            }
        }
    }

    let block_area = block as f32 * block as f32;
    let block_capacity = width * height / block_area;
    let skin_ratio = if block_capacity > 0.0 {
        skin_blocks as f32 / block_capacity
    } else {
        0.0
    };
    let avg_confidence = total_confidence / skin_blocks.max(1) as f32;
    let skin_confidence = (skin_ratio * avg_confidence).clamp(0.0, 1.0);

    let region_capacity = region_width * region_height / block_area;
    let regions = region_sums
        .iter()
        .enumerate()
        .filter_map(|(i, &sum)| {
            let confidence = if region_capacity > 0.0 {
                (sum / region_capacity).min(1.0)
            } else {
                0.0
            };
            (confidence > threshold).then(|| SkinRegion {
                x: (i % cols) as f32 * region_width,
                y: (i / cols) as f32 * region_height,
                width: region_width,
                height: region_height,
                confidence,
            })
        })
        .collect();

    FrameFeature {
        time,
        skin_confidence,
        regions,
    }
}

/// Number of instants [`sample_times`] yields, without allocating.
pub fn sample_count(duration: f64, interval: f64) -> usize {
    if duration.is_nan() || interval.is_nan() || duration <= 0.0 || interval <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast
    (duration / interval).ceil() as usize
}

/// Sample instants `0, interval, 2 * interval, ...` strictly before `duration`.
pub fn sample_times(duration: f64, interval: f64) -> Vec<f64> {
    (0..sample_count(duration, interval))
        .map(|i| i as f64 * interval)
        .filter(|&t| t < duration)
        .collect()
}

/// Seek through the whole video and analyze every sampled instant.
///
/// `on_progress` receives the fraction of instants processed. The first
/// failed seek aborts the pass.
pub fn extract_frames(
    cursor: &mut dyn FrameCursor,
    duration: f64,
    config: &FrameAnalysisConfig,
    mut on_progress: impl FnMut(f32),
) -> Result<Vec<FrameFeature>> {
    let times = sample_times(duration, config.sample_interval_secs);
    let total = times.len();
    let mut features = Vec::with_capacity(total);

    for (i, &time) in times.iter().enumerate() {
        let frame = cursor.seek(time)?;
        let feature = extract_frame(&frame, time, config);
        debug!(
            time,
            skin = feature.skin_confidence,
            regions = feature.regions.len(),
            "Frame analyzed"
        );
        features.push(feature);
        on_progress((i + 1) as f32 / total as f32);
    }

    Ok(features)
}
