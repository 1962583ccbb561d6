//! Analysis configuration.
//!
//! Every field has a default, so a JSON config file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "scenes": { "window_secs": 15.0, "top_k": 3 } }
//! ```

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted `frame.block_size`.
pub const MAX_BLOCK_SIZE: u32 = 1024;
/// Largest accepted `frame.region_rows` / `frame.region_cols`.
pub const MAX_REGION_SIDE: u32 = 64;
/// Smallest accepted `frame.sample_interval_secs`.
pub const MIN_SAMPLE_INTERVAL_SECS: f64 = 0.01;
/// Most frames a single run will sample.
pub const MAX_FRAME_SAMPLES: usize = 100_000;

/// Frame sampling and skin classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameAnalysisConfig {
    /// Seconds between sampled frames (default: 1.0).
    pub sample_interval_secs: f64,
    /// Side of the square pixel block represented by one sample (default: 4).
    pub block_size: u32,
    /// Region grid rows (default: 3).
    pub region_rows: u32,
    /// Region grid columns (default: 4).
    pub region_cols: u32,
    /// Minimum per-block and per-region confidence counted as skin (default: 0.5).
    pub confidence_threshold: f32,
}

impl Default for FrameAnalysisConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: 1.0,
            block_size: 4,
            region_rows: 3,
            region_cols: 4,
            confidence_threshold: 0.5,
        }
    }
}

/// Audio chunking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioAnalysisConfig {
    /// Chunk length in seconds (default: 0.5).
    pub chunk_secs: f64,
}

impl Default for AudioAnalysisConfig {
    fn default() -> Self {
        Self { chunk_secs: 0.5 }
    }
}

/// Frame/audio alignment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Maximum distance between a frame and its audio match (default: 0.1).
    pub tolerance_secs: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: 0.1,
        }
    }
}

/// Scene window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSelectConfig {
    /// Scene length in seconds (default: 10.0).
    pub window_secs: f64,
    /// Number of scenes to keep (default: 2).
    pub top_k: usize,
}

impl Default for SceneSelectConfig {
    fn default() -> Self {
        Self {
            window_secs: 10.0,
            top_k: 2,
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub frame: FrameAnalysisConfig,
    pub audio: AudioAnalysisConfig,
    pub fusion: FusionConfig,
    pub scenes: SceneSelectConfig,
    /// Offset into each scene at which its thumbnail is taken (default: 1.0).
    pub thumbnail_offset_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame: FrameAnalysisConfig::default(),
            audio: AudioAnalysisConfig::default(),
            fusion: FusionConfig::default(),
            scenes: SceneSelectConfig::default(),
            thumbnail_offset_secs: 1.0,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> AnalysisResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::SerializationError(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> AnalysisResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every value is usable.
    pub fn validate(&self) -> AnalysisResult<()> {
        fn positive(name: &str, value: f64) -> AnalysisResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        positive("frame.sample_interval_secs", self.frame.sample_interval_secs)?;
        positive("audio.chunk_secs", self.audio.chunk_secs)?;
        positive("scenes.window_secs", self.scenes.window_secs)?;

        if self.frame.sample_interval_secs < MIN_SAMPLE_INTERVAL_SECS {
            return Err(AnalysisError::InvalidConfig(format!(
                "frame.sample_interval_secs must be at least {MIN_SAMPLE_INTERVAL_SECS}, got {}",
                self.frame.sample_interval_secs
            )));
        }
        if !(1..=MAX_BLOCK_SIZE).contains(&self.frame.block_size) {
            return Err(AnalysisError::InvalidConfig(format!(
                "frame.block_size must be in 1..={MAX_BLOCK_SIZE}, got {}",
                self.frame.block_size
            )));
        }
        let side = 1..=MAX_REGION_SIDE;
        if !side.contains(&self.frame.region_rows) || !side.contains(&self.frame.region_cols) {
            return Err(AnalysisError::InvalidConfig(format!(
                "region grid must be between 1x1 and {MAX_REGION_SIDE}x{MAX_REGION_SIDE}, got {}x{}",
                self.frame.region_rows, self.frame.region_cols
            )));
        }
        if !(0.0..=1.0).contains(&self.frame.confidence_threshold) {
            return Err(AnalysisError::InvalidConfig(format!(
                "frame.confidence_threshold must be in [0, 1], got {}",
                self.frame.confidence_threshold
            )));
        }
        if !self.fusion.tolerance_secs.is_finite() || self.fusion.tolerance_secs < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "fusion.tolerance_secs must be non-negative, got {}",
                self.fusion.tolerance_secs
            )));
        }
        if !self.thumbnail_offset_secs.is_finite() || self.thumbnail_offset_secs < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "thumbnail_offset_secs must be non-negative, got {}",
                self.thumbnail_offset_secs
            )));
        }
        Ok(())
    }
}
