//! Highlight Analysis - Scene scoring for highlight extraction
//!
//! Provides the analysis half of the system:
//! - Skin-tone prevalence per sampled frame
//! - RMS/peak loudness per audio chunk
//! - Nearest-time fusion of the two signals
//! - Sliding-window scoring and top-K scene selection
//! - The pipeline that drives a [`highlight_core::MediaSource`] through all of it

pub mod config;
pub mod error;
pub mod fusion;
pub mod loudness;
pub mod pipeline;
pub mod progress;
pub mod scenes;
pub mod skin;

pub use config::{
    AnalysisConfig, AudioAnalysisConfig, FrameAnalysisConfig, FusionConfig, SceneSelectConfig,
};
pub use error::{AnalysisError, AnalysisResult};
pub use fusion::{fuse, FusedSample};
pub use loudness::{extract_audio, AudioFeature};
pub use pipeline::{
    analyze, run_highlight_pipeline, ExtractedScene, HighlightReel, SceneAnalysis, SceneFailure,
};
pub use progress::{AnalysisProgress, AnalysisStage, NoProgress, ProgressSink, ProgressTracker};
pub use scenes::{select_scenes, CandidateWindow, SelectedScene};
pub use skin::{extract_frame, extract_frames, FrameFeature, SkinRegion};
