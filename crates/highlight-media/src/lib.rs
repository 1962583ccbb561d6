//! Highlight Media - FFmpeg integration for video/audio I/O
//!
//! This crate handles:
//! - Media file probing (ffprobe)
//! - Seek-and-decode of single RGBA frames
//! - Whole-track audio decoding
//! - Stream-copy clip cutting
//! - JPEG thumbnail encoding

pub mod cutter;
pub mod decoder;
pub mod probe;
mod process;
pub mod thumbnail;

pub use cutter::StreamCopyCutter;
pub use decoder::{FfmpegFrameCursor, VideoDecoder};
pub use probe::MediaProbe;
pub use thumbnail::{encode_jpeg, DEFAULT_THUMBNAIL_QUALITY};

use highlight_core::{HighlightError, Result};

/// Check that the FFmpeg toolchain is reachable (call once at startup).
pub fn init() -> Result<()> {
    if !ffmpeg_sidecar::command::ffmpeg_is_installed() {
        return Err(HighlightError::NotFound(format!(
            "ffmpeg not found at {}",
            ffmpeg_sidecar::paths::ffmpeg_path().display()
        )));
    }
    if !ffmpeg_sidecar::ffprobe::ffprobe_is_installed() {
        return Err(HighlightError::NotFound(format!(
            "ffprobe not found at {}",
            ffmpeg_sidecar::ffprobe::ffprobe_path().display()
        )));
    }
    tracing::info!("Highlight media initialized");
    Ok(())
}
