//! Stream-copy clip cutting.
//!
//! Clips keep the source codecs (`-c copy`), so cuts land on the nearest
//! keyframe rather than the exact requested boundary.

use crate::process::{format_seconds, run_capture};
use highlight_core::{ClipCutter, HighlightError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cuts sub-clips from one source file into in-memory MP4 buffers.
#[derive(Debug, Clone)]
pub struct StreamCopyCutter {
    source: PathBuf,
}

impl StreamCopyCutter {
    /// Create a cutter for the given source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The source file clips are cut from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Build the FFmpeg command arguments for one cut.
    pub fn ffmpeg_args(&self, start: f64, duration: f64) -> Vec<String> {
        let mut args: Vec<String> = vec!["-v".into(), "error".into()];

        // Input seek
        args.extend_from_slice(&[
            "-ss".into(),
            format_seconds(start),
            "-i".into(),
            self.source.to_string_lossy().into_owned(),
            "-t".into(),
            format_seconds(duration),
        ]);

        // Stream copy, no re-encode
        args.extend_from_slice(&[
            "-c:v".into(),
            "copy".into(),
            "-c:a".into(),
            "copy".into(),
            "-avoid_negative_ts".into(),
            "make_zero".into(),
        ]);

        // MP4 needs fragmenting to be written to a pipe
        args.extend_from_slice(&[
            "-movflags".into(),
            "frag_keyframe+empty_moov".into(),
            "-f".into(),
            "mp4".into(),
            "pipe:1".into(),
        ]);

        args
    }
}

impl ClipCutter for StreamCopyCutter {
    fn cut(&self, start: f64, duration: f64) -> Result<Vec<u8>> {
        if !start.is_finite() || start < 0.0 || duration.is_nan() || duration <= 0.0 {
            return Err(HighlightError::InvalidParameter(format!(
                "Invalid cut range: start={start}, duration={duration}"
            )));
        }

        let clip = run_capture(
            &ffmpeg_sidecar::paths::ffmpeg_path(),
            &self.ffmpeg_args(start, duration),
            "clip cut",
        )
        .map_err(|e| HighlightError::Encoder(e.to_string()))?;

        if clip.is_empty() {
            return Err(HighlightError::Encoder(format!(
                "Empty clip for {start:.3}s +{duration:.3}s"
            )));
        }
        debug!(start, duration, bytes = clip.len(), "Clip cut");
        Ok(clip)
    }
}
