//! Collaborator traits between the analysis pipeline and a media backend.
//!
//! The pipeline never decodes or muxes anything itself. It asks a
//! [`MediaSource`] for frames and audio and a [`ClipCutter`] for sub-clips.

use crate::error::Result;
use crate::frame::FrameBuffer;

/// Whole-track mono audio, decoded to `f32` samples in `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    /// Linear samples.
    pub samples: Vec<f32>,
    /// Samples per second.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create an audio buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds, or 0 for an empty or rate-less buffer.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True when there are no samples to analyze.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() || self.sample_rate == 0
    }
}

/// A seekable read cursor over the video stream.
///
/// Cursors are scoped: whatever decoder state a cursor holds is released
/// when it is dropped, whether or not the last read succeeded.
pub trait FrameCursor: Send {
    /// Decode the frame at (or near) `time` seconds.
    ///
    /// Every call within one run returns a frame with the same dimensions.
    fn seek(&mut self, time: f64) -> Result<FrameBuffer>;
}

/// A decodable media file.
pub trait MediaSource: Send + Sync {
    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Open a fresh frame cursor.
    fn open_cursor(&self) -> Result<Box<dyn FrameCursor>>;

    /// Decode the whole audio track.
    ///
    /// Sources without audio return an empty buffer rather than an error.
    fn audio(&self) -> Result<AudioBuffer>;
}

/// Cuts playable sub-clips out of a source without re-encoding.
pub trait ClipCutter: Send + Sync {
    /// Cut `duration` seconds starting at `start`.
    ///
    /// Implementations may snap to the nearest keyframe.
    fn cut(&self, start: f64, duration: f64) -> Result<Vec<u8>>;
}
