//! In-memory media collaborators.

use highlight_core::{
    AudioBuffer, ClipCutter, FrameBuffer, FrameCursor, HighlightError, MediaSource, PixelFormat,
    Result,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Light skin tone (matches the light-tone rule).
pub const SKIN: [u8; 3] = [230, 200, 180];
/// Mid skin tone.
pub const MID_SKIN: [u8; 3] = [200, 150, 120];

/// A colored span of the scripted video.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub from: f64,
    pub to: f64,
    pub rgb: [u8; 3],
}

/// A video whose frames and audio are described by time spans.
pub struct ScriptedVideo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    /// Color outside every segment.
    pub background: [u8; 3],
    pub segments: Vec<Segment>,
    pub audio: AudioBuffer,
    pub fail_cursor: bool,
    pub fail_audio: bool,
    /// Seek times that fail.
    pub fail_seeks_at: Vec<f64>,
    seeks: Arc<Mutex<Vec<f64>>>,
}

impl ScriptedVideo {
    /// A black video with a quiet constant audio track.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            width: 32,
            height: 24,
            background: [0, 0, 0],
            segments: Vec::new(),
            audio: tone_track(duration, 100, &[]),
            fail_cursor: false,
            fail_audio: false,
            fail_seeks_at: Vec::new(),
            seeks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Paint `[from, to)` with `rgb`.
    pub fn with_segment(mut self, from: f64, to: f64, rgb: [u8; 3]) -> Self {
        self.segments.push(Segment { from, to, rgb });
        self
    }

    pub fn with_audio(mut self, audio: AudioBuffer) -> Self {
        self.audio = audio;
        self
    }

    /// Every seek made through any cursor, in call order.
    pub fn seeks(&self) -> Vec<f64> {
        self.seeks.lock().clone()
    }

    fn color_at(segments: &[Segment], background: [u8; 3], time: f64) -> [u8; 3] {
        segments
            .iter()
            .rev()
            .find(|s| (s.from..s.to).contains(&time))
            .map_or(background, |s| s.rgb)
    }
}

struct ScriptedCursor {
    width: u32,
    height: u32,
    background: [u8; 3],
    segments: Vec<Segment>,
    fail_seeks_at: Vec<f64>,
    seeks: Arc<Mutex<Vec<f64>>>,
}

impl FrameCursor for ScriptedCursor {
    fn seek(&mut self, time: f64) -> Result<FrameBuffer> {
        self.seeks.lock().push(time);
        if self.fail_seeks_at.contains(&time) {
            return Err(HighlightError::Decoder(format!("seek to {time} failed")));
        }
        let rgb = ScriptedVideo::color_at(&self.segments, self.background, time);
        Ok(FrameBuffer::solid(self.width, self.height, PixelFormat::Rgba8, rgb))
    }
}

impl MediaSource for ScriptedVideo {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn open_cursor(&self) -> Result<Box<dyn FrameCursor>> {
        if self.fail_cursor {
            return Err(HighlightError::NotFound("video stream".into()));
        }
        Ok(Box::new(ScriptedCursor {
            width: self.width,
            height: self.height,
            background: self.background,
            segments: self.segments.clone(),
            fail_seeks_at: self.fail_seeks_at.clone(),
            seeks: Arc::clone(&self.seeks),
        }))
    }

    fn audio(&self) -> Result<AudioBuffer> {
        if self.fail_audio {
            return Err(HighlightError::Decoder("audio decode failed".into()));
        }
        Ok(self.audio.clone())
    }
}

/// Constant-amplitude audio: 0.05 everywhere, `amplitude` inside each
/// `(from, to, amplitude)` span.
pub fn tone_track(duration: f64, sample_rate: u32, loud: &[(f64, f64, f32)]) -> AudioBuffer {
    let count = (duration * sample_rate as f64) as usize;
    let samples = (0..count)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            loud.iter()
                .find(|(from, to, _)| (*from..*to).contains(&t))
                .map_or(0.05, |&(_, _, a)| a)
        })
        .collect();
    AudioBuffer::new(samples, sample_rate)
}

/// Cutter that returns `clip@<start>+<duration>` as the clip bytes.
#[derive(Default)]
pub struct RecordingCutter {
    /// Start times whose cut fails.
    pub fail_at: Vec<f64>,
    cuts: Mutex<Vec<(f64, f64)>>,
}

impl RecordingCutter {
    pub fn failing_at(starts: &[f64]) -> Self {
        Self {
            fail_at: starts.to_vec(),
            ..Default::default()
        }
    }

    /// Successful cuts, sorted by start time.
    pub fn cuts(&self) -> Vec<(f64, f64)> {
        let mut cuts = self.cuts.lock().clone();
        cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        cuts
    }
}

impl ClipCutter for RecordingCutter {
    fn cut(&self, start: f64, duration: f64) -> Result<Vec<u8>> {
        if self.fail_at.contains(&start) {
            return Err(HighlightError::Encoder(format!("cut at {start} failed")));
        }
        self.cuts.lock().push((start, duration));
        Ok(format!("clip@{start}+{duration}").into_bytes())
    }
}
