//! Video decoder that shells out to FFmpeg for each seek.

use crate::probe::MediaProbe;
use crate::process::{format_seconds, run_capture};
use highlight_core::{
    AudioBuffer, FrameBuffer, FrameCursor, HighlightError, MediaSource, PixelFormat, Result,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Video decoder using FFmpeg.
///
/// Spawns FFmpeg as a subprocess per request, which works without system
/// FFmpeg development headers. Frames come back as RGBA8 scaled to the
/// probed dimensions so every seek yields the same canvas.
pub struct VideoDecoder {
    path: PathBuf,
    probe: MediaProbe,
    width: u32,
    height: u32,
}

impl VideoDecoder {
    /// Open a video file for decoding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening video file: {}", path.display());

        let probe = MediaProbe::probe(path)?;
        let video = probe.primary_video().ok_or_else(|| {
            HighlightError::UnsupportedFormat(format!("No video stream in {}", path.display()))
        })?;
        if video.width == 0 || video.height == 0 {
            return Err(HighlightError::UnsupportedFormat(format!(
                "Video stream has no dimensions: {}",
                path.display()
            )));
        }

        let (width, height) = (video.width, video.height);
        info!(
            width,
            height,
            duration = probe.duration,
            has_audio = probe.has_audio(),
            "Video opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            probe,
            width,
            height,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the video dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the probe results.
    pub fn probe(&self) -> &MediaProbe {
        &self.probe
    }

    fn audio_args(&self) -> Vec<String> {
        vec![
            "-v".into(),
            "error".into(),
            "-i".into(),
            self.path.to_string_lossy().into_owned(),
            // Same stream as `primary_audio`, whose sample rate is reported
            "-map".into(),
            "0:a:0".into(),
            "-vn".into(),
            // First channel only
            "-af".into(),
            "pan=mono|c0=c0".into(),
            "-f".into(),
            "f32le".into(),
            "-acodec".into(),
            "pcm_f32le".into(),
            "pipe:1".into(),
        ]
    }
}

impl MediaSource for VideoDecoder {
    fn duration(&self) -> f64 {
        self.probe.duration
    }

    fn open_cursor(&self) -> Result<Box<dyn FrameCursor>> {
        Ok(Box::new(FfmpegFrameCursor {
            path: self.path.clone(),
            width: self.width,
            height: self.height,
            frames_read: 0,
        }))
    }

    fn audio(&self) -> Result<AudioBuffer> {
        let Some(stream) = self.probe.primary_audio() else {
            info!("No audio stream; continuing with video only");
            return Ok(AudioBuffer::default());
        };

        let bytes = run_capture(
            &ffmpeg_sidecar::paths::ffmpeg_path(),
            &self.audio_args(),
            "audio decode",
        )?;
        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let buffer = AudioBuffer::new(samples, stream.sample_rate);
        info!(
            samples = buffer.samples.len(),
            sample_rate = buffer.sample_rate,
            seconds = buffer.duration_secs(),
            "Audio decoded"
        );
        Ok(buffer)
    }
}

/// A frame cursor backed by one FFmpeg invocation per seek.
///
/// Each child process is reaped before `seek` returns, so dropping the
/// cursor never leaves a decoder running.
pub struct FfmpegFrameCursor {
    path: PathBuf,
    width: u32,
    height: u32,
    frames_read: u64,
}

impl FfmpegFrameCursor {
    /// Build the FFmpeg command arguments for a single-frame seek.
    pub fn seek_args(&self, time: f64) -> Vec<String> {
        vec![
            "-v".into(),
            "error".into(),
            "-ss".into(),
            format_seconds(time),
            "-i".into(),
            self.path.to_string_lossy().into_owned(),
            "-frames:v".into(),
            "1".into(),
            "-vf".into(),
            format!("scale={}:{}", self.width, self.height),
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            PixelFormat::Rgba8.ffmpeg_name().into(),
            "pipe:1".into(),
        ]
    }
}

impl FrameCursor for FfmpegFrameCursor {
    fn seek(&mut self, time: f64) -> Result<FrameBuffer> {
        let mut data = run_capture(
            &ffmpeg_sidecar::paths::ffmpeg_path(),
            &self.seek_args(time),
            "frame decode",
        )?;
        if data.is_empty() {
            return Err(HighlightError::Decoder(format!(
                "No frame decoded at {time:.3}s"
            )));
        }

        data.truncate(PixelFormat::Rgba8.frame_size(self.width, self.height));
        let frame = FrameBuffer::from_raw(self.width, self.height, PixelFormat::Rgba8, data)?;
        self.frames_read += 1;
        debug!(time, frames_read = self.frames_read, "Frame decoded");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_args() {
        let cursor = FfmpegFrameCursor {
            path: PathBuf::from("/tmp/in.mp4"),
            width: 640,
            height: 360,
            frames_read: 0,
        };
        let args = cursor.seek_args(4.5);
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "4.500");
        // Seek must come before the input for fast seeking
        assert!(ss < args.iter().position(|a| a == "-i").unwrap());
        assert!(args.contains(&"scale=640:360".to_string()));
        assert!(args.contains(&"rgba".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_audio_args_select_first_stream() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 640, "height": 360},
                {"index": 1, "codec_type": "audio", "codec_name": "aac", "sample_rate": "44100", "channels": 2},
                {"index": 2, "codec_type": "audio", "codec_name": "ac3", "sample_rate": "48000", "channels": 6}
            ],
            "format": {"format_name": "mov,mp4", "duration": "12.0"}
        }"#;
        let decoder = VideoDecoder {
            path: PathBuf::from("/tmp/in.mp4"),
            probe: MediaProbe::from_ffprobe_json("/tmp/in.mp4", json).unwrap(),
            width: 640,
            height: 360,
        };
        assert_eq!(decoder.probe().primary_audio().map(|a| a.sample_rate), Some(44100));

        let args = decoder.audio_args();
        let map = args.iter().position(|a| a == "-map").unwrap();
        assert_eq!(args[map + 1], "0:a:0");
        assert!(map > args.iter().position(|a| a == "-i").unwrap());
        assert!(args.contains(&"pan=mono|c0=c0".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            VideoDecoder::open("/no/such/video.mp4"),
            Err(HighlightError::NotFound(_))
        ));
    }
}
