//! Media file probing to get metadata without full decode.

use crate::process::run_capture;
use highlight_core::{HighlightError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Duration in seconds
    pub duration: f64,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Audio streams
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container format
    pub format: String,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Information about an audio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u16,
}

// Raw ffprobe JSON shapes.

#[derive(Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Deserialize)]
struct FfprobeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    duration: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

impl MediaProbe {
    /// Probe a media file with ffprobe.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(HighlightError::NotFound(format!(
                "File not found: {}",
                path_str
            )));
        }

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            path_str.clone(),
        ];
        let stdout = run_capture(&ffmpeg_sidecar::ffprobe::ffprobe_path(), &args, "ffprobe")?;
        let json = String::from_utf8_lossy(&stdout);
        Self::from_ffprobe_json(&path_str, &json)
    }

    /// Build a probe from ffprobe's `-print_format json` output.
    pub fn from_ffprobe_json(path: &str, json: &str) -> Result<Self> {
        let raw: FfprobeOutput = serde_json::from_str(json).map_err(|e| {
            HighlightError::Serialization(format!("Failed to parse ffprobe output: {e}"))
        })?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut stream_duration: f64 = 0.0;

        for stream in &raw.streams {
            let codec = stream
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            if let Some(d) = stream.duration.as_deref().and_then(|d| d.parse::<f64>().ok()) {
                stream_duration = stream_duration.max(d);
            }
            match stream.codec_type.as_deref() {
                Some("video") => video_streams.push(VideoStreamInfo {
                    index: stream.index,
                    codec,
                    width: stream.width.unwrap_or(0),
                    height: stream.height.unwrap_or(0),
                    frame_rate: stream
                        .r_frame_rate
                        .as_deref()
                        .or(stream.avg_frame_rate.as_deref())
                        .map(parse_frame_rate)
                        .unwrap_or(0.0),
                }),
                Some("audio") => audio_streams.push(AudioStreamInfo {
                    index: stream.index,
                    codec,
                    sample_rate: stream
                        .sample_rate
                        .as_deref()
                        .and_then(|r| r.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                }),
                _ => {}
            }
        }

        let format = raw.format.as_ref();
        let duration = format
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(stream_duration);

        Ok(Self {
            path: path.to_string(),
            duration,
            video_streams,
            audio_streams,
            format: format
                .and_then(|f| f.format_name.clone())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get the primary audio stream info.
    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }
}

/// Parse an ffprobe rate such as `"30000/1001"` or `"25"`.
fn parse_frame_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(0.0);
            if den == 0.0 {
                0.0
            } else {
                num / den
            }
        }
        None => rate.parse().unwrap_or(0.0),
    }
}
