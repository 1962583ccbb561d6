//! JPEG encoding for scene thumbnails.

use highlight_core::{FrameBuffer, HighlightError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

/// Default JPEG quality for thumbnails.
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 70;

/// Encode a frame as a baseline JPEG.
pub fn encode_jpeg(frame: &FrameBuffer, quality: u8) -> Result<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(HighlightError::InvalidParameter(
            "Cannot encode an empty frame".into(),
        ));
    }

    let rgb = frame.to_rgb();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode(&rgb, frame.width, frame.height, ColorType::Rgb8)
        .map_err(|e| HighlightError::Encoder(format!("JPEG encode failed: {e}")))?;
    Ok(out)
}
