//! Frame buffer types for decoded video frames in CPU memory.

use crate::error::{HighlightError, Result};
use serde::{Deserialize, Serialize};

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 8-bit RGB (24 bits per pixel)
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
        }
    }

    /// FFmpeg `-pix_fmt` name for this format.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Self::Rgba8 => "rgba",
            Self::Rgb8 => "rgb24",
        }
    }

    /// Calculate total bytes needed for a tightly packed frame of this format.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// A single decoded frame in CPU memory.
///
/// Pixels are packed, one row after another, `stride` bytes apart.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Bytes per row (may include padding)
    pub stride: usize,
    /// Raw pixel data
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a zeroed frame buffer with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self {
            format,
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Wrap tightly packed pixel data, e.g. the stdout of an FFmpeg rawvideo pipe.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = format.frame_size(width, height);
        if data.len() < expected {
            return Err(HighlightError::Decoder(format!(
                "Short frame: expected {expected} bytes for {width}x{height} {format:?}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            format,
            width,
            height,
            stride: width as usize * format.bytes_per_pixel(),
            data,
        })
    }

    /// Create a frame filled with a single opaque color.
    pub fn solid(width: u32, height: u32, format: PixelFormat, rgb: [u8; 3]) -> Self {
        let mut frame = Self::new(width, height, format);
        let bpp = format.bytes_per_pixel();
        for y in 0..height {
            for px in frame.row_mut(y).chunks_exact_mut(bpp) {
                px[..3].copy_from_slice(&rgb);
                if bpp == 4 {
                    px[3] = 255;
                }
            }
        }
        frame
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.format.bytes_per_pixel();
        &self.data[start..end]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * self.format.bytes_per_pixel();
        &mut self.data[start..end]
    }

    /// RGB components of the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride + x as usize * self.format.bytes_per_pixel();
        self.data.get(i..i + 3).map(|p| [p[0], p[1], p[2]])
    }

    /// Copy the frame into a tightly packed RGB24 buffer, dropping alpha.
    pub fn to_rgb(&self) -> Vec<u8> {
        let bpp = self.format.bytes_per_pixel();
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for px in self.row(y).chunks_exact(bpp) {
                rgb.extend_from_slice(&px[..3]);
            }
        }
        rgb
    }
}
