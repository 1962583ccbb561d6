//! Highlight Core - Foundation types for highlight extraction
//!
//! This crate provides the fundamental types shared by the other crates:
//! - Frame buffers and pixel formats
//! - The error type used by media collaborators
//! - The collaborator traits the analysis pipeline consumes

pub mod error;
pub mod frame;
pub mod media;

pub use error::{HighlightError, Result};
pub use frame::{FrameBuffer, PixelFormat};
pub use media::{AudioBuffer, ClipCutter, FrameCursor, MediaSource};
