//! Integration test crate for the highlight reel extractor.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! The [`fakes`] module provides in-memory media collaborators so the whole
//! pipeline runs without FFmpeg.

pub mod fakes;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod selection;

#[cfg(test)]
mod media;
