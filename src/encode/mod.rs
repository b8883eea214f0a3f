//! External encoder plumbing: ffmpeg job construction and image-sequence discovery.

pub mod ffmpeg;
pub mod sequence;
