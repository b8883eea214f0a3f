#![forbid(unsafe_code)]

pub mod config;
pub mod encode;
pub mod foundation;
pub mod graph;
pub mod layout;
pub mod naming;
pub mod ops;
pub mod shell;
pub mod template;

pub use config::ShelfConfig;
pub use encode::ffmpeg::{EncodeJob, FfmpegRunner, FrameFormat};
pub use foundation::core::{AttrValue, FrameRange, NodeKind, NodeRef, Plug, Rect, Vec2};
pub use foundation::error::{ShelfError, ShelfResult};
pub use graph::context::HostContext;
pub use graph::memory::{MemoryGraph, SceneSnapshot};
pub use graph::repo::SceneGraph;
pub use ops::BatchReport;
pub use ops::render_settings::QualityTier;
pub use template::render_path::RenderOutput;
