//! Output-path templates.

pub mod render_path;
pub mod tokens;
