use std::path::{Path, PathBuf};

use crate::foundation::core::FrameRange;
use crate::foundation::error::{ShelfError, ShelfResult};

/// Host session state that lives outside the node graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HostContext {
    /// Path of the open document; `None` until it has been saved once.
    pub scene_path: Option<PathBuf>,
    /// Project (workspace) root directory.
    pub project_root: PathBuf,
    /// Project-relative directory of the `images` file rule.
    pub images_rule: String,
    /// Current render layer as reported by the host, possibly a DAG-style path.
    pub render_layer: Option<String>,
    /// Host time unit name (`film`, `pal`, `ntsc`, ...).
    pub time_unit: String,
    /// Timeline playback range.
    pub playback: FrameRange,
    /// Most recent documents first.
    pub recent_files: Vec<PathBuf>,
}

impl Default for HostContext {
    fn default() -> Self {
        Self {
            scene_path: None,
            project_root: PathBuf::from("."),
            images_rule: "images".to_string(),
            render_layer: None,
            time_unit: "film".to_string(),
            playback: FrameRange { start: 1, end: 120 },
            recent_files: Vec::new(),
        }
    }
}

pub const DEFAULT_RENDER_LAYER: &str = "defaultRenderLayer";

impl HostContext {
    /// Saved document path, or a hard stop if the document was never saved.
    pub fn require_scene_path(&self) -> ShelfResult<&Path> {
        self.scene_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                ShelfError::unsaved("save the scene before running this operation")
            })
    }

    /// Document file stem (`shot010` for `/proj/scenes/shot010.ma`).
    pub fn scene_name(&self) -> ShelfResult<String> {
        let path = self.require_scene_path()?;
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ShelfError::validation(format!(
                    "scene path '{}' has no file stem",
                    path.display()
                ))
            })
    }

    /// Leaf of the current render layer, defaulting to the master layer.
    pub fn render_layer_name(&self) -> &str {
        self.render_layer
            .as_deref()
            .and_then(|l| l.rsplit('|').next())
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_RENDER_LAYER)
    }

    /// Directory renders are written to (`<project>/<images rule>`).
    pub fn render_directory(&self) -> PathBuf {
        self.project_root.join(&self.images_rule)
    }

    /// The most recent document; a precondition if it no longer exists.
    pub fn most_recent_file(&self) -> ShelfResult<&Path> {
        let first = self
            .recent_files
            .first()
            .ok_or_else(|| ShelfError::precondition("no recent files found"))?;
        if !first.exists() {
            return Err(ShelfError::precondition(format!(
                "the most recent file '{}' no longer exists",
                first.display()
            )));
        }
        Ok(first)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/context.rs"]
mod tests;
