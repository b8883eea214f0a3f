use std::path::{Path, PathBuf};

use crate::foundation::core::{AttrValue, FrameRange, Plug};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::context::HostContext;
use crate::graph::repo::SceneGraph;
use crate::template::tokens::TokenValues;

/// Node holding the host's common render settings.
pub const RENDER_GLOBALS: &str = "defaultRenderGlobals";

pub const DEFAULT_FRAME_PADDING: usize = 4;

/// Extension for the host's numeric image-format code; unknown codes map to `png`.
pub fn image_extension(code: i64) -> &'static str {
    match code {
        0 | 6 | 10 | 11 | 12 => "iff",
        1 => "cin",
        2 => "tga",
        3 => "tif",
        4 => "sgi",
        5 => "als",
        7 => "jpg",
        8 => "jpeg",
        9 => "eps",
        13 => "bmp",
        19 => "png",
        20 => "qt",
        21 => "avi",
        22 => "mov",
        23 => "exr",
        24 => "dpx",
        _ => "png",
    }
}

pub(crate) fn globals_plug(attr: &str) -> ShelfResult<Plug> {
    Plug::new(RENDER_GLOBALS, attr)
}

fn read_i64<G: SceneGraph + ?Sized>(graph: &G, attr: &str) -> ShelfResult<Option<i64>> {
    Ok(graph
        .get_attr(&globals_plug(attr)?)
        .as_ref()
        .and_then(|v| v.as_f64())
        .map(|v| v.round() as i64))
}

/// Render settings read from [`RENDER_GLOBALS`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderGlobals {
    pub prefix: String,
    pub padding: usize,
    pub image_format: i64,
    pub range: FrameRange,
}

impl RenderGlobals {
    pub fn from_graph<G: SceneGraph + ?Sized>(graph: &G) -> ShelfResult<Self> {
        if !graph.exists(RENDER_GLOBALS) {
            return Err(ShelfError::precondition(format!(
                "'{RENDER_GLOBALS}' does not exist in the scene"
            )));
        }
        let prefix = graph
            .get_attr(&globals_plug("imageFilePrefix")?)
            .as_ref()
            .and_then(AttrValue::as_str)
            .unwrap_or_default()
            .to_string();
        let padding = read_i64(graph, "extensionPadding")?
            .and_then(|p| usize::try_from(p).ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_FRAME_PADDING);
        let image_format = read_i64(graph, "imageFormat")?.unwrap_or(-1);
        let start = read_i64(graph, "startFrame")?.unwrap_or(1);
        let end = read_i64(graph, "endFrame")?.unwrap_or(start);
        Ok(Self {
            prefix,
            padding,
            image_format,
            range: FrameRange::new(start, end)?,
        })
    }
}

/// Where a render writes its frames, with every token resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    pub directory: PathBuf,
    /// Resolved file prefix; may contain sub-directories (`shot010/shot010`).
    pub prefix: String,
    pub padding: usize,
    pub extension: String,
    pub range: FrameRange,
}

impl RenderOutput {
    /// Resolve the output location; an empty prefix means the scene name.
    pub fn resolve(globals: &RenderGlobals, ctx: &HostContext) -> ShelfResult<Self> {
        let values = TokenValues {
            scene: ctx.scene_name()?,
            render_layer: ctx.render_layer_name().to_string(),
        };
        let template = if globals.prefix.is_empty() {
            values.scene.clone()
        } else {
            globals.prefix.clone()
        };
        let prefix = values.resolve(&template)?;
        // Directory-level tokens are legal too.
        let directory = values.resolve(&ctx.render_directory().to_string_lossy())?;
        Ok(Self {
            directory: PathBuf::from(directory),
            prefix,
            padding: globals.padding,
            extension: image_extension(globals.image_format).to_string(),
            range: globals.range,
        })
    }

    pub fn from_graph<G: SceneGraph + ?Sized>(graph: &G, ctx: &HostContext) -> ShelfResult<Self> {
        Self::resolve(&RenderGlobals::from_graph(graph)?, ctx)
    }

    /// `<prefix>.<frame>.<ext>` relative to [`RenderOutput::directory`].
    pub fn frame_file(&self, frame: i64) -> String {
        format!(
            "{}.{:0width$}.{}",
            self.prefix,
            frame,
            self.extension,
            width = self.padding
        )
    }

    pub fn frame_path(&self, frame: i64) -> PathBuf {
        self.directory.join(self.frame_file(frame))
    }

    pub fn first_frame_path(&self) -> PathBuf {
        self.frame_path(self.range.start)
    }

    /// All-zero frame path the host shows in its render settings.
    pub fn placeholder_path(&self) -> PathBuf {
        self.frame_path(0)
    }

    /// printf-style sequence pattern (`prefix.%04d.png`).
    pub fn frame_pattern(&self) -> String {
        format!("{}.%0{}d.{}", self.prefix, self.padding, self.extension)
    }

    pub fn sequence_pattern_path(&self) -> PathBuf {
        self.directory.join(self.frame_pattern())
    }

    /// Movie next to the frames (`prefix.mov`).
    pub fn movie_path(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{extension}", self.prefix))
    }

    /// Directory the frame files actually land in.
    pub fn frames_dir(&self) -> PathBuf {
        self.directory
            .join(&self.prefix)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.directory.clone())
    }

    /// File-name part of the prefix.
    pub fn file_stem(&self) -> &str {
        self.prefix.rsplit('/').next().unwrap_or(&self.prefix)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/render_path.rs"]
mod tests;
