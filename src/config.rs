use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::{DEFAULT_FFMPEG, FfmpegRunner},
    foundation::error::{ShelfError, ShelfResult},
    ops::{
        cleanup::{
            DEFAULT_LOAD_PLUGINS, DEFAULT_PLUGIN_NODES, DEFAULT_PRUNE_KEYWORDS,
            DEFAULT_UNLOAD_PLUGINS,
        },
        material::{DEFAULT_CONVERTIBLE_TYPES, DEFAULT_MATERIAL_TYPE},
        render_settings::QualityTier,
    },
    shell::launch::{DEFAULT_RENDER_COMMAND, DEFAULT_VIEWER},
};

/// Where the Windows ffmpeg builds are usually unpacked.
pub const WINDOWS_FFMPEG_DIR: &str = "C:/ffmpeg/ffmpeg-master-latest-win64-gpl/bin";

/// User-tunable settings. Every field has a default, so a config file only needs the overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub quality: QualityTier,
    /// Shader type created by material assignment and conversion.
    pub material_type: String,
    /// Surface shader types that conversion replaces.
    pub convertible_types: Vec<String>,
    pub unload_plugins: Vec<String>,
    /// Nodes a plugin leaves behind that must be removed before it can unload.
    pub plugin_default_nodes: Vec<String>,
    pub load_plugins: Vec<String>,
    pub prune_keywords: Vec<String>,
    pub ffmpeg: PathBuf,
    /// Extra directory searched for `ffmpeg` after `PATH`.
    pub ffmpeg_search_path: Option<PathBuf>,
    pub viewer: PathBuf,
    pub render_command: PathBuf,
    /// Frame rate for sequence conversion; the host time unit is used when unset.
    pub fps: Option<f64>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            quality: QualityTier::default(),
            material_type: DEFAULT_MATERIAL_TYPE.to_string(),
            convertible_types: strings(DEFAULT_CONVERTIBLE_TYPES),
            unload_plugins: strings(DEFAULT_UNLOAD_PLUGINS),
            plugin_default_nodes: strings(DEFAULT_PLUGIN_NODES),
            load_plugins: strings(DEFAULT_LOAD_PLUGINS),
            prune_keywords: strings(DEFAULT_PRUNE_KEYWORDS),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            ffmpeg_search_path: cfg!(windows).then(|| PathBuf::from(WINDOWS_FFMPEG_DIR)),
            viewer: PathBuf::from(DEFAULT_VIEWER),
            render_command: PathBuf::from(DEFAULT_RENDER_COMMAND),
            fps: None,
        }
    }
}

impl ShelfConfig {
    pub fn from_path(path: &Path) -> ShelfResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> ShelfResult<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| ShelfError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> ShelfResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ShelfResult<()> {
        if self.material_type.trim().is_empty() {
            return Err(ShelfError::validation("material_type must be non-empty"));
        }
        if self.ffmpeg.as_os_str().is_empty() {
            return Err(ShelfError::validation("ffmpeg must be non-empty"));
        }
        if self.render_command.as_os_str().is_empty() {
            return Err(ShelfError::validation("render_command must be non-empty"));
        }
        if let Some(fps) = self.fps
            && (!fps.is_finite() || fps <= 0.0)
        {
            return Err(ShelfError::validation(format!(
                "fps must be positive, got {fps}"
            )));
        }
        Ok(())
    }

    pub fn ffmpeg_runner(&self) -> FfmpegRunner {
        let runner = FfmpegRunner::new(&self.ffmpeg);
        match &self.ffmpeg_search_path {
            Some(dir) => runner.with_search_path(dir),
            None => runner,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
