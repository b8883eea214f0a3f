use crate::foundation::core::{AttrValue, NodeKind, NodeRef, Plug};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::{SceneGraph, shapes_of};
use crate::template::render_path::RENDER_GLOBALS;

pub const RENDERER_OPTIONS: &str = "redshiftOptions";
pub const RESOLUTION: &str = "defaultResolution";
pub const CAMERA: &str = "Camera";

/// Render quality preset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Fast bucket renders for look checks.
    #[default]
    Draft,
    Preview,
    Production,
}

/// Values written by [`apply_render_settings`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderPreset {
    pub renderer: String,
    /// Renderer-side image format code (2 = PNG).
    pub renderer_image_format: i64,
    /// Host-side image format code, see [`crate::template::render_path::image_extension`].
    pub image_format: i64,
    pub animation: bool,
    pub prefix: String,
    /// 2 = buckets.
    pub interactive_mode: i64,
    pub denoise: bool,
    /// 3 = OptiX.
    pub denoise_engine: i64,
    pub global_illumination: bool,
    /// 4 = brute force.
    pub secondary_gi_engine: i64,
    pub bucket_size: i64,
    pub adaptive_error_threshold: f64,
    pub width: i64,
    pub height: i64,
}

impl RenderPreset {
    pub fn for_tier(tier: QualityTier) -> Self {
        let base = Self {
            renderer: "redshift".to_string(),
            renderer_image_format: 2,
            image_format: 19,
            animation: true,
            prefix: "<scene>/<scene>".to_string(),
            interactive_mode: 2,
            denoise: true,
            denoise_engine: 3,
            global_illumination: true,
            secondary_gi_engine: 4,
            bucket_size: 256,
            adaptive_error_threshold: 1.0,
            width: 1920,
            height: 1080,
        };
        match tier {
            QualityTier::Draft => base,
            QualityTier::Preview => Self {
                adaptive_error_threshold: 0.1,
                ..base
            },
            QualityTier::Production => Self {
                adaptive_error_threshold: 0.01,
                bucket_size: 128,
                ..base
            },
        }
    }

    /// Every `(plug, value)` pair the preset writes, in order.
    pub fn assignments(&self) -> ShelfResult<Vec<(Plug, AttrValue)>> {
        let g = |attr: &str| Plug::new(RENDER_GLOBALS, attr);
        let r = |attr: &str| Plug::new(RENDERER_OPTIONS, attr);
        let res = |attr: &str| Plug::new(RESOLUTION, attr);
        Ok(vec![
            (g("currentRenderer")?, AttrValue::Str(self.renderer.clone())),
            (g("imageFormat")?, AttrValue::Int(self.image_format)),
            (r("imageFormat")?, AttrValue::Int(self.renderer_image_format)),
            (g("animation")?, AttrValue::Bool(self.animation)),
            (g("imageFilePrefix")?, AttrValue::Str(self.prefix.clone())),
            (r("interactiveRenderingMode")?, AttrValue::Int(self.interactive_mode)),
            (r("denoisingEnabled")?, AttrValue::Bool(self.denoise)),
            (r("denoiseEngine")?, AttrValue::Int(self.denoise_engine)),
            (r("GIEnabled")?, AttrValue::Bool(self.global_illumination)),
            (r("secondaryGIEngine")?, AttrValue::Int(self.secondary_gi_engine)),
            (r("bucketSize")?, AttrValue::Int(self.bucket_size)),
            (
                r("unifiedAdaptiveErrorThreshold")?,
                AttrValue::Float(self.adaptive_error_threshold),
            ),
            (res("width")?, AttrValue::Int(self.width)),
            (res("height")?, AttrValue::Int(self.height)),
        ])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettingsReport {
    pub applied: usize,
    pub camera: NodeRef,
    pub camera_created: bool,
}

/// Write a preset into the render globals, then make sure a render camera exists.
#[tracing::instrument(skip(graph, preset))]
pub fn apply_render_settings<G: SceneGraph + ?Sized>(
    graph: &mut G,
    preset: &RenderPreset,
) -> ShelfResult<RenderSettingsReport> {
    for node in [RENDER_GLOBALS, RENDERER_OPTIONS, RESOLUTION] {
        if !graph.exists(node) {
            return Err(ShelfError::precondition(format!(
                "'{node}' does not exist; is the renderer plugin loaded?"
            )));
        }
    }
    let assignments = preset.assignments()?;
    for (plug, value) in &assignments {
        graph.set_attr(plug, value.clone())?;
    }
    tracing::info!(count = assignments.len(), "render settings applied");

    let (camera, camera_created) = ensure_camera(graph)?;
    Ok(RenderSettingsReport {
        applied: assignments.len(),
        camera,
        camera_created,
    })
}

/// The renderable `Camera`, created at `(0, 0, 10)` when missing.
pub fn ensure_camera<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<(NodeRef, bool)> {
    if let Some(existing) = graph.node(CAMERA) {
        return Ok((existing, false));
    }
    let camera = graph.create(NodeKind::Camera, CAMERA)?;
    graph.set_attr(&camera.plug("translate")?, AttrValue::Float3([0.0, 0.0, 10.0]))?;
    graph.set_attr(&camera.plug("rotate")?, AttrValue::Float3([0.0; 3]))?;
    let shape = shapes_of(graph, &camera.name)
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::graph(format!("camera '{camera}' has no shape")))?;
    for (attr, value) in [
        ("focalLength", AttrValue::Float(35.0)),
        ("nearClipPlane", AttrValue::Float(0.1)),
        ("farClipPlane", AttrValue::Float(10000.0)),
        ("renderable", AttrValue::Bool(true)),
    ] {
        graph.set_attr(&shape.plug(attr)?, value)?;
    }
    tracing::info!(camera = %camera, "created render camera");
    Ok((camera, true))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/render_settings.rs"]
mod tests;
