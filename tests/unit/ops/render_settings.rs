use super::*;
use crate::graph::memory::MemoryGraph;

fn host() -> MemoryGraph {
    let mut g = MemoryGraph::new();
    for (kind, name) in [
        ("renderGlobals", RENDER_GLOBALS),
        ("RedshiftOptions", RENDERER_OPTIONS),
        ("resolution", RESOLUTION),
    ] {
        g.create(NodeKind::from(kind), name).unwrap();
    }
    g
}

fn get(g: &MemoryGraph, s: &str) -> Option<AttrValue> {
    g.get_attr(&Plug::parse(s).unwrap())
}

#[test]
fn draft_preset_writes_bucket_render_settings() {
    let mut g = host();
    let report = apply_render_settings(&mut g, &RenderPreset::for_tier(QualityTier::Draft))
        .unwrap();
    assert_eq!(report.applied, 14);
    assert_eq!(
        get(&g, "defaultRenderGlobals.imageFilePrefix"),
        Some(AttrValue::Str("<scene>/<scene>".into()))
    );
    assert_eq!(
        get(&g, "defaultRenderGlobals.currentRenderer"),
        Some(AttrValue::Str("redshift".into()))
    );
    assert_eq!(get(&g, "redshiftOptions.bucketSize"), Some(AttrValue::Int(256)));
    assert_eq!(
        get(&g, "redshiftOptions.unifiedAdaptiveErrorThreshold"),
        Some(AttrValue::Float(1.0))
    );
    assert_eq!(get(&g, "defaultResolution.width"), Some(AttrValue::Int(1920)));
}

#[test]
fn tiers_tighten_the_error_threshold() {
    let draft = RenderPreset::for_tier(QualityTier::Draft);
    let preview = RenderPreset::for_tier(QualityTier::Preview);
    let prod = RenderPreset::for_tier(QualityTier::Production);
    assert!(draft.adaptive_error_threshold > preview.adaptive_error_threshold);
    assert!(preview.adaptive_error_threshold > prod.adaptive_error_threshold);
    assert_eq!(draft.prefix, prod.prefix);
}

#[test]
fn camera_is_created_once() {
    let mut g = host();
    let preset = RenderPreset::for_tier(QualityTier::Draft);
    let first = apply_render_settings(&mut g, &preset).unwrap();
    let second = apply_render_settings(&mut g, &preset).unwrap();
    assert!(first.camera_created);
    assert!(!second.camera_created);
    assert_eq!(first.camera, second.camera);
    assert_eq!(g.list(&NodeKind::Camera).len(), 1);
    assert_eq!(get(&g, "Camera.translate"), Some(AttrValue::Float3([0.0, 0.0, 10.0])));
    assert_eq!(get(&g, "CameraShape.renderable"), Some(AttrValue::Bool(true)));
    assert_eq!(get(&g, "CameraShape.focalLength"), Some(AttrValue::Float(35.0)));
}

#[test]
fn missing_renderer_options_is_a_precondition() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::from("renderGlobals"), RENDER_GLOBALS)
        .unwrap();
    let err = apply_render_settings(&mut g, &RenderPreset::for_tier(QualityTier::Draft))
        .unwrap_err();
    assert!(err.is_warning());
    assert!(!g.exists(CAMERA));
}

#[test]
fn tier_parses_from_config_json() {
    let tier: QualityTier = serde_json::from_str("\"production\"").unwrap();
    assert_eq!(tier, QualityTier::Production);
}
