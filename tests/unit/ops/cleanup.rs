use super::*;
use crate::foundation::core::AttrValue;
use crate::graph::memory::MemoryGraph;

fn plug(s: &str) -> Plug {
    Plug::parse(s).unwrap()
}

fn shaded(g: &mut MemoryGraph, mat: &str, member: Option<&str>) {
    g.create(NodeKind::from("blinn"), mat).unwrap();
    let sg = format!("{mat}SG");
    g.create(NodeKind::ShadingEngine, &sg).unwrap();
    g.connect(&plug(&format!("{mat}.outColor")), &plug(&format!("{sg}.surfaceShader")), false)
        .unwrap();
    if let Some(m) = member {
        g.force_element(&sg, &[m.to_string()]).unwrap();
    }
}

#[test]
fn deletes_only_unused_non_default_materials() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Mesh, "cube").unwrap();
    g.create(NodeKind::from("lambert"), "lambert1").unwrap();
    shaded(&mut g, "used", Some("cubeShape"));
    shaded(&mut g, "orphan", None);
    g.create(NodeKind::from("phong"), "loose").unwrap();

    let report = delete_unused_materials(&mut g);
    assert_eq!(report.done, vec!["orphan".to_string(), "loose".to_string()]);
    assert!(g.exists("used"));
    assert!(g.exists("lambert1"));
    assert!(!g.exists("orphan"));
}

#[test]
fn locked_material_is_skipped() {
    let mut g = MemoryGraph::new();
    shaded(&mut g, "keep", None);
    g.set_locked("keep", true).unwrap();
    let report = delete_unused_materials(&mut g);
    assert_eq!(report.skipped.len(), 1);
    assert!(g.exists("keep"));
}

fn arnold_scene() -> MemoryGraph {
    let mut g = MemoryGraph::new();
    g.register_plugin("mtoa", vec![NodeKind::from("aiOptions"), NodeKind::from("aiAOVDriver")], true);
    g.create(NodeKind::from("aiOptions"), "defaultArnoldRenderOptions")
        .unwrap();
    g.create(NodeKind::from("aiAOVDriver"), "defaultArnoldDriver")
        .unwrap();
    g.create(NodeKind::from("aiAOVFilter"), "defaultArnoldFilter")
        .unwrap();
    g
}

#[test]
fn unload_deletes_plugin_nodes_first() {
    let mut g = arnold_scene();
    let report = unload_plugins(&mut g, DEFAULT_UNLOAD_PLUGINS, DEFAULT_PLUGIN_NODES);
    assert_eq!(report.done, vec!["mtoa".to_string()]);
    assert!(!g.plugin_loaded("mtoa"));
    assert!(!g.exists("defaultArnoldFilter"));
    assert!(!g.exists("defaultArnoldDriver"));
}

#[test]
fn locked_plugin_node_blocks_unload() {
    let mut g = arnold_scene();
    g.set_locked("defaultArnoldRenderOptions", true).unwrap();
    let report = unload_plugins(&mut g, DEFAULT_UNLOAD_PLUGINS, DEFAULT_PLUGIN_NODES);
    assert_eq!(report.skipped.len(), 1);
    assert!(g.plugin_loaded("mtoa"));
    assert!(!g.exists("defaultArnoldDriver"));
}

#[test]
fn unloaded_plugins_are_ignored() {
    let mut g = MemoryGraph::new();
    g.register_plugin("mtoa", Vec::new(), false);
    let report = unload_plugins(&mut g, &["mtoa", "unknown"], DEFAULT_PLUGIN_NODES);
    assert!(report.done.is_empty() && report.is_clean());
}

#[test]
fn load_stops_at_first_failure() {
    let mut g = MemoryGraph::new();
    g.register_plugin("a.mll", Vec::new(), false);
    g.register_plugin("b.mll", Vec::new(), true);
    g.register_plugin("d.mll", Vec::new(), false);
    let report = load_plugins(&mut g, &["a.mll", "b.mll", "c.mll", "d.mll"]);
    assert_eq!(report.done, vec!["a.mll".to_string(), "b.mll".to_string()]);
    assert_eq!(report.skipped[0].item, "c.mll");
    assert!(!g.plugin_loaded("d.mll"));
}

fn curve(g: &mut MemoryGraph, name: &str, target: &str, keys: Vec<f64>) {
    g.create(NodeKind::from("animCurveTL"), name).unwrap();
    g.set_attr(&plug(&format!("{name}.{KEY_VALUES_ATTR}")), AttrValue::FloatList(keys))
        .unwrap();
    g.connect(&plug(&format!("{name}.output")), &plug(target), false)
        .unwrap();
}

#[test]
fn static_curves_are_deleted() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Transform, "ball").unwrap();
    curve(&mut g, "ball_translateX", "ball.translateX", vec![1.0, 1.0, 1.0]);
    curve(&mut g, "ball_translateY", "ball.translateY", vec![0.0, 2.0, 0.0]);
    g.select(&["ball".to_string()]);

    let report = clean_static_channels(&mut g).unwrap();
    assert_eq!(report.done, vec!["ball_translateX".to_string()]);
    assert!(!g.exists("ball_translateX"));
    assert!(g.exists("ball_translateY"));
}

#[test]
fn clean_channels_needs_selection() {
    let mut g = MemoryGraph::new();
    assert!(clean_static_channels(&mut g).unwrap_err().is_warning());
}

#[test]
fn prune_skips_descendants_of_deleted_nodes() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Transform, "Joints_grp").unwrap();
    g.create(NodeKind::Transform, "hip_joints").unwrap();
    g.reparent("hip_joints", Some("Joints_grp")).unwrap();
    g.create(NodeKind::Mesh, "body").unwrap();
    g.create(NodeKind::Mesh, "Cage_hand").unwrap();

    let report = prune_matching(&mut g, DEFAULT_PRUNE_KEYWORDS).unwrap();
    assert_eq!(report.done, vec!["|Joints_grp".to_string(), "|Cage_hand".to_string()]);
    assert!(g.exists("body"));
    assert!(!g.exists("hip_joints"));
}

#[test]
fn prune_without_matches_is_a_warning() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Mesh, "body").unwrap();
    assert!(prune_matching(&mut g, &["cage"]).unwrap_err().is_warning());
}

#[test]
fn unlock_all_channels_counts_every_locked_channel() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Transform, "rig").unwrap();
    g.create(NodeKind::Transform, "prop").unwrap();
    g.set_attr_locked(&plug("rig.translate"), true).unwrap();
    g.set_attr_locked(&plug("rig.rotate"), true).unwrap();
    g.set_attr_locked(&plug("prop.visibility"), true).unwrap();

    assert_eq!(unlock_all_channels(&mut g), 3);
    assert!(g.locked_attrs("rig").is_empty());
    assert!(g.locked_attrs("prop").is_empty());
    assert_eq!(unlock_all_channels(&mut g), 0);
}

#[test]
fn prune_unlocks_channels_on_survivors_too() {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Mesh, "body").unwrap();
    g.create(NodeKind::Transform, "att_grp").unwrap();
    g.set_attr_locked(&plug("body.translate"), true).unwrap();

    prune_matching(&mut g, &["att"]).unwrap();
    assert!(!g.exists("att_grp"));
    assert!(g.locked_attrs("body").is_empty());
    g.set_attr(&plug("body.translate"), AttrValue::Float3([1.0, 0.0, 0.0]))
        .unwrap();
}
