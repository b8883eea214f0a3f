use super::*;

#[test]
fn unsaved_scene_is_a_hard_stop() {
    let ctx = HostContext::default();
    let err = ctx.require_scene_path().unwrap_err();
    assert!(matches!(err, ShelfError::Unsaved(_)));
    assert!(!err.is_warning());
}

#[test]
fn scene_name_is_file_stem() {
    let ctx = HostContext {
        scene_path: Some(PathBuf::from("/proj/scenes/shot010.ma")),
        ..HostContext::default()
    };
    assert_eq!(ctx.scene_name().unwrap(), "shot010");
}

#[test]
fn render_layer_defaults_and_strips_path() {
    let mut ctx = HostContext::default();
    assert_eq!(ctx.render_layer_name(), "defaultRenderLayer");
    ctx.render_layer = Some("|rs_beauty".to_string());
    assert_eq!(ctx.render_layer_name(), "rs_beauty");
    ctx.render_layer = Some(String::new());
    assert_eq!(ctx.render_layer_name(), "defaultRenderLayer");
}

#[test]
fn render_directory_joins_images_rule() {
    let ctx = HostContext {
        project_root: PathBuf::from("/proj"),
        images_rule: "renders".to_string(),
        ..HostContext::default()
    };
    assert_eq!(ctx.render_directory(), PathBuf::from("/proj/renders"));
}

#[test]
fn most_recent_file_requires_existing_entry() {
    let ctx = HostContext::default();
    assert!(ctx.most_recent_file().unwrap_err().is_warning());

    let dir = tempfile::tempdir().unwrap();
    let recent = dir.path().join("a.ma");
    std::fs::write(&recent, b"//").unwrap();
    let ctx = HostContext {
        recent_files: vec![recent.clone(), dir.path().join("gone.ma")],
        ..HostContext::default()
    };
    assert_eq!(ctx.most_recent_file().unwrap(), recent.as_path());

    let ctx = HostContext {
        recent_files: vec![dir.path().join("gone.ma")],
        ..HostContext::default()
    };
    assert!(ctx.most_recent_file().is_err());
}
