use super::*;

#[test]
fn render_job_passes_the_scene() {
    let job = render_job(Path::new(DEFAULT_RENDER_COMMAND), Path::new("/proj/shot010.ma"));
    assert_eq!(job.program, PathBuf::from("Render"));
    assert_eq!(job.args, vec![OsString::from("/proj/shot010.ma")]);
}

#[test]
fn viewer_path_must_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("bin/djv");
    let err = viewer_job(&missing, Path::new("/r/shot.0001.png")).unwrap_err();
    assert!(err.is_warning());

    // Bare names are left to PATH lookup.
    let job = viewer_job(Path::new("djv"), Path::new("/r/shot.0001.png")).unwrap();
    assert_eq!(job.args, vec![OsString::from("/r/shot.0001.png")]);
}

#[test]
fn unknown_programs_fail_to_start() {
    let launch = Launch::new("shelfkit-no-such-program", ["x"]);
    assert!(matches!(launch.spawn_detached(), Err(ShelfError::Process(_))));
    assert!(matches!(launch.run(), Err(ShelfError::Process(_))));
}
