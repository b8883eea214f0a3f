use super::*;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"x").unwrap();
}

#[test]
fn finds_only_files_with_the_stem() {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "shot010.0002.png");
    touch(tmp.path(), "shot010.0001.png");
    touch(tmp.path(), "shot0100.0001.png");
    touch(tmp.path(), "other.0001.png");
    std::fs::create_dir(tmp.path().join("shot010.dir")).unwrap();

    let files = find_sequence(tmp.path(), "shot010").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["shot010.0001.png", "shot010.0002.png"]);
}

#[test]
fn missing_directory_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(find_sequence(&tmp.path().join("nope"), "x").unwrap().is_empty());
}

#[test]
fn splits_frame_patterns() {
    assert_eq!(
        pattern_parts(Path::new("/r/shot010/shot010.%04d.png")),
        Some((PathBuf::from("/r/shot010"), "shot010".to_string()))
    );
    assert_eq!(pattern_parts(Path::new("/r/movie.mov")), None);
}

#[test]
fn require_sequence_reports_missing_frames() {
    let tmp = tempfile::tempdir().unwrap();
    let pattern = tmp.path().join("shot.%04d.png");
    let err = require_sequence(&pattern).unwrap_err();
    assert!(err.is_warning());

    touch(tmp.path(), "shot.0001.png");
    assert_eq!(require_sequence(&pattern).unwrap().len(), 1);
    assert!(require_sequence(&tmp.path().join("shot.png")).is_err());
}
