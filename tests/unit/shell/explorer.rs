use super::*;

fn args(launch: &Launch) -> Vec<String> {
    launch
        .args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn windows_selects_files_in_explorer() {
    let cmd = browser_command(&Reveal::File("C:/proj/images/shot.mov".into()), Platform::Windows);
    assert_eq!(cmd.program, PathBuf::from("explorer"));
    assert_eq!(args(&cmd), vec!["/select,", "C:/proj/images/shot.mov"]);

    let cmd = browser_command(&Reveal::Directory("C:/proj".into()), Platform::Windows);
    assert_eq!(args(&cmd), vec!["C:/proj"]);
}

#[test]
fn macos_reveals_with_open() {
    let cmd = browser_command(&Reveal::File("/proj/shot.mov".into()), Platform::MacOs);
    assert_eq!(cmd.program, PathBuf::from("open"));
    assert_eq!(args(&cmd), vec!["-R", "/proj/shot.mov"]);
}

#[test]
fn linux_opens_the_parent_of_files() {
    let cmd = browser_command(&Reveal::File("/proj/images/shot.mov".into()), Platform::Linux);
    assert_eq!(cmd.program, PathBuf::from("xdg-open"));
    assert_eq!(args(&cmd), vec!["/proj/images"]);
}

#[test]
fn missing_targets_are_warnings() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(open_directory(tmp.path().join("gone")).unwrap_err().is_warning());
    assert!(select_file(tmp.path().join("gone.mov")).unwrap_err().is_warning());
    // A file is not a directory.
    let file = tmp.path().join("shot.mov");
    std::fs::write(&file, b"").unwrap();
    assert!(open_directory(&file).unwrap_err().is_warning());
}
