use super::*;

#[test]
fn path_text_uses_native_separators() {
    let text = path_text(Path::new("/proj/scenes/shot010.ma"));
    if cfg!(windows) {
        assert_eq!(text, "\\proj\\scenes\\shot010.ma");
    } else {
        assert_eq!(text, "/proj/scenes/shot010.ma");
    }
}
