use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ShelfError::precondition("x")
            .to_string()
            .contains("precondition not met:")
    );
    assert!(
        ShelfError::unsaved("x")
            .to_string()
            .contains("document has not been saved:")
    );
    assert!(
        ShelfError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ShelfError::graph("x")
            .to_string()
            .contains("scene graph error:")
    );
    assert!(ShelfError::process("x").to_string().contains("process error:"));
    assert!(
        ShelfError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_preconditions_are_warnings() {
    assert!(ShelfError::precondition("nothing selected").is_warning());
    assert!(!ShelfError::unsaved("untitled").is_warning());
    assert!(!ShelfError::process("exit 1").is_warning());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShelfError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
