use super::*;

fn values() -> TokenValues {
    TokenValues {
        scene: "shot010".to_string(),
        render_layer: "beauty".to_string(),
    }
}

#[test]
fn scene_token_resolves_everywhere() {
    assert_eq!(values().resolve("<scene>/<scene>").unwrap(), "shot010/shot010");
}

#[test]
fn render_layer_token_ignores_case() {
    assert_eq!(
        values().resolve("<scene>/<RenderLayer>/<RENDERLAYER>").unwrap(),
        "shot010/beauty/beauty"
    );
}

#[test]
fn templates_without_tokens_pass_through() {
    assert_eq!(values().resolve("plain/prefix").unwrap(), "plain/prefix");
    assert_eq!(values().resolve("").unwrap(), "");
}

#[test]
fn replacement_is_literal() {
    assert_eq!(replace_token_ci("<scene>", "<scene>", "$1_a").unwrap(), "$1_a");
}

#[test]
fn empty_token_is_rejected() {
    assert!(replace_token_ci("abc", "", "x").is_err());
}
