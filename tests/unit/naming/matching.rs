use super::*;

#[test]
fn short_name_strips_path_and_namespace() {
    assert_eq!(short_name("|grp|ns:body"), "body");
    assert_eq!(short_name("a:b:c"), "c");
    assert_eq!(short_name("plain"), "plain");
    assert_eq!(short_name(""), "");
}

#[test]
fn substring_fallback_selects_only_matching_candidate() {
    let candidates = ["Foo_geo", "Bar_geo"];
    let all = all_matches("Foo", &candidates);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Foo_geo");
    assert_eq!(all[0].kind, MatchKind::Partial);

    let best = best_match("Foo", &candidates).unwrap();
    assert_eq!(best.name, "Foo_geo");
    assert_eq!(best.index, 0);
}

#[test]
fn exact_match_beats_earlier_partial() {
    let candidates = ["|src|bodyShape_old", "|src|bodyShape"];
    let m = best_match("|abc|cache:bodyShape", &candidates).unwrap();
    assert_eq!(m.index, 1);
    assert_eq!(m.kind, MatchKind::Exact);
}

#[test]
fn containment_is_bidirectional() {
    let candidates = ["arm"];
    let m = best_match("arm_L_geo", &candidates).unwrap();
    assert_eq!(m.kind, MatchKind::Partial);
}

#[test]
fn exact_is_case_sensitive() {
    let candidates = ["foo"];
    assert!(best_match("Foo", &candidates).is_none());
}

#[test]
fn ties_break_by_first_encountered() {
    // Known limitation: both contain "arm"; the first one wins.
    let candidates = vec!["forearm_L".to_string(), "arm_L".to_string()];
    let m = best_match("arm", &candidates).unwrap();
    assert_eq!(m.name, "forearm_L");
}

#[test]
fn no_match_and_empty_reference() {
    let candidates = ["Bar_geo"];
    assert!(best_match("Foo", &candidates).is_none());
    assert!(best_match("", &candidates).is_none());
    assert!(all_matches("|", &candidates).is_empty());
}
