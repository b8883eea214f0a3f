use super::*;
use crate::graph::memory::MemoryGraph;

#[test]
fn report_splits_done_and_skipped() {
    let mut report = BatchReport::default();
    report.record("a", Ok(()));
    report.record("b", Err(ShelfError::graph("node 'b' is locked")));
    assert_eq!(report.done, vec!["a".to_string()]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].item, "b");
    assert!(report.skipped[0].reason.contains("locked"));
    assert!(!report.is_clean());
}

#[test]
fn empty_selection_is_a_precondition() {
    let g = MemoryGraph::new();
    let err = require_selection(&g, "a mesh").unwrap_err();
    assert!(err.is_warning());
    assert!(err.to_string().contains("a mesh"));
}
