use super::*;
use crate::foundation::core::{NodeKind, Rect};
use crate::graph::memory::MemoryGraph;
use crate::layout::grid::extents;

fn cubes(n: usize) -> MemoryGraph {
    let mut g = MemoryGraph::new();
    let mut names = Vec::new();
    for i in 1..=n {
        let t = g.create(NodeKind::Mesh, &format!("cube{i}")).unwrap();
        g.set_bounds(&format!("cube{i}Shape"), Rect::new(0.0, 0.0, 2.0, 1.0))
            .unwrap();
        names.push(t.name);
    }
    g.select(&names);
    g
}

#[test]
fn duplicates_into_centered_grid() {
    let mut g = cubes(5);
    let report = layout_grid(&mut g).unwrap();

    assert_eq!(report.group.name, LAYOUT_GROUP);
    assert_eq!(report.shape, GridShape { cols: 3, rows: 2 });
    assert_eq!(report.placed.len(), 5);
    assert_eq!(g.children(LAYOUT_GROUP).len(), 5);
    // Originals stay where they were.
    assert_eq!(g.parent_of("cube1"), None);

    let positions: Vec<Vec2> = report.placed.iter().map(|(_, p)| *p).collect();
    let mid = extents(&positions).center();
    assert!(mid.x.abs() < 1e-9 && mid.y.abs() < 1e-9);
    // Columns step by the widest box, rows by the tallest.
    assert_eq!(positions[1] - positions[0], Vec2::new(2.0, 0.0));
    assert_eq!(positions[3] - positions[0], Vec2::new(0.0, 1.0));

    let (first, pos) = &report.placed[0];
    assert_eq!(
        g.get_attr(&Plug::new(first.as_str(), "translate").unwrap()),
        Some(AttrValue::Float3([pos.x, pos.y, 0.0]))
    );
}

#[test]
fn layout_needs_a_selection() {
    let mut g = MemoryGraph::new();
    assert!(layout_grid(&mut g).unwrap_err().is_warning());
}

#[test]
fn non_dag_items_are_skipped() {
    let mut g = cubes(2);
    g.create(NodeKind::ShadingEngine, "someSG").unwrap();
    g.select(&["cube1".to_string(), "someSG".to_string(), "cube2".to_string()]);
    let report = layout_grid(&mut g).unwrap();
    assert_eq!(report.placed.len(), 2);
    assert_eq!(report.duplicates.skipped[0].item, "someSG");
}
