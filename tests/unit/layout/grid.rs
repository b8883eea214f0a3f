use super::*;

fn unit(n: usize) -> Vec<Vec2> {
    vec![Vec2::new(1.0, 1.0); n]
}

#[test]
fn cols_is_ceil_sqrt() {
    for (n, cols, rows) in [(1, 1, 1), (2, 2, 1), (4, 2, 2), (5, 3, 2), (9, 3, 3), (10, 4, 3)] {
        assert_eq!(GridShape::for_count(n), GridShape { cols, rows }, "n={n}");
    }
    assert_eq!(GridShape::for_count(0), GridShape { cols: 0, rows: 0 });
}

#[test]
fn positions_are_centered_on_origin() {
    for n in [1, 3, 5, 7, 12] {
        let layout = grid_positions(&unit(n));
        let mid = extents(&layout.positions).center();
        assert!(mid.x.abs() < 1e-9 && mid.y.abs() < 1e-9, "n={n}: {mid:?}");
    }
}

#[test]
fn cell_uses_largest_item() {
    let sizes = [Vec2::new(2.0, 1.0), Vec2::new(1.0, 4.0), Vec2::new(1.0, 1.0)];
    let layout = grid_positions(&sizes);
    assert_eq!(layout.cell, Vec2::new(2.0, 4.0));
    assert_eq!(layout.shape, GridShape { cols: 2, rows: 2 });
    // Row-major: item 1 is right of item 0, item 2 below it.
    assert_eq!(layout.positions[1] - layout.positions[0], Vec2::new(2.0, 0.0));
    assert_eq!(layout.positions[2] - layout.positions[0], Vec2::new(0.0, 4.0));
}

#[test]
fn single_item_lands_on_origin() {
    let layout = grid_positions(&[Vec2::new(3.0, 3.0)]);
    assert_eq!(layout.positions, vec![Vec2::ZERO]);
}

#[test]
fn empty_input_is_empty_layout() {
    let layout = grid_positions(&[]);
    assert!(layout.positions.is_empty());
    assert_eq!(extents(&layout.positions), Rect::ZERO);
}
