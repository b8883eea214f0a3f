use crate::foundation::core::{Rect, Vec2};

/// Rows and columns for `count` cells arranged as close to a square as possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return Self { cols: 0, rows: 0 };
        }
        let mut cols = (count as f64).sqrt().ceil() as usize;
        // Guard against float error around perfect squares.
        while cols * cols < count {
            cols += 1;
        }
        while cols > 1 && (cols - 1) * (cols - 1) >= count {
            cols -= 1;
        }
        let rows = count.div_ceil(cols);
        Self { cols, rows }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub shape: GridShape,
    /// Uniform cell size: widest and tallest item.
    pub cell: Vec2,
    /// One position per item, in input order.
    pub positions: Vec<Vec2>,
}

/// Lay `sizes` out row by row on a uniform grid centered on the origin.
///
/// Item `i` sits at column `i % cols`, row `i / cols`; the extents of all
/// positions are then shifted so their midpoint is `(0, 0)`.
pub fn grid_positions(sizes: &[Vec2]) -> GridLayout {
    let shape = GridShape::for_count(sizes.len());
    let cell = Vec2::new(
        sizes.iter().map(|s| s.x).fold(0.0, f64::max),
        sizes.iter().map(|s| s.y).fold(0.0, f64::max),
    );
    if sizes.is_empty() {
        return GridLayout {
            shape,
            cell,
            positions: Vec::new(),
        };
    }

    let raw: Vec<Vec2> = (0..sizes.len())
        .map(|idx| {
            let row = idx / shape.cols;
            let col = idx % shape.cols;
            Vec2::new(col as f64 * cell.x, row as f64 * cell.y)
        })
        .collect();
    let center = extents(&raw).center().to_vec2();
    GridLayout {
        shape,
        cell,
        positions: raw.into_iter().map(|p| p - center).collect(),
    }
}

/// Smallest rectangle containing every position.
pub fn extents(positions: &[Vec2]) -> Rect {
    let mut it = positions.iter();
    let Some(first) = it.next() else {
        return Rect::ZERO;
    };
    it.fold(Rect::from_points(first.to_point(), first.to_point()), |r, p| {
        r.union_pt(p.to_point())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
