use crate::foundation::core::{AttrValue, NodeRef, Plug, Vec2};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::SceneGraph;
use crate::layout::grid::{GridShape, grid_positions};
use crate::ops::{BatchReport, require_selection};

pub const LAYOUT_GROUP: &str = "layout";

#[derive(Clone, Debug, PartialEq)]
pub struct GridLayoutReport {
    pub group: NodeRef,
    pub shape: GridShape,
    /// Duplicate name and the XY position it was moved to.
    pub placed: Vec<(String, Vec2)>,
    /// Selected items that could not be duplicated.
    pub duplicates: BatchReport,
}

/// Duplicate the selection into a `layout` group and arrange the copies on a centered XY grid.
///
/// Cells are as large as the biggest copy's bounding box; items without bounds count as
/// zero-sized.
#[tracing::instrument(skip(graph))]
pub fn layout_grid<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<GridLayoutReport> {
    let selection = require_selection(graph, "objects to lay out")?;

    let mut duplicates = BatchReport::default();
    let mut copies: Vec<String> = Vec::new();
    for item in selection {
        match graph.duplicate(&item) {
            Ok(dup) => {
                copies.push(dup.name);
                duplicates.done.push(item);
            }
            Err(err) => duplicates.skip(item, err.to_string()),
        }
    }
    if copies.is_empty() {
        return Err(ShelfError::graph("none of the selected objects could be duplicated"));
    }
    let group = graph.group(&copies, LAYOUT_GROUP)?;

    let sizes: Vec<Vec2> = copies
        .iter()
        .map(|c| {
            graph
                .bounding_box(c)
                .map(|r| Vec2::new(r.width(), r.height()))
                .unwrap_or(Vec2::ZERO)
        })
        .collect();
    let layout = grid_positions(&sizes);

    let mut placed = Vec::with_capacity(copies.len());
    for (copy, pos) in copies.into_iter().zip(layout.positions) {
        graph.set_attr(
            &Plug::new(copy.as_str(), "translate")?,
            AttrValue::Float3([pos.x, pos.y, 0.0]),
        )?;
        placed.push((copy, pos));
    }
    graph.set_attr(&group.plug("translate")?, AttrValue::Float3([0.0; 3]))?;
    tracing::info!(
        count = placed.len(),
        cols = layout.shape.cols,
        rows = layout.shape.rows,
        "grid layout done"
    );

    Ok(GridLayoutReport {
        group,
        shape: layout.shape,
        placed,
        duplicates,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/ops/layout.rs"]
mod tests;
