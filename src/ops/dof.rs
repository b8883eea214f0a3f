use crate::foundation::core::{AttrValue, NodeKind, NodeRef, Plug};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::{SceneGraph, shapes_of};
use crate::naming::matching::short_name;
use crate::ops::render_settings::CAMERA;
use crate::ops::{BatchReport, require_selection};

pub const DOF_LOCATOR: &str = "DOF";
pub const CAMERA_LOCATOR: &str = "CamLocator";
pub const DISTANCE_NODE: &str = "DOF_distanceBetween";
pub const BOKEH_TYPE: &str = "RedshiftBokeh";

/// Nodes making up a focus-distance rig.
#[derive(Clone, Debug, PartialEq)]
pub struct DofRig {
    pub locator: NodeRef,
    pub camera_locator: NodeRef,
    pub distance: NodeRef,
    /// Bokeh nodes now driven by the rig.
    pub bokeh: BatchReport,
}

/// Drive every bokeh node's focus distance from a selected locator.
///
/// The locator is renamed `DOF`; its distance to a `CamLocator` under `Camera` feeds each
/// `RedshiftBokeh.dofFocusDistance`. Running it again on the same rig reuses every node.
#[tracing::instrument(skip(graph))]
pub fn rig_depth_of_field<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<DofRig> {
    let selection = require_selection(graph, "one locator")?;
    let [selected] = selection.as_slice() else {
        return Err(ShelfError::precondition("select exactly one locator"));
    };
    let is_locator = shapes_of(graph, selected)
        .first()
        .is_some_and(|s| s.kind == NodeKind::Locator);
    if !is_locator {
        return Err(ShelfError::precondition(format!("'{selected}' is not a locator")));
    }
    if !graph.exists(CAMERA) {
        return Err(ShelfError::precondition(format!(
            "a camera named '{CAMERA}' does not exist in the scene"
        )));
    }
    let already_dof = short_name(selected) == DOF_LOCATOR;
    if !already_dof && graph.exists(DOF_LOCATOR) {
        return Err(ShelfError::precondition(format!(
            "another node is already named '{DOF_LOCATOR}'"
        )));
    }

    let locator = if already_dof {
        graph
            .node(selected)
            .ok_or_else(|| ShelfError::graph(format!("'{selected}' vanished")))?
    } else {
        graph.rename(selected, DOF_LOCATOR)?
    };
    tracing::info!(locator = %locator, "focus locator ready");

    let camera_locator = match graph.node(CAMERA_LOCATOR) {
        Some(n) => n,
        None => {
            let n = graph.create(NodeKind::Locator, CAMERA_LOCATOR)?;
            graph.reparent(&n.name, Some(CAMERA))?;
            graph.set_attr(&n.plug("translate")?, AttrValue::Float3([0.0; 3]))?;
            tracing::info!(locator = %n, "created camera locator");
            n
        }
    };

    let (distance, fresh) = match graph.node(DISTANCE_NODE) {
        Some(n) => (n, false),
        None => (graph.create(NodeKind::DistanceBetween, DISTANCE_NODE)?, true),
    };
    if let Err(err) = connect_points(graph, &locator, &camera_locator, &distance) {
        if fresh {
            graph.delete(&distance.name)?;
            tracing::warn!(node = %distance, "removed distance node after failed connection");
        }
        return Err(err);
    }

    let mut bokeh = BatchReport::default();
    let targets = graph.list(&NodeKind::from(BOKEH_TYPE));
    if targets.is_empty() {
        tracing::warn!("no {BOKEH_TYPE} nodes found; enable bokeh on the camera first");
    }
    for node in targets {
        let result = drive_bokeh(graph, &distance, &node);
        bokeh.record(node.name, result);
    }

    Ok(DofRig {
        locator,
        camera_locator,
        distance,
        bokeh,
    })
}

fn world_position(node: &NodeRef) -> ShelfResult<Plug> {
    node.plug("worldPosition[0]")
}

fn connect_points<G: SceneGraph + ?Sized>(
    graph: &mut G,
    locator: &NodeRef,
    camera_locator: &NodeRef,
    distance: &NodeRef,
) -> ShelfResult<()> {
    graph.connect(&world_position(locator)?, &distance.plug("point1")?, false)?;
    graph.connect(&world_position(camera_locator)?, &distance.plug("point2")?, false)
}

fn drive_bokeh<G: SceneGraph + ?Sized>(
    graph: &mut G,
    distance: &NodeRef,
    bokeh: &NodeRef,
) -> ShelfResult<()> {
    graph.set_attr(
        &bokeh.plug("dofDeriveFocusDistanceFromCamera")?,
        AttrValue::Bool(false),
    )?;
    graph.connect(&distance.plug("distance")?, &bokeh.plug("dofFocusDistance")?, true)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/dof.rs"]
mod tests;
