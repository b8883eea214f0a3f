use std::path::PathBuf;

use crate::foundation::core::{AttrValue, FrameRange, NodeKind};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::context::HostContext;
use crate::graph::repo::{SceneGraph, shading_groups_of, shapes_of, surface_shaders_of};
use crate::naming::version::version_up_path;
use crate::template::render_path::{RENDER_GLOBALS, globals_plug};

/// Copy the timeline's playback range into the render range.
#[tracing::instrument(skip(graph, ctx))]
pub fn sync_frame_range<G: SceneGraph + ?Sized>(
    graph: &mut G,
    ctx: &HostContext,
) -> ShelfResult<FrameRange> {
    if !graph.exists(RENDER_GLOBALS) {
        return Err(ShelfError::precondition(format!(
            "'{RENDER_GLOBALS}' does not exist in the scene"
        )));
    }
    let range = ctx.playback;
    graph.set_attr(&globals_plug("startFrame")?, AttrValue::Float(range.start as f64))?;
    graph.set_attr(&globals_plug("endFrame")?, AttrValue::Float(range.end as f64))?;
    tracing::info!(start = range.start, end = range.end, "render range synced to timeline");
    Ok(range)
}

/// Replace the selection with the surface shaders of the selected objects.
#[tracing::instrument(skip(graph))]
pub fn select_shaders<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<Vec<String>> {
    let objects: Vec<String> = graph
        .selection()
        .into_iter()
        .filter(|s| graph.node(s).is_some_and(|n| n.kind == NodeKind::Transform))
        .collect();
    if objects.is_empty() {
        return Err(ShelfError::precondition("select an object"));
    }

    let mut shaders: Vec<String> = Vec::new();
    for obj in &objects {
        for shape in shapes_of(graph, obj) {
            for sg in shading_groups_of(graph, &shape.name) {
                for shader in surface_shaders_of(graph, &sg.name) {
                    if !shaders.contains(&shader.name) {
                        shaders.push(shader.name);
                    }
                }
            }
        }
    }
    if shaders.is_empty() {
        return Err(ShelfError::precondition(
            "no shaders found attached to the selected object(s)",
        ));
    }
    graph.select(&shaders);
    Ok(shaders)
}

/// Move the document to its next version path.
///
/// Stops hard when the document was never saved. Writing the file is up to the caller; the
/// context is updated to point at the new path.
#[tracing::instrument(skip(ctx))]
pub fn version_up(ctx: &mut HostContext) -> ShelfResult<PathBuf> {
    let current = ctx.require_scene_path()?.to_path_buf();
    let next = version_up_path(&current)?;
    ctx.scene_path = Some(next.clone());
    ctx.recent_files.retain(|p| p != &next);
    ctx.recent_files.insert(0, next.clone());
    tracing::info!(from = %current.display(), to = %next.display(), "versioned up");
    Ok(next)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/scene.rs"]
mod tests;
