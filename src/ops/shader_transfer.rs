use crate::foundation::core::NodeKind;
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::{SceneGraph, member_refers_to};
use crate::naming::derive::{is_face_component, remap_face_component};
use crate::naming::matching::{MatchKind, best_match};
use crate::ops::BatchReport;

/// One shading assignment found on a source shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    Object { shading_group: String },
    Faces { shading_group: String, faces: Vec<String> },
}

/// Mesh shapes below `root`, depth first, descending through transforms.
pub fn mesh_shapes_under<G: SceneGraph + ?Sized>(graph: &G, root: &str) -> Vec<String> {
    let mut out = Vec::new();
    for child in graph.children(root) {
        match child.kind {
            NodeKind::Transform => out.extend(mesh_shapes_under(graph, &child.name)),
            NodeKind::Mesh => out.push(child.name),
            _ => {}
        }
    }
    out
}

/// Object-level assignments first, then per-group face assignments.
pub fn assignments_of<G: SceneGraph + ?Sized>(graph: &G, shape: &str) -> Vec<Assignment> {
    let owner = graph.parent_of(shape);
    let refers = |m: &str| {
        member_refers_to(m, shape) || owner.as_deref().is_some_and(|o| member_refers_to(m, o))
    };

    let mut objects = Vec::new();
    let mut faces = Vec::new();
    for sg in graph.list(&NodeKind::ShadingEngine) {
        let members = graph.set_members(&sg.name);
        let whole = members
            .iter()
            .any(|m| m == shape || owner.as_deref() == Some(m.as_str()));
        if whole {
            objects.push(Assignment::Object {
                shading_group: sg.name.clone(),
            });
        }
        let face_members: Vec<String> = members
            .into_iter()
            .filter(|m| is_face_component(m) && refers(m))
            .collect();
        if !face_members.is_empty() {
            faces.push(Assignment::Faces {
                shading_group: sg.name,
                faces: face_members,
            });
        }
    }
    objects.extend(faces);
    objects
}

/// Re-apply the shading of meshes under `source` to same-named meshes under `target`.
///
/// Matching goes through [`best_match`], so a partial match is a guess: it is applied but
/// logged as a warning. Target meshes without a match are skipped.
#[tracing::instrument(skip(graph))]
pub fn transfer_shader_assignments<G: SceneGraph + ?Sized>(
    graph: &mut G,
    source: &str,
    target: &str,
) -> ShelfResult<BatchReport> {
    for root in [source, target] {
        if !graph.exists(root) {
            return Err(ShelfError::precondition(format!("'{root}' does not exist")));
        }
    }

    let sources: Vec<(String, Vec<Assignment>)> = mesh_shapes_under(graph, source)
        .into_iter()
        .map(|s| {
            let a = assignments_of(graph, &s);
            (s, a)
        })
        .filter(|(_, a)| !a.is_empty())
        .collect();
    if sources.is_empty() {
        return Err(ShelfError::precondition(format!(
            "no shader assignments found under '{source}'"
        )));
    }
    let targets = mesh_shapes_under(graph, target);
    if targets.is_empty() {
        return Err(ShelfError::precondition(format!("no meshes found under '{target}'")));
    }

    let names: Vec<&str> = sources.iter().map(|(s, _)| s.as_str()).collect();
    let mut report = BatchReport::default();
    for shape in targets {
        let Some(found) = best_match(&shape, &names) else {
            report.skip(shape, "no matching source shape");
            continue;
        };
        match found.kind {
            MatchKind::Exact => tracing::debug!(%shape, source = found.name, "exact match"),
            MatchKind::Partial => {
                tracing::warn!(%shape, source = found.name, "partial name match")
            }
        }
        let result = apply(graph, &shape, &sources[found.index].1);
        report.record(shape, result);
    }
    Ok(report)
}

fn apply<G: SceneGraph + ?Sized>(
    graph: &mut G,
    shape: &str,
    assignments: &[Assignment],
) -> ShelfResult<()> {
    for assignment in assignments {
        match assignment {
            Assignment::Object { shading_group } => {
                graph.force_element(shading_group, &[shape.to_string()])?;
            }
            Assignment::Faces {
                shading_group,
                faces,
            } => {
                let remapped: Vec<String> = faces
                    .iter()
                    .filter_map(|f| remap_face_component(f, shape))
                    .collect();
                if remapped.is_empty() {
                    return Err(ShelfError::validation(format!(
                        "no valid faces to assign from '{shading_group}'"
                    )));
                }
                graph.force_element(shading_group, &remapped)?;
            }
        }
    }
    Ok(())
}

/// Selection-driven form: the first selected transform is the source, the second the target.
pub fn transfer_from_selection<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<BatchReport> {
    let groups: Vec<String> = graph
        .selection()
        .into_iter()
        .filter(|s| graph.node(s).is_some_and(|n| n.kind == NodeKind::Transform))
        .collect();
    let [source, target] = groups.as_slice() else {
        return Err(ShelfError::precondition(
            "select exactly two groups: the source group, then the target group",
        ));
    };
    let (source, target) = (source.clone(), target.clone());
    transfer_shader_assignments(graph, &source, &target)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/shader_transfer.rs"]
mod tests;
