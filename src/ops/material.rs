use std::path::Path;

use crate::foundation::core::{AttrValue, NodeKind, NodeRef};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::{SceneGraph, shading_groups_of, shapes_of, surface_shaders_of};
use crate::naming::derive::{
    MaterialTarget, component_owner, is_face_component, material_name, shading_group_name,
};
use crate::ops::{BatchReport, require_selection};

pub const DEFAULT_MATERIAL_TYPE: &str = "RedshiftMaterial";
pub const DEFAULT_REFLECTION_ROUGHNESS: f64 = 0.5;
pub const DEFAULT_CONVERTIBLE_TYPES: &[&str] = &["phong", "blinn", "standardSurface"];

/// A material and the shading group it drives.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMaterial {
    pub material: NodeRef,
    pub shading_group: NodeRef,
    /// `false` when both already existed.
    pub created: bool,
}

/// Find or create `<base>_MTL` / `<base>_Face_MTL` and its `SG`.
///
/// Resolving the same base twice returns the same pair. A material whose shading group has
/// gone missing is reported and left alone.
#[tracing::instrument(skip(graph))]
pub fn resolve_material<G: SceneGraph + ?Sized>(
    graph: &mut G,
    base: &str,
    target: MaterialTarget,
    shader_type: &str,
) -> ShelfResult<ResolvedMaterial> {
    let material = material_name(base, target);
    let sg = shading_group_name(&material);
    ensure_material(graph, &material, &sg, shader_type)
}

fn existing_shading_group<G: SceneGraph + ?Sized>(
    graph: &G,
    name: &str,
) -> ShelfResult<Option<NodeRef>> {
    match graph.node(name) {
        Some(n) if n.kind == NodeKind::ShadingEngine => Ok(Some(n)),
        Some(n) => Err(ShelfError::precondition(format!(
            "'{name}' exists but is a {}, not a shading group",
            n.kind
        ))),
        None => Ok(None),
    }
}

fn ensure_material<G: SceneGraph + ?Sized>(
    graph: &mut G,
    material: &str,
    sg: &str,
    shader_type: &str,
) -> ShelfResult<ResolvedMaterial> {
    if let Some(existing) = graph.node(material) {
        let Some(shading_group) = existing_shading_group(graph, sg)? else {
            return Err(ShelfError::precondition(format!(
                "material '{material}' exists, but shading group '{sg}' was not found"
            )));
        };
        tracing::info!(%material, "reusing existing material");
        return Ok(ResolvedMaterial {
            material: existing,
            shading_group,
            created: false,
        });
    }

    // Check the shading group name before creating anything.
    let reusable = existing_shading_group(graph, sg)?;
    let created = graph.create(NodeKind::from(shader_type), material)?;
    let roughness = created.plug("refl_roughness")?;
    if graph.has_attr(&roughness) {
        graph.set_attr(&roughness, AttrValue::Float(DEFAULT_REFLECTION_ROUGHNESS))?;
    }
    let shading_group = match reusable {
        Some(n) => n,
        None => graph.create(NodeKind::ShadingEngine, sg)?,
    };
    graph.connect(
        &created.plug("outColor")?,
        &shading_group.plug("surfaceShader")?,
        true,
    )?;
    tracing::info!(material = %created, shading_group = %shading_group, "created material");
    Ok(ResolvedMaterial {
        material: created,
        shading_group,
        created: true,
    })
}

/// Result of [`assign_new_material`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialAssignment {
    pub resolved: ResolvedMaterial,
    pub members: Vec<String>,
}

/// Give the selection a fresh material.
///
/// Selected faces get `<object>_Face_MTL` named after the first face's object; otherwise every
/// selected object shares `<first object>_MTL`.
#[tracing::instrument(skip(graph))]
pub fn assign_new_material<G: SceneGraph + ?Sized>(
    graph: &mut G,
    shader_type: &str,
) -> ShelfResult<MaterialAssignment> {
    let selection = require_selection(graph, "objects or faces")?;
    let faces: Vec<String> = selection
        .iter()
        .filter(|s| is_face_component(s))
        .cloned()
        .collect();

    let (base, target, members) = match faces.first() {
        Some(first) => {
            let owner = component_owner(first).unwrap_or(first.as_str()).to_string();
            (owner, MaterialTarget::Faces, faces.clone())
        }
        None => (selection[0].clone(), MaterialTarget::Objects, selection),
    };

    let resolved = resolve_material(graph, &base, target, shader_type)?;
    graph
        .force_element(&resolved.shading_group.name, &members)
        .map_err(|e| ShelfError::precondition(format!("could not assign material: {e}")))?;
    tracing::info!(
        material = %resolved.material,
        count = members.len(),
        "assigned material"
    );
    Ok(MaterialAssignment { resolved, members })
}

/// Convert each selected object's surface shader to `target_type`.
///
/// Only shaders whose type is listed in `convertible` are touched. A file texture on the color
/// input is reconnected to `diffuse_color`, otherwise the color value is copied; a `bump2d` on
/// `normalCamera` is reconnected to `bump_input`.
#[tracing::instrument(skip(graph, convertible))]
pub fn convert_materials<G: SceneGraph + ?Sized, S: AsRef<str>>(
    graph: &mut G,
    convertible: &[S],
    target_type: &str,
) -> ShelfResult<BatchReport> {
    let selection = require_selection(graph, "one or more objects")?;
    let mut report = BatchReport::default();
    for obj in selection {
        let result = convert_one(graph, &obj, convertible, target_type);
        report.record(obj, result);
    }
    Ok(report)
}

fn convert_one<G: SceneGraph + ?Sized, S: AsRef<str>>(
    graph: &mut G,
    obj: &str,
    convertible: &[S],
    target_type: &str,
) -> ShelfResult<()> {
    let shapes = shapes_of(graph, obj);
    if shapes.is_empty() {
        return Err(ShelfError::precondition(format!("no shape node found for '{obj}'")));
    }
    let sg = shapes
        .iter()
        .flat_map(|s| shading_groups_of(graph, &s.name))
        .next()
        .ok_or_else(|| ShelfError::precondition(format!("no shading group found for '{obj}'")))?;
    let source = surface_shaders_of(graph, &sg.name)
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::precondition(format!("no shader found in '{sg}'")))?;
    let source_type = source.kind.as_str();
    if !convertible.iter().any(|t| t.as_ref() == source_type) {
        return Err(ShelfError::precondition(format!(
            "'{source}' is a {source_type}, which is not converted"
        )));
    }

    let material_name = material_name(obj, MaterialTarget::Objects);
    let sg_name = shading_group_name(&material_name);
    let reusable = existing_shading_group(graph, &sg_name)?;
    let material = match graph.node(&material_name) {
        Some(n) => n,
        None => {
            let n = graph.create(NodeKind::from(target_type), &material_name)?;
            let roughness = n.plug("refl_roughness")?;
            if graph.has_attr(&roughness) {
                graph.set_attr(&roughness, AttrValue::Float(DEFAULT_REFLECTION_ROUGHNESS))?;
            }
            n
        }
    };

    let color_attr = if source_type == "standardSurface" {
        "baseColor"
    } else {
        "color"
    };
    let color = source.plug(color_attr)?;
    match graph.sources(&color).first() {
        Some(upstream) => match graph.node(&upstream.node) {
            Some(tex) if tex.kind == NodeKind::File => {
                graph.connect(&tex.plug("outColor")?, &material.plug("diffuse_color")?, true)?;
                tracing::debug!(texture = %tex, "reconnected color texture");
            }
            _ => tracing::debug!(upstream = %upstream, "color input is not a file texture"),
        },
        None => {
            if let Some(value) = graph.get_attr(&color) {
                graph.set_attr(&material.plug("diffuse_color")?, value)?;
            }
        }
    }

    let bump = source.plug("normalCamera")?;
    if let Some(upstream) = graph.sources(&bump).first() {
        match graph.node(&upstream.node) {
            Some(b) if b.kind == NodeKind::Bump2d => {
                graph.connect(&b.plug("outNormal")?, &material.plug("bump_input")?, true)?;
            }
            _ => tracing::debug!(upstream = %upstream, "bump input is not a bump2d"),
        }
    }

    let shading_group = match reusable {
        Some(n) => n,
        None => graph.create(NodeKind::ShadingEngine, &sg_name)?,
    };
    graph.connect(
        &material.plug("outColor")?,
        &shading_group.plug("surfaceShader")?,
        true,
    )?;
    graph.force_element(&shading_group.name, &[obj.to_string()])?;
    tracing::info!(object = obj, from = %source, to = %material, "converted material");
    Ok(())
}

/// `place2dTexture` outputs wired to the same-named `file` inputs.
pub const PLACE2D_ATTRS: &[&str] = &[
    "coverage",
    "translateFrame",
    "rotateFrame",
    "mirrorU",
    "mirrorV",
    "stagger",
    "wrapU",
    "wrapV",
    "repeatUV",
    "offset",
    "rotateUV",
    "noiseUV",
    "vertexUvOne",
    "vertexUvTwo",
    "vertexUvThree",
    "vertexCameraOne",
];

/// Nodes created by [`connect_base_color`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextureConnection {
    pub shader: NodeRef,
    pub file: NodeRef,
    pub placement: NodeRef,
    /// `color`, or `baseColor` on shaders without one.
    pub target_attr: &'static str,
}

/// Drive the selected shader's base color from an image file.
///
/// Exactly one shader must be selected. Creates `<texture stem>_file` and its
/// `place2dTexture`; both are deleted again when the shader refuses the connection.
#[tracing::instrument(skip(graph))]
pub fn connect_base_color<G: SceneGraph + ?Sized>(
    graph: &mut G,
    texture: &Path,
) -> ShelfResult<TextureConnection> {
    let shaders: Vec<NodeRef> = graph
        .selection()
        .iter()
        .filter_map(|s| graph.node(s))
        .filter(|n| n.kind.is_material())
        .collect();
    let shader = match shaders.as_slice() {
        [] => return Err(ShelfError::precondition("select a shader node")),
        [one] => one.clone(),
        _ => return Err(ShelfError::precondition("select only one shader node")),
    };
    let target_attr = ["color", "baseColor"]
        .into_iter()
        .find(|attr| shader.plug(*attr).is_ok_and(|p| graph.has_attr(&p)))
        .ok_or_else(|| {
            ShelfError::precondition(format!(
                "'{shader}' has neither a 'color' nor a 'baseColor' attribute"
            ))
        })?;
    let stem = texture
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ShelfError::validation(format!("'{}' does not name a texture file", texture.display()))
        })?;

    let file = graph.create(NodeKind::File, &format!("{stem}_file"))?;
    let placement = graph.create(
        NodeKind::from("place2dTexture"),
        &format!("{}_place2dTexture", file.name),
    )?;
    if let Err(err) = wire_texture(graph, &placement, &file, texture, &shader, target_attr) {
        graph.delete(&file.name)?;
        graph.delete(&placement.name)?;
        tracing::warn!(%shader, %err, "removed texture nodes after failed connection");
        return Err(err);
    }
    tracing::info!(texture = %texture.display(), %shader, target_attr, "connected base color");
    Ok(TextureConnection {
        shader,
        file,
        placement,
        target_attr,
    })
}

fn wire_texture<G: SceneGraph + ?Sized>(
    graph: &mut G,
    placement: &NodeRef,
    file: &NodeRef,
    texture: &Path,
    shader: &NodeRef,
    target_attr: &str,
) -> ShelfResult<()> {
    for attr in PLACE2D_ATTRS {
        graph.connect(&placement.plug(*attr)?, &file.plug(*attr)?, true)?;
    }
    graph.connect(&placement.plug("outUV")?, &file.plug("uvCoord")?, true)?;
    graph.connect(
        &placement.plug("outUvFilterSize")?,
        &file.plug("uvFilterSize")?,
        true,
    )?;
    graph.set_attr(
        &file.plug("fileTextureName")?,
        AttrValue::Str(texture.display().to_string()),
    )?;
    graph.connect(&file.plug("outColor")?, &shader.plug(target_attr)?, true)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/material.rs"]
mod tests;
