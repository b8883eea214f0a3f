//! Derived artifact names.
//!
//! Every name here is a pure function of its base, so recomputing it finds the artifact a previous
//! run created. That is what makes create-or-reuse possible.

use crate::naming::matching::short_name;

pub const MATERIAL_SUFFIX: &str = "_MTL";
pub const FACE_MATERIAL_SUFFIX: &str = "_Face_MTL";
pub const SHADING_GROUP_SUFFIX: &str = "SG";
pub const SHAPE_SUFFIX: &str = "Shape";

/// What a material is being created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialTarget {
    Objects,
    Faces,
}

/// `<base>_MTL` or `<base>_Face_MTL`, using the base's leaf name.
pub fn material_name(base: &str, target: MaterialTarget) -> String {
    let suffix = match target {
        MaterialTarget::Objects => MATERIAL_SUFFIX,
        MaterialTarget::Faces => FACE_MATERIAL_SUFFIX,
    };
    format!("{}{suffix}", short_name(base))
}

/// `<material>SG`.
pub fn shading_group_name(material: &str) -> String {
    format!("{material}{SHADING_GROUP_SUFFIX}")
}

/// Default shape name the host gives a freshly created transform's shape.
///
/// The namespace is kept, only the DAG path is dropped.
pub fn shape_name(transform: &str) -> String {
    let leaf = transform.rsplit('|').next().unwrap_or(transform);
    format!("{leaf}{SHAPE_SUFFIX}")
}

/// Object part of a component selection such as `pCube1.f[0:3]`.
pub fn component_owner(component: &str) -> Option<&str> {
    let (owner, rest) = component.split_once('.')?;
    if owner.is_empty() || !rest.contains('[') {
        return None;
    }
    Some(owner)
}

/// `true` for face component strings (`obj.f[..]`).
pub fn is_face_component(member: &str) -> bool {
    member.contains(".f[")
}

/// Index part of a face component (`"0:3"` for `obj.f[0:3]`).
pub fn face_indices(component: &str) -> Option<&str> {
    let start = component.rfind('[')? + 1;
    let end = component[start..].find(']')? + start;
    Some(&component[start..end])
}

/// Re-target a face component onto another shape, keeping its indices.
pub fn remap_face_component(component: &str, shape: &str) -> Option<String> {
    face_indices(component).map(|idx| format!("{shape}.f[{idx}]"))
}

#[cfg(test)]
#[path = "../../tests/unit/naming/derive.rs"]
mod tests;
