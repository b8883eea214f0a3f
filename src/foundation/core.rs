use std::fmt;

use crate::foundation::error::{ShelfError, ShelfResult};

pub use kurbo::{Point, Rect, Vec2};

/// Host node type, as reported by the host's type query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Transform,
    Mesh,
    Locator,
    Camera,
    ShadingEngine,
    DistanceBetween,
    AnimCurve,
    File,
    Bump2d,
    Other(String),
}

/// Surface-shader node types treated as materials.
const MATERIAL_TYPES: &[&str] = &[
    "lambert",
    "blinn",
    "phong",
    "phongE",
    "anisotropic",
    "surfaceShader",
    "standardSurface",
    "aiStandardSurface",
    "RedshiftMaterial",
    "RedshiftStandardMaterial",
    "particleCloud",
    "shaderGlow",
];

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transform => "transform",
            Self::Mesh => "mesh",
            Self::Locator => "locator",
            Self::Camera => "camera",
            Self::ShadingEngine => "shadingEngine",
            Self::DistanceBetween => "distanceBetween",
            Self::AnimCurve => "animCurve",
            Self::File => "file",
            Self::Bump2d => "bump2d",
            Self::Other(s) => s,
        }
    }

    /// Kinds that live as a shape under a transform.
    pub fn is_shape_kind(&self) -> bool {
        matches!(self, Self::Mesh | Self::Locator | Self::Camera)
    }

    /// Kinds that appear in the DAG (transforms and shapes).
    pub fn is_dag(&self) -> bool {
        matches!(self, Self::Transform) || self.is_shape_kind()
    }

    pub fn is_material(&self) -> bool {
        MATERIAL_TYPES.contains(&self.as_str())
    }

    /// `animCurve` and its typed variants (`animCurveTL`, `animCurveTA`, ...).
    pub fn is_anim_curve(&self) -> bool {
        self.as_str().starts_with("animCurve")
    }
}

impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        match s {
            "transform" => Self::Transform,
            "mesh" => Self::Mesh,
            "locator" => Self::Locator,
            "camera" => Self::Camera,
            "shadingEngine" => Self::ShadingEngine,
            "distanceBetween" => Self::DistanceBetween,
            "animCurve" => Self::AnimCurve,
            "file" => Self::File,
            "bump2d" => Self::Bump2d,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(k: NodeKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed handle to a node that existed when the handle was produced.
///
/// The graph owns the node; a `NodeRef` is only a name plus the kind it had.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub name: String,
}

impl NodeRef {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> ShelfResult<Self> {
        let name = name.into();
        validate_node_name(&name)?;
        Ok(Self { kind, name })
    }

    /// Leaf name without DAG path or namespace.
    pub fn short_name(&self) -> &str {
        crate::naming::matching::short_name(&self.name)
    }

    pub fn plug(&self, attr: &str) -> ShelfResult<Plug> {
        Plug::new(self.name.clone(), attr)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reject names the host would never hand out.
pub fn validate_node_name(name: &str) -> ShelfResult<()> {
    if name.is_empty() {
        return Err(ShelfError::validation("node name must be non-empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ShelfError::validation(format!(
            "node name '{name}' must not contain whitespace"
        )));
    }
    if name.contains('.') {
        return Err(ShelfError::validation(format!(
            "node name '{name}' must not contain '.'"
        )));
    }
    Ok(())
}

/// `node.attribute` address.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Plug {
    pub node: String,
    pub attr: String,
}

impl Plug {
    pub fn new(node: impl Into<String>, attr: impl Into<String>) -> ShelfResult<Self> {
        let node = node.into();
        let attr = attr.into();
        validate_node_name(&node)?;
        if attr.is_empty() {
            return Err(ShelfError::validation(format!(
                "plug on '{node}' has an empty attribute name"
            )));
        }
        Ok(Self { node, attr })
    }

    /// Parse `node.attr`; the attribute part may itself contain dots or indices.
    pub fn parse(s: &str) -> ShelfResult<Self> {
        let (node, attr) = s
            .split_once('.')
            .ok_or_else(|| ShelfError::validation(format!("'{s}' is not a node.attr plug")))?;
        Self::new(node, attr)
    }
}

impl fmt::Display for Plug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.attr)
    }
}

impl TryFrom<String> for Plug {
    type Error = ShelfError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Plug> for String {
    fn from(p: Plug) -> Self {
        p.to_string()
    }
}

impl std::str::FromStr for Plug {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Attribute value as stored on a host node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Float3([f64; 3]),
    FloatList(Vec<f64>),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric sequence view; a three-element list deserializes as `Float3`.
    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Self::Float3(v) => Some(v),
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<[f64; 3]> for AttrValue {
    fn from(v: [f64; 3]) -> Self {
        Self::Float3(v)
    }
}

/// Inclusive frame range, as the host stores render and playback ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    pub fn new(start: i64, end: i64) -> ShelfResult<Self> {
        if start > end {
            return Err(ShelfError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Frame count; a reversed range (possible after deserialization) is empty.
    pub fn len(self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end.abs_diff(self.start) + 1
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Host time unit names and the frame rate each implies.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "film")]
    Film,
    #[serde(rename = "pal")]
    Pal,
    #[serde(rename = "ntsc")]
    Ntsc,
    #[serde(rename = "show")]
    Show,
    #[serde(rename = "palf")]
    Palf,
    #[serde(rename = "ntscf")]
    Ntscf,
    #[serde(rename = "59.94fps")]
    Ntsc5994,
}

impl TimeUnit {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "film" => Self::Film,
            "pal" => Self::Pal,
            "ntsc" => Self::Ntsc,
            "show" => Self::Show,
            "palf" => Self::Palf,
            "ntscf" => Self::Ntscf,
            "59.94fps" => Self::Ntsc5994,
            _ => return None,
        })
    }

    pub fn fps(self) -> f64 {
        match self {
            Self::Film => 24.0,
            Self::Pal => 25.0,
            Self::Ntsc => 30.0,
            Self::Show => 48.0,
            Self::Palf => 50.0,
            Self::Ntscf => 60.0,
            Self::Ntsc5994 => 59.94,
        }
    }

    /// Frame rate for a host unit name; unknown units fall back to film (24).
    pub fn fps_for(name: &str) -> f64 {
        Self::parse(name).unwrap_or(Self::Film).fps()
    }
}

/// Render a frame rate the way ffmpeg expects it on the command line.
pub fn format_fps(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as i64)
    } else {
        format!("{fps}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
