use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{AttrValue, NodeKind, NodeRef, Plug, Rect, Vec2, validate_node_name};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::context::HostContext;
use crate::graph::repo::{Connection, SceneGraph, member_refers_to};
use crate::naming::derive::shape_name;

/// One stored node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
    /// Set membership, for shading groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Locked channels; they refuse new values and incoming connections.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub locked_attrs: BTreeSet<String>,
    /// Local XY bounds before the node's own translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PluginRecord {
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub node_types: Vec<NodeKind>,
}

/// In-memory scene graph, persisted as JSON.
///
/// Node names are unique across the whole graph, so a long DAG path resolves through its leaf.
/// Attributes are schemaless: setting an attribute a node does not have adds it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemoryGraph {
    nodes: Vec<NodeRecord>,
    connections: Vec<Connection>,
    selection: Vec<String>,
    plugins: BTreeMap<String, PluginRecord>,
}

fn leaf(name: &str) -> &str {
    name.rsplit('|').next().unwrap_or(name)
}

fn default_attrs(kind: &NodeKind) -> BTreeMap<String, AttrValue> {
    let mut attrs = BTreeMap::new();
    match kind.as_str() {
        "transform" => {
            attrs.insert("translate".to_string(), AttrValue::Float3([0.0; 3]));
            attrs.insert("rotate".to_string(), AttrValue::Float3([0.0; 3]));
            attrs.insert("visibility".to_string(), AttrValue::Bool(true));
        }
        "camera" => {
            attrs.insert("focalLength".to_string(), AttrValue::Float(35.0));
            attrs.insert("nearClipPlane".to_string(), AttrValue::Float(0.1));
            attrs.insert("farClipPlane".to_string(), AttrValue::Float(10000.0));
            attrs.insert("renderable".to_string(), AttrValue::Bool(false));
        }
        "distanceBetween" => {
            attrs.insert("distance".to_string(), AttrValue::Float(0.0));
        }
        "RedshiftMaterial" => {
            attrs.insert("diffuse_color".to_string(), AttrValue::Float3([0.5; 3]));
            attrs.insert("refl_roughness".to_string(), AttrValue::Float(0.0));
        }
        "lambert" | "blinn" | "phong" => {
            attrs.insert("color".to_string(), AttrValue::Float3([0.5; 3]));
        }
        "standardSurface" | "aiStandardSurface" => {
            attrs.insert("baseColor".to_string(), AttrValue::Float3([0.8; 3]));
        }
        _ => {}
    }
    attrs
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let name = leaf(name);
        self.nodes.iter().position(|n| n.name == name)
    }

    fn record(&self, name: &str) -> Option<&NodeRecord> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    fn record_mut(&mut self, name: &str) -> ShelfResult<&mut NodeRecord> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| ShelfError::graph(format!("no node named '{name}'")))?;
        Ok(&mut self.nodes[idx])
    }

    /// `wanted`, or the host-style next free name (`pCube1` -> `pCube2`).
    pub fn unique_name(&self, wanted: &str) -> String {
        if self.index_of(wanted).is_none() {
            return wanted.to_string();
        }
        let base = wanted.trim_end_matches(|c: char| c.is_ascii_digit());
        let mut n = wanted[base.len()..]
            .parse::<u64>()
            .map(|v| v + 1)
            .unwrap_or(1);
        loop {
            let candidate = format!("{base}{n}");
            if self.index_of(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn push(&mut self, kind: NodeKind, name: String, parent: Option<String>) -> NodeRef {
        let attrs = default_attrs(&kind);
        self.nodes.push(NodeRecord {
            name: name.clone(),
            kind: kind.clone(),
            parent,
            attrs,
            members: Vec::new(),
            locked: false,
            locked_attrs: BTreeSet::new(),
            bounds: None,
        });
        NodeRef { kind, name }
    }

    /// The node and all of its DAG descendants, parents first.
    fn subtree(&self, name: &str) -> Vec<String> {
        let mut out = vec![leaf(name).to_string()];
        let mut i = 0;
        while i < out.len() {
            let parent = out[i].clone();
            out.extend(
                self.nodes
                    .iter()
                    .filter(|n| n.parent.as_deref() == Some(parent.as_str()))
                    .map(|n| n.name.clone()),
            );
            i += 1;
        }
        out
    }

    fn world_offset(&self, name: &str) -> Vec2 {
        let mut offset = Vec2::ZERO;
        let mut cur = self.record(name);
        while let Some(rec) = cur {
            if let Some([x, y, _]) = rec.attrs.get("translate").and_then(translate_of) {
                offset += Vec2::new(x, y);
            }
            cur = rec.parent.as_deref().and_then(|p| self.record(p));
        }
        offset
    }

    /// Set local XY bounds on a DAG node.
    pub fn set_bounds(&mut self, name: &str, bounds: Rect) -> ShelfResult<()> {
        self.record_mut(name)?.bounds = Some(bounds);
        Ok(())
    }

    pub fn set_locked(&mut self, name: &str, locked: bool) -> ShelfResult<()> {
        self.record_mut(name)?.locked = locked;
        Ok(())
    }

    /// Make a plugin known to the host.
    pub fn register_plugin(&mut self, plugin: &str, node_types: Vec<NodeKind>, loaded: bool) {
        self.plugins.insert(
            plugin.to_string(),
            PluginRecord { loaded, node_types },
        );
    }

    pub fn connection_list(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn translate_of(v: &AttrValue) -> Option<[f64; 3]> {
    match v {
        AttrValue::Float3(t) => Some(*t),
        _ => None,
    }
}

fn node_ref(rec: &NodeRecord) -> NodeRef {
    NodeRef {
        kind: rec.kind.clone(),
        name: rec.name.clone(),
    }
}

impl SceneGraph for MemoryGraph {
    fn exists(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    fn node(&self, name: &str) -> Option<NodeRef> {
        self.record(name).map(node_ref)
    }

    fn list(&self, kind: &NodeKind) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .filter(|n| &n.kind == kind)
            .map(node_ref)
            .collect()
    }

    fn all_nodes(&self) -> Vec<NodeRef> {
        self.nodes.iter().map(node_ref).collect()
    }

    fn children(&self, name: &str) -> Vec<NodeRef> {
        let name = leaf(name);
        self.nodes
            .iter()
            .filter(|n| n.parent.as_deref() == Some(name))
            .map(node_ref)
            .collect()
    }

    fn parent_of(&self, name: &str) -> Option<String> {
        self.record(name).and_then(|r| r.parent.clone())
    }

    fn long_name(&self, name: &str) -> Option<String> {
        let mut rec = self.record(name)?;
        if !rec.kind.is_dag() {
            return Some(rec.name.clone());
        }
        let mut parts = vec![rec.name.as_str()];
        while let Some(parent) = rec.parent.as_deref().and_then(|p| self.record(p)) {
            parts.push(parent.name.as_str());
            rec = parent;
        }
        parts.reverse();
        Some(format!("|{}", parts.join("|")))
    }

    fn get_attr(&self, plug: &Plug) -> Option<AttrValue> {
        self.record(&plug.node)?.attrs.get(&plug.attr).cloned()
    }

    fn connections(&self, node: &str) -> Vec<Connection> {
        let node = leaf(node);
        self.connections
            .iter()
            .filter(|c| c.src.node == node || c.dst.node == node)
            .cloned()
            .collect()
    }

    fn set_members(&self, set: &str) -> Vec<String> {
        self.record(set).map(|r| r.members.clone()).unwrap_or_default()
    }

    fn is_locked(&self, name: &str) -> bool {
        self.record(name).is_some_and(|r| r.locked)
    }

    fn locked_attrs(&self, name: &str) -> Vec<String> {
        self.record(name)
            .map(|r| r.locked_attrs.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn bounding_box(&self, name: &str) -> Option<Rect> {
        self.subtree(name)
            .iter()
            .filter_map(|n| {
                let bounds = self.record(n)?.bounds?;
                Some(bounds + self.world_offset(n))
            })
            .reduce(|a, b| a.union(b))
    }

    fn selection(&self) -> Vec<String> {
        self.selection.clone()
    }

    fn plugin_loaded(&self, plugin: &str) -> bool {
        self.plugins.get(plugin).is_some_and(|p| p.loaded)
    }

    fn plugin_node_types(&self, plugin: &str) -> Vec<NodeKind> {
        self.plugins
            .get(plugin)
            .map(|p| p.node_types.clone())
            .unwrap_or_default()
    }

    fn create(&mut self, kind: NodeKind, name: &str) -> ShelfResult<NodeRef> {
        validate_node_name(name)?;
        if kind.is_shape_kind() {
            let transform = self.unique_name(name);
            let created = self.push(NodeKind::Transform, transform.clone(), None);
            let shape = self.unique_name(&shape_name(&transform));
            self.push(kind, shape, Some(transform));
            return Ok(created);
        }
        let name = self.unique_name(name);
        Ok(self.push(kind, name, None))
    }

    fn rename(&mut self, name: &str, new_name: &str) -> ShelfResult<NodeRef> {
        validate_node_name(new_name)?;
        let old = self
            .record(name)
            .map(|r| r.name.clone())
            .ok_or_else(|| ShelfError::graph(format!("cannot rename missing node '{name}'")))?;
        if self.is_locked(&old) {
            return Err(ShelfError::graph(format!("node '{old}' is locked")));
        }
        if old == new_name {
            return self
                .node(&old)
                .ok_or_else(|| ShelfError::graph(format!("node '{old}' vanished")));
        }
        let new = self.unique_name(new_name);

        for rec in &mut self.nodes {
            if rec.name == old {
                rec.name = new.clone();
            }
            if rec.parent.as_deref() == Some(old.as_str()) {
                rec.parent = Some(new.clone());
            }
            for m in &mut rec.members {
                if member_refers_to(m, &old) {
                    *m = format!("{new}{}", &m[old.len()..]);
                }
            }
        }
        for c in &mut self.connections {
            for plug in [&mut c.src, &mut c.dst] {
                if plug.node == old {
                    plug.node = new.clone();
                }
            }
        }
        for s in &mut self.selection {
            if member_refers_to(s, &old) {
                *s = format!("{new}{}", &s[old.len()..]);
            }
        }

        // The host keeps a default-named shape in step with its transform.
        let old_shape = shape_name(&old);
        if self
            .children(&new)
            .iter()
            .any(|c| c.kind.is_shape_kind() && c.name == old_shape)
        {
            self.rename(&old_shape, &shape_name(&new))?;
        }

        self.node(&new)
            .ok_or_else(|| ShelfError::graph(format!("renamed node '{new}' vanished")))
    }

    fn delete(&mut self, name: &str) -> ShelfResult<()> {
        if !self.exists(name) {
            return Err(ShelfError::graph(format!("cannot delete missing node '{name}'")));
        }
        let doomed: BTreeSet<String> = self.subtree(name).into_iter().collect();
        if let Some(locked) = doomed.iter().find(|n| self.is_locked(n)) {
            return Err(ShelfError::graph(format!("node '{locked}' is locked")));
        }

        self.nodes.retain(|n| !doomed.contains(&n.name));
        self.connections
            .retain(|c| !doomed.contains(&c.src.node) && !doomed.contains(&c.dst.node));
        let refers = |m: &String| doomed.iter().any(|d| member_refers_to(m, d));
        for rec in &mut self.nodes {
            rec.members.retain(|m| !refers(m));
        }
        self.selection.retain(|s| !refers(s));
        Ok(())
    }

    fn reparent(&mut self, child: &str, parent: Option<&str>) -> ShelfResult<()> {
        let child_name = self
            .record(child)
            .map(|r| r.name.clone())
            .ok_or_else(|| ShelfError::graph(format!("cannot parent missing node '{child}'")))?;
        let parent_name = match parent {
            Some(p) => {
                let rec = self
                    .record(p)
                    .ok_or_else(|| ShelfError::graph(format!("parent '{p}' does not exist")))?;
                if !rec.kind.is_dag() {
                    return Err(ShelfError::graph(format!("'{p}' is not a DAG node")));
                }
                if self.subtree(&child_name).contains(&rec.name) {
                    return Err(ShelfError::graph(format!(
                        "cannot parent '{child_name}' under its own descendant '{p}'"
                    )));
                }
                Some(rec.name.clone())
            }
            None => None,
        };
        self.record_mut(&child_name)?.parent = parent_name;
        Ok(())
    }

    fn set_attr(&mut self, plug: &Plug, value: AttrValue) -> ShelfResult<()> {
        let rec = self
            .record_mut(&plug.node)
            .map_err(|_| ShelfError::graph(format!("cannot set '{plug}': node does not exist")))?;
        if rec.locked_attrs.contains(&plug.attr) {
            return Err(ShelfError::graph(format!("cannot set '{plug}': channel is locked")));
        }
        rec.attrs.insert(plug.attr.clone(), value);
        Ok(())
    }

    fn set_attr_locked(&mut self, plug: &Plug, locked: bool) -> ShelfResult<()> {
        let rec = self.record_mut(&plug.node)?;
        if locked {
            rec.locked_attrs.insert(plug.attr.clone());
        } else {
            rec.locked_attrs.remove(&plug.attr);
        }
        Ok(())
    }

    fn connect(&mut self, src: &Plug, dst: &Plug, force: bool) -> ShelfResult<()> {
        for plug in [src, dst] {
            if !self.exists(&plug.node) {
                return Err(ShelfError::graph(format!(
                    "cannot connect '{src}' -> '{dst}': '{}' does not exist",
                    plug.node
                )));
            }
        }
        let src = Plug::new(leaf(&src.node), src.attr.clone())?;
        let dst = Plug::new(leaf(&dst.node), dst.attr.clone())?;
        if self
            .record(&dst.node)
            .is_some_and(|r| r.locked_attrs.contains(&dst.attr))
        {
            return Err(ShelfError::graph(format!(
                "cannot connect '{src}' -> '{dst}': destination is locked"
            )));
        }

        if let Some(existing) = self.connections.iter().find(|c| c.dst == dst) {
            if existing.src == src {
                return Ok(());
            }
            if !force {
                return Err(ShelfError::graph(format!(
                    "'{dst}' is already driven by '{}'",
                    existing.src
                )));
            }
        }
        self.connections.retain(|c| c.dst != dst);
        self.connections.push(Connection { src, dst });
        Ok(())
    }

    fn force_element(&mut self, set: &str, members: &[String]) -> ShelfResult<()> {
        match self.record(set) {
            Some(rec) if rec.kind == NodeKind::ShadingEngine => {}
            Some(_) => return Err(ShelfError::graph(format!("'{set}' is not a shading group"))),
            None => return Err(ShelfError::graph(format!("shading group '{set}' does not exist"))),
        }
        for m in members {
            let owner = m.split_once('.').map_or(m.as_str(), |(o, _)| o);
            if !self.exists(owner) {
                return Err(ShelfError::graph(format!(
                    "cannot assign '{m}': '{owner}' does not exist"
                )));
            }
            if self.is_locked(owner) {
                return Err(ShelfError::graph(format!(
                    "cannot assign '{m}': '{owner}' is locked"
                )));
            }
        }

        let set = leaf(set).to_string();
        for m in members {
            let m = match m.split_once('.') {
                Some((o, rest)) => format!("{}.{rest}", leaf(o)),
                None => leaf(m).to_string(),
            };
            let whole_object = !m.contains('.');
            // A whole transform takes its shapes along with it.
            let mut covered = vec![m.clone()];
            if whole_object {
                covered.extend(
                    self.children(&m)
                        .into_iter()
                        .filter(|c| c.kind.is_shape_kind())
                        .map(|c| c.name),
                );
            }
            for rec in &mut self.nodes {
                if rec.kind != NodeKind::ShadingEngine || rec.name == set {
                    continue;
                }
                rec.members.retain(|x| {
                    !covered
                        .iter()
                        .any(|c| x == c || (whole_object && member_refers_to(x, c)))
                });
            }
            let rec = self.record_mut(&set)?;
            if !rec.members.contains(&m) {
                rec.members.push(m);
            }
        }
        Ok(())
    }

    fn duplicate(&mut self, name: &str) -> ShelfResult<NodeRef> {
        let root = self
            .record(name)
            .ok_or_else(|| ShelfError::graph(format!("cannot duplicate missing node '{name}'")))?;
        if !root.kind.is_dag() {
            return Err(ShelfError::graph(format!("'{name}' is not a DAG node")));
        }

        let mut renamed = BTreeMap::<String, String>::new();
        let mut copies = Vec::new();
        for old in self.subtree(name) {
            let Some(rec) = self.record(&old) else {
                continue;
            };
            let mut copy = rec.clone();
            let new = self.unique_name(&old);
            renamed.insert(old.clone(), new.clone());
            copy.name = new.clone();
            copy.parent = rec
                .parent
                .as_ref()
                .map(|p| renamed.get(p).cloned().unwrap_or_else(|| p.clone()));
            copy.members.clear();
            copy.locked = false;
            self.nodes.push(copy.clone());
            copies.push(copy);
        }

        // Copies keep their originals' shading assignments.
        for (old, new) in &renamed {
            for rec in &mut self.nodes {
                if rec.kind == NodeKind::ShadingEngine && rec.members.iter().any(|m| m == old) {
                    rec.members.push(new.clone());
                }
            }
        }

        copies
            .first()
            .map(node_ref)
            .ok_or_else(|| ShelfError::graph(format!("duplicate of '{name}' produced nothing")))
    }

    fn group(&mut self, members: &[String], name: &str) -> ShelfResult<NodeRef> {
        for m in members {
            match self.record(m) {
                Some(rec) if rec.kind.is_dag() => {}
                _ => return Err(ShelfError::graph(format!("cannot group '{m}'"))),
            }
        }
        let group = self.create(NodeKind::Transform, name)?;
        for m in members {
            self.reparent(m, Some(&group.name))?;
        }
        Ok(group)
    }

    fn select(&mut self, names: &[String]) {
        self.selection = names.to_vec();
    }

    fn load_plugin(&mut self, plugin: &str) -> ShelfResult<()> {
        let rec = self
            .plugins
            .get_mut(plugin)
            .ok_or_else(|| ShelfError::graph(format!("plugin '{plugin}' not found")))?;
        rec.loaded = true;
        Ok(())
    }

    fn unload_plugin(&mut self, plugin: &str) -> ShelfResult<()> {
        let types = match self.plugins.get(plugin) {
            Some(rec) if rec.loaded => rec.node_types.clone(),
            Some(_) => return Err(ShelfError::graph(format!("plugin '{plugin}' is not loaded"))),
            None => return Err(ShelfError::graph(format!("plugin '{plugin}' not found"))),
        };
        let in_use = self.nodes.iter().filter(|n| types.contains(&n.kind)).count();
        if in_use > 0 {
            return Err(ShelfError::graph(format!(
                "plugin '{plugin}' is still used by {in_use} node(s)"
            )));
        }
        if let Some(rec) = self.plugins.get_mut(plugin) {
            rec.loaded = false;
        }
        Ok(())
    }
}

/// A host session saved to disk: context plus graph.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    pub context: HostContext,
    pub graph: MemoryGraph,
}

impl SceneSnapshot {
    pub fn from_path(path: &Path) -> ShelfResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene snapshot '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ShelfResult<Self> {
        serde_json::from_str(text).map_err(|e| ShelfError::serde(format!("scene snapshot: {e}")))
    }

    pub fn to_json_string(&self) -> ShelfResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ShelfError::serde(format!("scene snapshot: {e}")))
    }

    pub fn save(&self, path: &Path) -> ShelfResult<()> {
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        std::fs::write(path, self.to_json_string()?)
            .with_context(|| format!("write scene snapshot '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/memory.rs"]
mod tests;
