use crate::foundation::core::{AttrValue, NodeKind, NodeRef, Plug, Rect};
use crate::foundation::error::ShelfResult;

/// One directed attribute connection, `src -> dst`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Connection {
    pub src: Plug,
    pub dst: Plug,
}

/// Repository view of the host's live scene graph.
///
/// The graph is externally owned: every name must be resolved through [`SceneGraph::node`] or
/// [`SceneGraph::exists`] before it is used, and a handle may go stale after any mutation.
/// Implementations are used from a single thread with exclusive access for the duration of one
/// operation.
pub trait SceneGraph {
    /// Whether a node with this name (short or long) exists.
    fn exists(&self, name: &str) -> bool;

    /// Resolve a name to a typed handle.
    fn node(&self, name: &str) -> Option<NodeRef>;

    /// All nodes of a kind, in creation order.
    fn list(&self, kind: &NodeKind) -> Vec<NodeRef>;

    /// Every node in the graph, in creation order.
    fn all_nodes(&self) -> Vec<NodeRef>;

    /// Direct DAG children.
    fn children(&self, name: &str) -> Vec<NodeRef>;

    fn parent_of(&self, name: &str) -> Option<String>;

    /// `|`-separated DAG path from the world root.
    fn long_name(&self, name: &str) -> Option<String>;

    fn get_attr(&self, plug: &Plug) -> Option<AttrValue>;

    fn has_attr(&self, plug: &Plug) -> bool {
        self.get_attr(plug).is_some()
    }

    /// Connections with `node` on either side.
    fn connections(&self, node: &str) -> Vec<Connection>;

    /// Plugs driving `plug`.
    fn sources(&self, plug: &Plug) -> Vec<Plug> {
        self.connections(&plug.node)
            .into_iter()
            .filter(|c| &c.dst == plug)
            .map(|c| c.src)
            .collect()
    }

    /// Members of a set (shading groups included). Components appear as `obj.f[..]`.
    fn set_members(&self, set: &str) -> Vec<String>;

    fn is_locked(&self, name: &str) -> bool;

    /// Locked channels of a node.
    fn locked_attrs(&self, name: &str) -> Vec<String>;

    /// World-space XY bounds of a DAG node and its descendants.
    fn bounding_box(&self, name: &str) -> Option<Rect>;

    /// Current selection; may contain component strings.
    fn selection(&self) -> Vec<String>;

    fn plugin_loaded(&self, plugin: &str) -> bool;

    /// Node types a plugin registers.
    fn plugin_node_types(&self, plugin: &str) -> Vec<NodeKind>;

    /// Create a node. Shape kinds get a transform plus a `<name>Shape` child and the
    /// transform is returned. The host may adjust the name to keep it unique.
    fn create(&mut self, kind: NodeKind, name: &str) -> ShelfResult<NodeRef>;

    /// Rename a node; the host may adjust `new_name` to keep it unique.
    fn rename(&mut self, name: &str, new_name: &str) -> ShelfResult<NodeRef>;

    /// Delete a node and its DAG descendants.
    fn delete(&mut self, name: &str) -> ShelfResult<()>;

    /// Parent `child` under `parent`, or to the world when `None`.
    fn reparent(&mut self, child: &str, parent: Option<&str>) -> ShelfResult<()>;

    fn set_attr(&mut self, plug: &Plug, value: AttrValue) -> ShelfResult<()>;

    /// Lock or unlock one channel.
    fn set_attr_locked(&mut self, plug: &Plug, locked: bool) -> ShelfResult<()>;

    /// Connect `src -> dst`. Without `force`, an already-driven `dst` is an error.
    fn connect(&mut self, src: &Plug, dst: &Plug, force: bool) -> ShelfResult<()>;

    /// Make `members` belong to `set`, removing them from any other shading group.
    fn force_element(&mut self, set: &str, members: &[String]) -> ShelfResult<()>;

    /// Duplicate a DAG node with its descendants; returns the copy.
    fn duplicate(&mut self, name: &str) -> ShelfResult<NodeRef>;

    /// Create a transform named `name` and parent `members` under it.
    fn group(&mut self, members: &[String], name: &str) -> ShelfResult<NodeRef>;

    fn select(&mut self, names: &[String]);

    fn load_plugin(&mut self, plugin: &str) -> ShelfResult<()>;

    fn unload_plugin(&mut self, plugin: &str) -> ShelfResult<()>;
}

/// Shape children of a transform.
pub fn shapes_of<G: SceneGraph + ?Sized>(graph: &G, transform: &str) -> Vec<NodeRef> {
    graph
        .children(transform)
        .into_iter()
        .filter(|c| c.kind.is_shape_kind())
        .collect()
}

/// Shading groups that list `shape`, its transform, or one of its components as a member.
pub fn shading_groups_of<G: SceneGraph + ?Sized>(graph: &G, shape: &str) -> Vec<NodeRef> {
    let owner = graph.parent_of(shape);
    graph
        .list(&NodeKind::ShadingEngine)
        .into_iter()
        .filter(|sg| {
            graph.set_members(&sg.name).iter().any(|m| {
                member_refers_to(m, shape) || owner.as_deref().is_some_and(|o| member_refers_to(m, o))
            })
        })
        .collect()
}

/// Surface shaders driving a shading group's `surfaceShader`.
pub fn surface_shaders_of<G: SceneGraph + ?Sized>(graph: &G, sg: &str) -> Vec<NodeRef> {
    let Ok(plug) = Plug::new(sg, "surfaceShader") else {
        return Vec::new();
    };
    graph
        .sources(&plug)
        .into_iter()
        .filter_map(|p| graph.node(&p.node))
        .collect()
}

/// `true` if a set member string names `node` itself or one of its components.
pub fn member_refers_to(member: &str, node: &str) -> bool {
    member == node
        || member
            .strip_prefix(node)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/repo.rs"]
mod tests;
