use super::*;
use crate::graph::memory::MemoryGraph;

fn plug(s: &str) -> Plug {
    Plug::parse(s).unwrap()
}

fn scene(bokeh: usize) -> MemoryGraph {
    let mut g = MemoryGraph::new();
    g.create(NodeKind::Camera, CAMERA).unwrap();
    g.create(NodeKind::Locator, "locator1").unwrap();
    for i in 0..bokeh {
        g.create(NodeKind::from(BOKEH_TYPE), &format!("rsBokeh{}", i + 1))
            .unwrap();
    }
    g.select(&["locator1".to_string()]);
    g
}

#[test]
fn rigs_locator_to_every_bokeh_node() {
    let mut g = scene(2);
    let rig = rig_depth_of_field(&mut g).unwrap();

    assert_eq!(rig.locator.name, DOF_LOCATOR);
    assert!(!g.exists("locator1"));
    assert_eq!(g.parent_of(CAMERA_LOCATOR).as_deref(), Some(CAMERA));
    assert_eq!(
        g.sources(&plug("DOF_distanceBetween.point1")),
        vec![plug("DOF.worldPosition[0]")]
    );
    assert_eq!(
        g.sources(&plug("DOF_distanceBetween.point2")),
        vec![plug("CamLocator.worldPosition[0]")]
    );
    for name in ["rsBokeh1", "rsBokeh2"] {
        assert_eq!(
            g.sources(&plug(&format!("{name}.dofFocusDistance"))),
            vec![plug("DOF_distanceBetween.distance")]
        );
        assert_eq!(
            g.get_attr(&plug(&format!("{name}.dofDeriveFocusDistanceFromCamera"))),
            Some(AttrValue::Bool(false))
        );
    }
    assert_eq!(rig.bokeh.done.len(), 2);
}

#[test]
fn rerunning_reuses_the_rig() {
    let mut g = scene(1);
    rig_depth_of_field(&mut g).unwrap();
    let count = g.len();
    g.select(&["DOF".to_string()]);
    let rig = rig_depth_of_field(&mut g).unwrap();
    assert_eq!(g.len(), count);
    assert_eq!(rig.distance.name, DISTANCE_NODE);
}

#[test]
fn no_bokeh_nodes_still_builds_rig() {
    let mut g = scene(0);
    let rig = rig_depth_of_field(&mut g).unwrap();
    assert!(rig.bokeh.done.is_empty());
    assert!(g.exists(DISTANCE_NODE));
}

#[test]
fn requires_single_locator_and_camera() {
    let mut g = scene(1);
    g.select(&[]);
    assert!(rig_depth_of_field(&mut g).unwrap_err().is_warning());

    g.create(NodeKind::Mesh, "cube").unwrap();
    g.select(&["cube".to_string()]);
    assert!(rig_depth_of_field(&mut g).unwrap_err().is_warning());

    g.select(&["cube".to_string(), "locator1".to_string()]);
    assert!(rig_depth_of_field(&mut g).unwrap_err().is_warning());

    let mut g = MemoryGraph::new();
    g.create(NodeKind::Locator, "locator1").unwrap();
    g.select(&["locator1".to_string()]);
    assert!(rig_depth_of_field(&mut g).unwrap_err().is_warning());
    assert!(g.exists("locator1"), "nothing renamed before the camera check");
}

#[test]
fn failed_connection_keeps_existing_distance_node() {
    let mut g = scene(1);
    g.create(NodeKind::Transform, "stray").unwrap();
    g.create(NodeKind::DistanceBetween, DISTANCE_NODE).unwrap();
    g.connect(&plug("stray.translate"), &plug("DOF_distanceBetween.point1"), false)
        .unwrap();
    assert!(rig_depth_of_field(&mut g).is_err());
    assert!(g.exists(DISTANCE_NODE));
}

/// Delegates to a [`MemoryGraph`] but refuses connections into one attribute.
struct RefusingGraph {
    inner: MemoryGraph,
    refuse: &'static str,
}

impl SceneGraph for RefusingGraph {
    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }
    fn node(&self, name: &str) -> Option<NodeRef> {
        self.inner.node(name)
    }
    fn list(&self, kind: &NodeKind) -> Vec<NodeRef> {
        self.inner.list(kind)
    }
    fn all_nodes(&self) -> Vec<NodeRef> {
        self.inner.all_nodes()
    }
    fn children(&self, name: &str) -> Vec<NodeRef> {
        self.inner.children(name)
    }
    fn parent_of(&self, name: &str) -> Option<String> {
        self.inner.parent_of(name)
    }
    fn long_name(&self, name: &str) -> Option<String> {
        self.inner.long_name(name)
    }
    fn get_attr(&self, plug: &Plug) -> Option<AttrValue> {
        self.inner.get_attr(plug)
    }
    fn connections(&self, node: &str) -> Vec<crate::graph::repo::Connection> {
        self.inner.connections(node)
    }
    fn set_members(&self, set: &str) -> Vec<String> {
        self.inner.set_members(set)
    }
    fn is_locked(&self, name: &str) -> bool {
        self.inner.is_locked(name)
    }
    fn locked_attrs(&self, name: &str) -> Vec<String> {
        self.inner.locked_attrs(name)
    }
    fn bounding_box(&self, name: &str) -> Option<crate::foundation::core::Rect> {
        self.inner.bounding_box(name)
    }
    fn selection(&self) -> Vec<String> {
        self.inner.selection()
    }
    fn plugin_loaded(&self, plugin: &str) -> bool {
        self.inner.plugin_loaded(plugin)
    }
    fn plugin_node_types(&self, plugin: &str) -> Vec<NodeKind> {
        self.inner.plugin_node_types(plugin)
    }
    fn create(&mut self, kind: NodeKind, name: &str) -> ShelfResult<NodeRef> {
        self.inner.create(kind, name)
    }
    fn rename(&mut self, name: &str, new_name: &str) -> ShelfResult<NodeRef> {
        self.inner.rename(name, new_name)
    }
    fn delete(&mut self, name: &str) -> ShelfResult<()> {
        self.inner.delete(name)
    }
    fn reparent(&mut self, child: &str, parent: Option<&str>) -> ShelfResult<()> {
        self.inner.reparent(child, parent)
    }
    fn set_attr(&mut self, plug: &Plug, value: AttrValue) -> ShelfResult<()> {
        self.inner.set_attr(plug, value)
    }
    fn set_attr_locked(&mut self, plug: &Plug, locked: bool) -> ShelfResult<()> {
        self.inner.set_attr_locked(plug, locked)
    }
    fn connect(&mut self, src: &Plug, dst: &Plug, force: bool) -> ShelfResult<()> {
        if dst.attr == self.refuse {
            return Err(ShelfError::graph(format!("refused '{dst}'")));
        }
        self.inner.connect(src, dst, force)
    }
    fn force_element(&mut self, set: &str, members: &[String]) -> ShelfResult<()> {
        self.inner.force_element(set, members)
    }
    fn duplicate(&mut self, name: &str) -> ShelfResult<NodeRef> {
        self.inner.duplicate(name)
    }
    fn group(&mut self, members: &[String], name: &str) -> ShelfResult<NodeRef> {
        self.inner.group(members, name)
    }
    fn select(&mut self, names: &[String]) {
        self.inner.select(names)
    }
    fn load_plugin(&mut self, plugin: &str) -> ShelfResult<()> {
        self.inner.load_plugin(plugin)
    }
    fn unload_plugin(&mut self, plugin: &str) -> ShelfResult<()> {
        self.inner.unload_plugin(plugin)
    }
}

#[test]
fn failed_connection_removes_fresh_distance_node() {
    let mut g = RefusingGraph {
        inner: scene(1),
        refuse: "point2",
    };
    assert!(rig_depth_of_field(&mut g).is_err());
    assert!(!g.exists(DISTANCE_NODE));
    assert!(g.inner.connections("DOF").is_empty());
}

#[test]
fn bokeh_failures_are_skipped_per_node() {
    let mut g = RefusingGraph {
        inner: scene(2),
        refuse: "dofFocusDistance",
    };
    let rig = rig_depth_of_field(&mut g).unwrap();
    assert_eq!(rig.bokeh.skipped.len(), 2);
    assert!(g.exists(DISTANCE_NODE));
}
