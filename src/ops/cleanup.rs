use std::collections::BTreeSet;

use crate::foundation::core::{NodeKind, Plug};
use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::SceneGraph;
use crate::ops::{BatchReport, require_selection};

/// Materials every scene carries; never deleted.
pub const DEFAULT_MATERIALS: &[&str] = &["lambert1", "particleCloud1", "shaderGlow1"];

pub const DEFAULT_UNLOAD_PLUGINS: &[&str] = &["mtoa"];

/// Nodes the default unload plugin leaves behind even when no node of its types exists.
pub const DEFAULT_PLUGIN_NODES: &[&str] = &[
    "defaultArnoldFilter",
    "defaultArnoldRenderOptions",
    "defaultArnoldDriver",
    "defaultArnoldDisplayDriver",
    "defaultArnoldDenoiser",
];

pub const DEFAULT_LOAD_PLUGINS: &[&str] = &[
    "Substance.mll",
    "substanceconnector.mll",
    "substancelink.mll",
    "substancemaya.mll",
    "substanceworkflow.py",
];

pub const DEFAULT_PRUNE_KEYWORDS: &[&str] = &["joints", "att", "cage"];

/// Key values of an animation curve.
pub const KEY_VALUES_ATTR: &str = "keyValues";

/// Delete materials whose shading groups have no members.
#[tracing::instrument(skip(graph))]
pub fn delete_unused_materials<G: SceneGraph + ?Sized>(graph: &mut G) -> BatchReport {
    let unused: Vec<String> = graph
        .all_nodes()
        .into_iter()
        .filter(|n| n.kind.is_material() && !DEFAULT_MATERIALS.contains(&n.name.as_str()))
        .filter(|mat| {
            let used = graph
                .connections(&mat.name)
                .iter()
                .filter_map(|c| {
                    let other = if c.src.node == mat.name { &c.dst } else { &c.src };
                    graph.node(&other.node)
                })
                .filter(|n| n.kind == NodeKind::ShadingEngine)
                .any(|sg| !graph.set_members(&sg.name).is_empty());
            !used
        })
        .map(|n| n.name)
        .collect();

    let mut report = BatchReport::default();
    for mat in unused {
        let result = graph.delete(&mat);
        report.record(mat, result);
    }
    tracing::info!(deleted = ?report.done, "deleted unused materials");
    report
}

/// Unload each loaded plugin after deleting the nodes that keep it in use.
///
/// Locked nodes are left in place, in which case the unload itself fails and the plugin is
/// reported as skipped.
#[tracing::instrument(skip(graph, plugins, default_nodes))]
pub fn unload_plugins<G, S, D>(graph: &mut G, plugins: &[S], default_nodes: &[D]) -> BatchReport
where
    G: SceneGraph + ?Sized,
    S: AsRef<str>,
    D: AsRef<str>,
{
    let mut report = BatchReport::default();
    for plugin in plugins {
        let plugin = plugin.as_ref();
        if !graph.plugin_loaded(plugin) {
            tracing::info!(plugin, "plugin is not loaded");
            continue;
        }
        let result = unload_one(graph, plugin, default_nodes);
        report.record(plugin, result);
    }
    report
}

fn unload_one<G, D>(graph: &mut G, plugin: &str, default_nodes: &[D]) -> ShelfResult<()>
where
    G: SceneGraph + ?Sized,
    D: AsRef<str>,
{
    let mut doomed = BTreeSet::new();
    for kind in graph.plugin_node_types(plugin) {
        doomed.extend(graph.list(&kind).into_iter().map(|n| n.name));
    }
    doomed.extend(
        default_nodes
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| graph.exists(n))
            .map(str::to_string),
    );

    for node in doomed {
        // Deleting a parent may already have removed it.
        if !graph.exists(&node) {
            continue;
        }
        if graph.is_locked(&node) {
            tracing::warn!(%node, "locked; not deleted");
            continue;
        }
        if let Err(err) = graph.delete(&node) {
            tracing::warn!(%node, %err, "failed to delete");
        }
    }
    graph.unload_plugin(plugin)?;
    tracing::info!(plugin, "plugin unloaded");
    Ok(())
}

/// Load plugins in order, stopping at the first failure.
#[tracing::instrument(skip(graph, plugins))]
pub fn load_plugins<G: SceneGraph + ?Sized, S: AsRef<str>>(
    graph: &mut G,
    plugins: &[S],
) -> BatchReport {
    let mut report = BatchReport::default();
    for plugin in plugins {
        let plugin = plugin.as_ref();
        if graph.plugin_loaded(plugin) {
            tracing::info!(plugin, "plugin already loaded");
            report.done.push(plugin.to_string());
            continue;
        }
        match graph.load_plugin(plugin) {
            Ok(()) => {
                tracing::info!(plugin, "plugin loaded");
                report.done.push(plugin.to_string());
            }
            Err(err) => {
                report.skip(plugin, err.to_string());
                break;
            }
        }
    }
    report
}

/// Delete animation curves on the selection whose keys all hold the same value.
#[tracing::instrument(skip(graph))]
pub fn clean_static_channels<G: SceneGraph + ?Sized>(graph: &mut G) -> ShelfResult<BatchReport> {
    let selection = require_selection(graph, "animated objects")?;
    let mut curves = BTreeSet::new();
    for node in &selection {
        for c in graph.connections(node) {
            if let Some(src) = graph.node(&c.src.node)
                && src.kind.is_anim_curve()
            {
                curves.insert(src.name);
            }
        }
    }

    let mut report = BatchReport::default();
    for curve in curves {
        let values = Plug::new(curve.clone(), KEY_VALUES_ATTR)
            .ok()
            .and_then(|p| graph.get_attr(&p))
            .and_then(|v| v.as_float_list().map(<[f64]>::to_vec))
            .unwrap_or_default();
        let Some(first) = values.first() else {
            continue;
        };
        if values.iter().all(|v| v == first) {
            let result = graph.delete(&curve);
            report.record(curve, result);
        }
    }
    Ok(report)
}

/// Unlock every locked channel in the scene; returns how many were unlocked.
#[tracing::instrument(skip(graph))]
pub fn unlock_all_channels<G: SceneGraph + ?Sized>(graph: &mut G) -> usize {
    let mut unlocked = 0;
    for node in graph.all_nodes() {
        for attr in graph.locked_attrs(&node.name) {
            let Ok(plug) = Plug::new(node.name.clone(), attr) else {
                continue;
            };
            match graph.set_attr_locked(&plug, false) {
                Ok(()) => unlocked += 1,
                Err(err) => tracing::debug!(%plug, %err, "could not unlock"),
            }
        }
    }
    tracing::info!(unlocked, "unlocked channels");
    unlocked
}

/// Unlock all channels, then delete DAG nodes whose long name contains any keyword, ignoring
/// case.
///
/// Shallow matches go first, and anything below an already-deleted node is left out.
#[tracing::instrument(skip(graph, keywords))]
pub fn prune_matching<G: SceneGraph + ?Sized, S: AsRef<str>>(
    graph: &mut G,
    keywords: &[S],
) -> ShelfResult<BatchReport> {
    unlock_all_channels(graph);
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    let mut matching: Vec<String> = graph
        .all_nodes()
        .into_iter()
        .filter(|n| n.kind.is_dag())
        .filter_map(|n| graph.long_name(&n.name))
        .filter(|long| {
            let lower = long.to_lowercase();
            keywords.iter().any(|k| lower.contains(k.as_str()))
        })
        .collect();
    if matching.is_empty() {
        return Err(ShelfError::precondition("no matching objects found"));
    }
    matching.sort_by_key(|n| n.matches('|').count());

    let mut roots: Vec<String> = Vec::new();
    for node in matching {
        if !roots.iter().any(|r| node.starts_with(&format!("{r}|"))) {
            roots.push(node);
        }
    }

    let mut report = BatchReport::default();
    for node in roots {
        let result = graph.delete(&node);
        report.record(node, result);
    }
    tracing::info!(deleted = report.done.len(), "pruned matching objects");
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/cleanup.rs"]
mod tests;
