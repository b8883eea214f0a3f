//! Host operations: short procedures that read the scene graph, derive a value, and write back.
//!
//! Every entry point is generic over [`SceneGraph`] and reports missing selections or nodes as
//! [`ShelfError::Precondition`]. Operations that walk a collection record per-item failures in a
//! [`BatchReport`] and keep going.

pub mod cleanup;
pub mod dof;
pub mod layout;
pub mod material;
pub mod render_settings;
pub mod scene;
pub mod shader_transfer;

use crate::foundation::error::{ShelfError, ShelfResult};
use crate::graph::repo::SceneGraph;

/// An item a batch operation could not process.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Skipped {
    pub item: String,
    pub reason: String,
}

/// Outcome of an operation over many items.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchReport {
    pub done: Vec<String>,
    pub skipped: Vec<Skipped>,
}

impl BatchReport {
    /// Record the result for one item; failures are logged and skipped.
    pub fn record(&mut self, item: impl Into<String>, result: ShelfResult<()>) {
        let item = item.into();
        match result {
            Ok(()) => self.done.push(item),
            Err(err) => self.skip(item, err.to_string()),
        }
    }

    pub fn skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        let skipped = Skipped {
            item: item.into(),
            reason: reason.into(),
        };
        tracing::warn!(item = %skipped.item, reason = %skipped.reason, "skipped");
        self.skipped.push(skipped);
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Current selection, or a precondition error naming what the operation needs.
pub(crate) fn require_selection<G: SceneGraph + ?Sized>(
    graph: &G,
    what: &str,
) -> ShelfResult<Vec<String>> {
    let selection = graph.selection();
    if selection.is_empty() {
        return Err(ShelfError::precondition(format!("nothing selected; select {what}")));
    }
    Ok(selection)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/mod.rs"]
mod tests;
