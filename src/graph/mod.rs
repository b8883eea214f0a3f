//! Host scene-graph access.
//!
//! Operations never talk to a host directly; they go through [`repo::SceneGraph`].

pub mod context;
pub mod memory;
pub mod repo;
