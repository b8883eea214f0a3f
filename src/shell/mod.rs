//! OS integration: file browser, clipboard and external program launches.

pub mod clipboard;
pub mod explorer;
pub mod launch;
