//! Pure naming rules: derived artifact names, version tokens and name matching.

pub mod derive;
pub mod matching;
pub mod version;
