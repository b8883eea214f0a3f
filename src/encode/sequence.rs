use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ShelfError, ShelfResult};

/// Files in `dir` named `<stem>.<anything>`, sorted by name.
///
/// A missing directory is an empty sequence.
pub fn find_sequence(dir: &Path, stem: &str) -> ShelfResult<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("read sequence directory '{}'", dir.display()))
                .into());
        }
    };

    let prefix = format!("{stem}.");
    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("read sequence directory '{}'", dir.display()))?;
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| n.starts_with(&prefix)) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Directory and file stem of a printf-style frame pattern (`/r/shot.%04d.png` -> `/r`, `shot`).
pub fn pattern_parts(pattern: &Path) -> Option<(PathBuf, String)> {
    let name = pattern.file_name()?.to_str()?;
    let idx = name.find(".%")?;
    let dir = pattern.parent().map(Path::to_path_buf).unwrap_or_default();
    Some((dir, name[..idx].to_string()))
}

/// Like [`find_sequence`] for a frame pattern, but an empty result is a precondition failure.
pub fn require_sequence(pattern: &Path) -> ShelfResult<Vec<PathBuf>> {
    let (dir, stem) = pattern_parts(pattern).ok_or_else(|| {
        ShelfError::validation(format!(
            "'{}' is not a frame pattern (expected '<name>.%0Nd.<ext>')",
            pattern.display()
        ))
    })?;
    let files = find_sequence(&dir, &stem)?;
    if files.is_empty() {
        return Err(ShelfError::precondition(format!(
            "no images found matching '{stem}' in '{}'",
            dir.display()
        )));
    }
    tracing::debug!(count = files.len(), stem, "found image sequence");
    Ok(files)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sequence.rs"]
mod tests;
