use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{ShelfError, ShelfResult},
    shell::launch::Launch,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }
}

/// What the file browser should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Open a window on a directory.
    Directory(PathBuf),
    /// Open the containing directory with the file highlighted where the platform supports it.
    File(PathBuf),
}

impl Reveal {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(p) | Self::File(p) => p,
        }
    }
}

/// File-browser invocation for `reveal` on `platform`.
///
/// Linux file managers have no portable "select" flag, so files open their parent directory.
pub fn browser_command(reveal: &Reveal, platform: Platform) -> Launch {
    match (platform, reveal) {
        (Platform::Windows, Reveal::Directory(dir)) => Launch::new("explorer", [dir.as_os_str()]),
        (Platform::Windows, Reveal::File(file)) => {
            Launch::new("explorer", [OsString::from("/select,"), file.into()])
        }
        (Platform::MacOs, Reveal::Directory(dir)) => Launch::new("open", [dir.as_os_str()]),
        (Platform::MacOs, Reveal::File(file)) => {
            Launch::new("open", [OsString::from("-R"), file.into()])
        }
        (Platform::Linux, Reveal::Directory(dir)) => Launch::new("xdg-open", [dir.as_os_str()]),
        (Platform::Linux, Reveal::File(file)) => {
            let dir = file.parent().unwrap_or(Path::new("."));
            Launch::new("xdg-open", [dir.as_os_str()])
        }
    }
}

/// Open a file-browser window. Best effort: the browser is not waited on.
#[tracing::instrument]
pub fn reveal(target: &Reveal) -> ShelfResult<()> {
    let path = target.path();
    let exists = match target {
        Reveal::Directory(p) => p.is_dir(),
        Reveal::File(p) => p.exists(),
    };
    if !exists {
        return Err(ShelfError::precondition(format!(
            "'{}' does not exist",
            path.display()
        )));
    }
    browser_command(target, Platform::current()).spawn_detached()?;
    tracing::info!(path = %path.display(), "opened file browser");
    Ok(())
}

pub fn open_directory(dir: impl Into<PathBuf>) -> ShelfResult<()> {
    reveal(&Reveal::Directory(dir.into()))
}

pub fn select_file(file: impl Into<PathBuf>) -> ShelfResult<()> {
    reveal(&Reveal::File(file.into()))
}

#[cfg(test)]
#[path = "../../tests/unit/shell/explorer.rs"]
mod tests;
