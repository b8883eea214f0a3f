use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::foundation::error::{ShelfError, ShelfResult};

/// Command-line renderer shipped with the host.
pub const DEFAULT_RENDER_COMMAND: &str = "Render";
pub const DEFAULT_VIEWER: &str = r"C:\Program Files\DJV2\bin\djv.exe";

/// A program and its arguments, ready to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Launch {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Launch {
    pub fn new<I, A>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> ShelfError {
        ShelfError::process(format!(
            "failed to start '{}': {e}",
            self.program.display()
        ))
    }

    /// Start the program and return its process id without waiting for it.
    pub fn spawn_detached(&self) -> ShelfResult<u32> {
        let child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        tracing::debug!(program = %self.program.display(), pid = child.id(), "started");
        Ok(child.id())
    }

    /// Run the program to completion; a non-zero exit is an error.
    pub fn run(&self) -> ShelfResult<()> {
        let status = self.command().status().map_err(|e| self.spawn_error(e))?;
        if !status.success() {
            return Err(ShelfError::process(format!(
                "'{}' exited with status {status}",
                self.program.display()
            )));
        }
        Ok(())
    }
}

/// Headless batch render of a saved scene: `<render_command> <scene>`.
pub fn render_job(render_command: &Path, scene: &Path) -> Launch {
    Launch::new(render_command, [scene.as_os_str()])
}

/// Image viewer on a frame of a rendered sequence.
///
/// A viewer given as a path must exist; a bare program name is resolved through `PATH` at launch.
pub fn viewer_job(viewer: &Path, image: &Path) -> ShelfResult<Launch> {
    if viewer.components().count() > 1 && !viewer.is_file() {
        return Err(ShelfError::precondition(format!(
            "viewer executable not found at '{}'",
            viewer.display()
        )));
    }
    Ok(Launch::new(viewer, [image.as_os_str()]))
}

#[cfg(test)]
#[path = "../../tests/unit/shell/launch.rs"]
mod tests;
