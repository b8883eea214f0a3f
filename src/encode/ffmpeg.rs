use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    encode::sequence::require_sequence,
    foundation::{
        core::format_fps,
        error::{ShelfError, ShelfResult},
    },
    template::render_path::RenderOutput,
};

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Still-image format for [`EncodeJob::ExtractFrames`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Png,
    Jpg,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }
}

/// One synchronous ffmpeg invocation. Every job overwrites its output.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodeJob {
    /// Image sequence to a ProRes 4444 movie with alpha.
    ProRes {
        input_pattern: PathBuf,
        fps: f64,
        start_frame: i64,
        frame_count: u64,
        output: PathBuf,
    },
    /// Image sequence to a half-resolution palette GIF.
    Gif {
        input_pattern: PathBuf,
        fps: f64,
        start_frame: i64,
        output: PathBuf,
    },
    MovieToGif {
        input: PathBuf,
        output: PathBuf,
    },
    /// Movie to numbered stills `<output_dir>/<name>_%04d.<ext>`.
    ExtractFrames {
        input: PathBuf,
        format: FrameFormat,
        output_dir: PathBuf,
        name: String,
    },
}

impl EncodeJob {
    /// ProRes movie next to the rendered frames (`<prefix>.mov`).
    pub fn prores(render: &RenderOutput, fps: f64) -> Self {
        Self::ProRes {
            input_pattern: render.sequence_pattern_path(),
            fps,
            start_frame: render.range.start,
            frame_count: render.range.len(),
            output: render.movie_path("mov"),
        }
    }

    /// GIF next to the rendered frames (`<prefix>.gif`).
    pub fn gif(render: &RenderOutput, fps: f64) -> Self {
        Self::Gif {
            input_pattern: render.sequence_pattern_path(),
            fps,
            start_frame: render.range.start,
            output: render.movie_path("gif"),
        }
    }

    /// GIF with the same stem, next to the movie.
    pub fn movie_to_gif(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = input.with_extension("gif");
        Self::MovieToGif { input, output }
    }

    /// Stills go into a directory named after the movie, next to it.
    pub fn extract_frames(input: impl Into<PathBuf>, format: FrameFormat) -> ShelfResult<Self> {
        let input = input.into();
        let name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ShelfError::validation(format!(
                    "cannot derive a frame name from '{}'",
                    input.display()
                ))
            })?
            .to_string();
        let output_dir = input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
            .join(&name);
        Ok(Self::ExtractFrames {
            input,
            format,
            output_dir,
            name,
        })
    }

    /// File (or directory, for extracted frames) the job writes.
    pub fn output(&self) -> &Path {
        match self {
            Self::ProRes { output, .. } | Self::Gif { output, .. } | Self::MovieToGif { output, .. } => {
                output
            }
            Self::ExtractFrames { output_dir, .. } => output_dir,
        }
    }

    pub fn validate(&self) -> ShelfResult<()> {
        match self {
            Self::ProRes {
                fps, frame_count, ..
            } => {
                validate_fps(*fps)?;
                if *frame_count == 0 {
                    return Err(ShelfError::validation("frame count must be non-zero"));
                }
            }
            Self::Gif { fps, .. } => validate_fps(*fps)?,
            Self::MovieToGif { input, output } => {
                if input == output {
                    return Err(ShelfError::validation(format!(
                        "input and output are the same file '{}'",
                        input.display()
                    )));
                }
            }
            Self::ExtractFrames { name, .. } => {
                if name.is_empty() {
                    return Err(ShelfError::validation("frame name must be non-empty"));
                }
            }
        }
        Ok(())
    }

    /// Command-line arguments after the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        match self {
            Self::ProRes {
                input_pattern,
                fps,
                start_frame,
                frame_count,
                output,
            } => {
                let frames = frame_count.to_string();
                args.extend(sequence_input(input_pattern, *fps, *start_frame));
                args.extend(
                    [
                        "-frames:v",
                        frames.as_str(),
                        "-c:v",
                        "prores_ks",
                        "-profile:v",
                        "4444",
                        "-pix_fmt",
                        "yuva444p10le",
                    ]
                    .map(OsString::from),
                );
                args.push(output.into());
            }
            Self::Gif {
                input_pattern,
                fps,
                start_frame,
                output,
            } => {
                args.extend(sequence_input(input_pattern, *fps, *start_frame));
                args.push("-vf".into());
                args.push("scale=iw/2:ih/2,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse".into());
                args.push(output.into());
            }
            Self::MovieToGif { input, output } => {
                args.push("-i".into());
                args.push(input.into());
                args.extend(
                    ["-vf", "fps=10,scale=640:-1:flags=lanczos", "-loop", "0"].map(OsString::from),
                );
                args.push(output.into());
            }
            Self::ExtractFrames {
                input,
                format,
                output_dir,
                name,
            } => {
                args.push("-i".into());
                args.push(input.into());
                match format {
                    FrameFormat::Png => args.extend(
                        ["-vf", "scale=iw/2:ih/2", "-compression_level", "100"]
                            .map(OsString::from),
                    ),
                    FrameFormat::Jpg => args.extend(["-q:v", "2"].map(OsString::from)),
                }
                args.push(
                    output_dir
                        .join(format!("{name}_%04d.{}", format.extension()))
                        .into(),
                );
            }
        }
        args
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::ProRes { .. } => "prores",
            Self::Gif { .. } => "gif",
            Self::MovieToGif { .. } => "movie-gif",
            Self::ExtractFrames { .. } => "extract-frames",
        }
    }

    fn check_inputs(&self) -> ShelfResult<()> {
        match self {
            Self::ProRes { input_pattern, .. } | Self::Gif { input_pattern, .. } => {
                require_sequence(input_pattern)?;
            }
            Self::MovieToGif { input, .. } | Self::ExtractFrames { input, .. } => {
                if !input.is_file() {
                    return Err(ShelfError::precondition(format!(
                        "input movie '{}' does not exist",
                        input.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_fps(fps: f64) -> ShelfResult<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ShelfError::validation(format!(
            "frame rate must be positive, got {fps}"
        )));
    }
    Ok(())
}

fn sequence_input(pattern: &Path, fps: f64, start_frame: i64) -> Vec<OsString> {
    vec![
        "-framerate".into(),
        format_fps(fps).into(),
        "-start_number".into(),
        start_frame.to_string().into(),
        "-i".into(),
        pattern.into(),
    ]
}

/// Runs [`EncodeJob`]s against a system ffmpeg binary.
#[derive(Clone, Debug, PartialEq)]
pub struct FfmpegRunner {
    binary: PathBuf,
    extra_path: Option<PathBuf>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl FfmpegRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_path: None,
        }
    }

    /// Also search `dir` (after the inherited `PATH`) for the binary.
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_path = Some(dir.into());
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> ShelfResult<Command> {
        let mut cmd = Command::new(&self.binary);
        if let Some(extra) = &self.extra_path {
            let mut dirs: Vec<PathBuf> = std::env::var_os("PATH")
                .map(|p| std::env::split_paths(&p).collect())
                .unwrap_or_default();
            dirs.push(extra.clone());
            let joined = std::env::join_paths(dirs).map_err(|e| {
                ShelfError::validation(format!(
                    "invalid ffmpeg search path '{}': {e}",
                    extra.display()
                ))
            })?;
            cmd.env("PATH", joined);
        }
        Ok(cmd)
    }

    pub fn is_available(&self) -> bool {
        self.command()
            .and_then(|mut cmd| {
                cmd.arg("-version")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map_err(|e| ShelfError::process(e.to_string()))
            })
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run `job` to completion and return the path it wrote.
    #[tracing::instrument(skip(self), fields(kind = job.kind()))]
    pub fn run(&self, job: &EncodeJob) -> ShelfResult<PathBuf> {
        job.validate()?;
        job.check_inputs()?;

        if !self.is_available() {
            return Err(ShelfError::process(format!(
                "ffmpeg is required for this conversion, but '{}' was not found",
                self.binary.display()
            )));
        }

        match job {
            EncodeJob::ExtractFrames { output_dir, .. } => {
                use anyhow::Context as _;
                std::fs::create_dir_all(output_dir).with_context(|| {
                    format!("failed to create frame directory '{}'", output_dir.display())
                })?;
            }
            _ => ensure_parent_dir(job.output())?,
        }

        let args = job.args();
        tracing::debug!(?args, "running ffmpeg");
        let out = self
            .command()?
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ShelfError::process(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ShelfError::process(format!(
                "ffmpeg exited with status {}: {}",
                out.status,
                stderr.trim()
            )));
        }

        tracing::info!(output = %job.output().display(), "conversion finished");
        Ok(job.output().to_path_buf())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    FfmpegRunner::default().is_available()
}

pub fn ensure_parent_dir(path: &Path) -> ShelfResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
