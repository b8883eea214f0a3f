use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use shelfkit::{
    EncodeJob, FrameFormat, HostContext, QualityTier, RenderOutput, SceneGraph as _, SceneSnapshot,
    ShelfConfig, ShelfError, ShelfResult,
    foundation::core::TimeUnit,
    ops::{self, BatchReport, render_settings::RenderPreset},
    shell::{clipboard, explorer, launch},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shelfkit", version, about = "Scene, shader and render pipeline tools")]
struct Cli {
    /// JSON config file; built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by SHELFKIT_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct SnapshotArg {
    /// Scene snapshot JSON (host context plus graph).
    #[arg(long, short = 's')]
    snapshot: PathBuf,
}

#[derive(Args, Debug)]
struct RevealArg {
    /// Do not open a file browser on the result.
    #[arg(long)]
    no_reveal: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the document as its next version (`shot_v003.ma` -> `shot_v004.ma`).
    VersionUp(SnapshotArg),
    /// Print where the current render settings write frames.
    RenderPath(SnapshotArg),
    /// Open a file browser on the render output directory.
    OpenRenderDir(SnapshotArg),
    /// Open the first rendered frame in the image viewer.
    ViewRender(SnapshotArg),
    /// Convert the rendered sequence to a ProRes 4444 movie.
    Prores {
        #[command(flatten)]
        scene: SnapshotArg,
        #[command(flatten)]
        reveal: RevealArg,
    },
    /// Convert the rendered sequence to a GIF.
    Gif {
        #[command(flatten)]
        scene: SnapshotArg,
        #[command(flatten)]
        reveal: RevealArg,
    },
    /// Convert a movie to a GIF next to it.
    MovieGif {
        input: PathBuf,
        #[command(flatten)]
        reveal: RevealArg,
    },
    /// Extract a movie's frames into a directory named after it.
    ExtractFrames {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = FrameFormat::Png)]
        format: FrameFormat,
        #[command(flatten)]
        reveal: RevealArg,
    },
    /// Start a headless batch render of the saved document.
    Render(SnapshotArg),
    /// Open a file browser on the document's directory.
    OpenDir(SnapshotArg),
    /// Copy the document path to the clipboard.
    CopyPath(SnapshotArg),
    /// Print the most recent document; `--open` makes it the current one.
    Recent {
        #[command(flatten)]
        scene: SnapshotArg,
        #[arg(long)]
        open: bool,
    },
    /// Run a scene operation on a snapshot and write the result back.
    Scene {
        #[command(flatten)]
        scene: SnapshotArg,
        /// Replace the selection before running (comma separated).
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<String>>,
        /// Write the result here instead of over the input.
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(subcommand)]
        op: SceneOp,
    },
}

#[derive(Subcommand, Debug)]
enum SceneOp {
    /// New material (and shading group) for the selected objects or faces.
    AssignMaterial {
        #[arg(long)]
        shader_type: Option<String>,
    },
    /// Replace legacy surface shaders on the selection.
    ConvertMaterials,
    /// Drive the selected shader's base color from an image file.
    ConnectTexture { texture: PathBuf },
    /// Apply the render preset and make sure the render camera exists.
    RenderSettings {
        #[arg(long, value_enum)]
        quality: Option<QualityTier>,
    },
    /// Drive bokeh focus distance from the selected locator.
    Dof,
    /// Copy shader assignments from the first selected group to the second.
    TransferShaders,
    DeleteUnusedMaterials,
    UnloadPlugins,
    LoadPlugins,
    /// Delete animation curves whose keys never change.
    CleanStatic,
    UnlockChannels,
    /// Unlock all channels, then delete DAG nodes whose names contain a keyword.
    Prune {
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Match render frame range to the playback range.
    SyncFrameRange,
    SelectShaders,
    /// Duplicate the selection onto a centered grid.
    LayoutGrid,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("SHELFKIT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cfg = ShelfConfig::load(cli.config.as_deref())?;
    match run(cli.cmd, &cfg) {
        Err(e) if e.is_warning() => {
            tracing::warn!("{e}");
            Ok(())
        }
        other => Ok(other?),
    }
}

fn run(cmd: Command, cfg: &ShelfConfig) -> ShelfResult<()> {
    match cmd {
        Command::VersionUp(a) => cmd_version_up(&a.snapshot),
        Command::RenderPath(a) => {
            let (_, out) = render_output(&a.snapshot)?;
            println!("{}", out.placeholder_path().display());
            println!("{}", out.sequence_pattern_path().display());
            println!("{}-{}", out.range.start, out.range.end);
            Ok(())
        }
        Command::OpenRenderDir(a) => {
            let (_, out) = render_output(&a.snapshot)?;
            explorer::open_directory(out.frames_dir())
        }
        Command::ViewRender(a) => {
            let (_, out) = render_output(&a.snapshot)?;
            let image = out.first_frame_path();
            if !image.exists() {
                return Err(ShelfError::precondition(format!(
                    "no rendered frame at '{}'",
                    image.display()
                )));
            }
            launch::viewer_job(&cfg.viewer, &image)?.run()
        }
        Command::Prores { scene, reveal } => {
            let (snap, out) = render_output(&scene.snapshot)?;
            let job = EncodeJob::prores(&out, frame_rate(cfg, &snap.context));
            encode(cfg, &job, reveal.no_reveal)
        }
        Command::Gif { scene, reveal } => {
            let (snap, out) = render_output(&scene.snapshot)?;
            let job = EncodeJob::gif(&out, frame_rate(cfg, &snap.context));
            encode(cfg, &job, reveal.no_reveal)
        }
        Command::MovieGif { input, reveal } => {
            encode(cfg, &EncodeJob::movie_to_gif(input), reveal.no_reveal)
        }
        Command::ExtractFrames {
            input,
            format,
            reveal,
        } => {
            let job = EncodeJob::extract_frames(input, format)?;
            let dir = cfg.ffmpeg_runner().run(&job)?;
            println!("{}", dir.display());
            if !reveal.no_reveal {
                best_effort(explorer::open_directory(dir));
            }
            Ok(())
        }
        Command::Render(a) => {
            let snap = SceneSnapshot::from_path(&a.snapshot)?;
            let scene = snap.context.require_scene_path()?;
            let pid = launch::render_job(&cfg.render_command, scene).spawn_detached()?;
            tracing::info!(pid, scene = %scene.display(), "started headless render");
            Ok(())
        }
        Command::OpenDir(a) => {
            let snap = SceneSnapshot::from_path(&a.snapshot)?;
            let scene = snap.context.require_scene_path()?;
            let dir = scene.parent().unwrap_or(Path::new("."));
            explorer::open_directory(dir)
        }
        Command::CopyPath(a) => {
            let snap = SceneSnapshot::from_path(&a.snapshot)?;
            let text = clipboard::copy_path(snap.context.require_scene_path()?)?;
            println!("{text}");
            Ok(())
        }
        Command::Recent { scene, open } => {
            let mut snap = SceneSnapshot::from_path(&scene.snapshot)?;
            let recent = snap.context.most_recent_file()?.to_path_buf();
            println!("{}", recent.display());
            if open {
                snap.context.scene_path = Some(recent);
                snap.save(&scene.snapshot)?;
            }
            Ok(())
        }
        Command::Scene {
            scene,
            select,
            out,
            op,
        } => {
            let mut snap = SceneSnapshot::from_path(&scene.snapshot)?;
            if let Some(names) = select {
                snap.graph.select(&names);
            }
            run_scene_op(&mut snap, op, cfg)?;
            snap.save(out.as_deref().unwrap_or(&scene.snapshot))
        }
    }
}

fn run_scene_op(snap: &mut SceneSnapshot, op: SceneOp, cfg: &ShelfConfig) -> ShelfResult<()> {
    let graph = &mut snap.graph;
    match op {
        SceneOp::AssignMaterial { shader_type } => {
            let shader_type = shader_type.as_deref().unwrap_or(&cfg.material_type);
            let done = ops::material::assign_new_material(graph, shader_type)?;
            println!(
                "{} -> {} ({} members)",
                done.resolved.material,
                done.resolved.shading_group,
                done.members.len()
            );
        }
        SceneOp::ConvertMaterials => {
            let report =
                ops::material::convert_materials(graph, &cfg.convertible_types, &cfg.material_type)?;
            print_report(&report);
        }
        SceneOp::ConnectTexture { texture } => {
            let done = ops::material::connect_base_color(graph, &texture)?;
            println!("{} -> {}.{}", done.file, done.shader, done.target_attr);
        }
        SceneOp::RenderSettings { quality } => {
            let preset = RenderPreset::for_tier(quality.unwrap_or(cfg.quality));
            let report = ops::render_settings::apply_render_settings(graph, &preset)?;
            println!(
                "applied {} settings; camera {}{}",
                report.applied,
                report.camera,
                if report.camera_created { " (created)" } else { "" }
            );
        }
        SceneOp::Dof => {
            let rig = ops::dof::rig_depth_of_field(graph)?;
            println!("{} -> {} via {}", rig.locator, rig.camera_locator, rig.distance);
            print_report(&rig.bokeh);
        }
        SceneOp::TransferShaders => {
            print_report(&ops::shader_transfer::transfer_from_selection(graph)?);
        }
        SceneOp::DeleteUnusedMaterials => {
            print_report(&ops::cleanup::delete_unused_materials(graph));
        }
        SceneOp::UnloadPlugins => print_report(&ops::cleanup::unload_plugins(
            graph,
            &cfg.unload_plugins,
            &cfg.plugin_default_nodes,
        )),
        SceneOp::LoadPlugins => {
            print_report(&ops::cleanup::load_plugins(graph, &cfg.load_plugins));
        }
        SceneOp::CleanStatic => print_report(&ops::cleanup::clean_static_channels(graph)?),
        SceneOp::UnlockChannels => {
            println!("unlocked {} channels", ops::cleanup::unlock_all_channels(graph));
        }
        SceneOp::Prune { keywords } => {
            let keywords = if keywords.is_empty() {
                &cfg.prune_keywords
            } else {
                &keywords
            };
            print_report(&ops::cleanup::prune_matching(graph, keywords)?);
        }
        SceneOp::SyncFrameRange => {
            let range = ops::scene::sync_frame_range(graph, &snap.context)?;
            println!("{}-{}", range.start, range.end);
        }
        SceneOp::SelectShaders => {
            for shader in ops::scene::select_shaders(graph)? {
                println!("{shader}");
            }
        }
        SceneOp::LayoutGrid => {
            let report = ops::layout::layout_grid(graph)?;
            println!(
                "{} items on a {}x{} grid under {}",
                report.placed.len(),
                report.shape.cols,
                report.shape.rows,
                report.group
            );
            print_report(&report.duplicates);
        }
    }
    Ok(())
}

fn cmd_version_up(snapshot: &Path) -> ShelfResult<()> {
    let mut snap = SceneSnapshot::from_path(snapshot)?;
    let current = snap.context.require_scene_path()?.to_path_buf();
    let next = ops::scene::version_up(&mut snap.context)?;
    if current.is_file() {
        std::fs::copy(&current, &next).with_context(|| {
            format!("save '{}' as '{}'", current.display(), next.display())
        })?;
    } else {
        tracing::warn!(scene = %current.display(), "document not found on disk; only the snapshot was updated");
    }
    snap.save(snapshot)?;
    println!("{}", next.display());
    Ok(())
}

fn render_output(snapshot: &Path) -> ShelfResult<(SceneSnapshot, RenderOutput)> {
    let snap = SceneSnapshot::from_path(snapshot)?;
    let out = RenderOutput::from_graph(&snap.graph, &snap.context)?;
    Ok((snap, out))
}

fn frame_rate(cfg: &ShelfConfig, ctx: &HostContext) -> f64 {
    cfg.fps.unwrap_or_else(|| TimeUnit::fps_for(&ctx.time_unit))
}

fn encode(cfg: &ShelfConfig, job: &EncodeJob, no_reveal: bool) -> ShelfResult<()> {
    let output = cfg.ffmpeg_runner().run(job)?;
    println!("{}", output.display());
    if !no_reveal {
        best_effort(explorer::select_file(output));
    }
    Ok(())
}

fn best_effort(result: ShelfResult<()>) {
    if let Err(e) = result {
        tracing::warn!("could not open file browser: {e}");
    }
}

fn print_report(report: &BatchReport) {
    println!("done: {}", report.done.len());
    for s in &report.skipped {
        println!("skipped {}: {}", s.item, s.reason);
    }
}
