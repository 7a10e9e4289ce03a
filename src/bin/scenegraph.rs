use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scenegraph", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and validate a scene declaration, then print its warnings.
    Check(CheckArgs),
    /// Animate a scene for a number of fixed-step frames through an in-memory renderer.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene declaration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Graph options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scene declaration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Graph options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Number of frames to render.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Frames per second of the fixed-step clock.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Advance material cursors every K frames (0 disables cycling).
    #[arg(long, default_value_t = 0)]
    cycle_every: u64,

    /// Heading rule for linear animations; overrides the options file.
    #[arg(long, value_enum)]
    heading: Option<HeadingChoice>,

    /// Print one JSON object per frame instead of a text summary.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeadingChoice {
    Accumulated,
    Absolute,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<scenegraph::GraphOpts> {
    let Some(path) = path else {
        return Ok(scenegraph::GraphOpts::default());
    };
    let s = fs::read_to_string(path)
        .with_context(|| format!("open graph options '{}'", path.display()))?;
    scenegraph::GraphOpts::from_json_str(&s)
        .with_context(|| format!("parse graph options '{}'", path.display()))
}

fn read_decl(path: &Path) -> anyhow::Result<scenegraph::Declaration> {
    scenegraph::Declaration::from_path(path)
        .with_context(|| format!("load scene declaration '{}'", path.display()))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.opts.as_deref())?;
    let decl = read_decl(&args.in_path)?;
    let warnings = scenegraph::SceneGraph::validate(&decl, &opts)
        .with_context(|| format!("validate '{}'", args.in_path.display()))?;

    for w in &warnings {
        println!("warning: {w}");
    }
    println!(
        "ok: {} ({} warning{})",
        args.in_path.display(),
        warnings.len(),
        if warnings.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut opts = read_opts(args.opts.as_deref())?;
    if let Some(h) = args.heading {
        opts.heading_mode = match h {
            HeadingChoice::Accumulated => scenegraph::HeadingMode::Accumulated,
            HeadingChoice::Absolute => scenegraph::HeadingMode::Absolute,
        };
    }
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {}", args.fps);
    }

    let decl = read_decl(&args.in_path)?;
    let out = scenegraph::SceneGraph::build(&decl, &opts)
        .with_context(|| format!("build '{}'", args.in_path.display()))?;
    for w in &out.warnings {
        eprintln!("warning: {w}");
    }
    let mut graph = out.graph;

    let mut clock = scenegraph::FrameClock::from_fps(args.fps);
    let mut renderer = scenegraph::RecordingRenderer::new();
    let mut total_draws = 0usize;
    for frame in 0..args.frames {
        if args.cycle_every > 0 && frame > 0 && frame % args.cycle_every == 0 {
            graph.tick_materials();
        }
        renderer.clear();
        let dt = clock.tick();
        let stats = graph
            .display(&mut renderer, dt)
            .with_context(|| format!("display frame {frame}"))?;
        total_draws += stats.primitives_drawn;

        if args.json {
            let line = serde_json::json!({
                "frame": frame,
                "dt": dt,
                "stats": stats,
                "calls": renderer.calls(),
            });
            println!("{line}");
        } else {
            println!(
                "frame {frame}: {} nodes, {} draws, depth {}",
                stats.nodes_visited, stats.primitives_drawn, stats.max_depth
            );
        }
    }

    eprintln!(
        "rendered {} frame(s), {} draw(s) total",
        args.frames, total_draws
    );
    Ok(())
}
