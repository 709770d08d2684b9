use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "plasma-fractal", version)]
struct Cli {
    /// Log debug output (fragment resolution, cache hits) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every catalog function and its parameters.
    Catalog(CatalogArgs),
    /// Write the generated fragment program for a selection.
    Assemble(AssembleArgs),
    /// Run the CPU pipeline for a number of frames and write the last one as PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct LibraryArgs {
    /// Extra catalog documents (`*.json`) merged over the built-in catalog.
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Shader fragments overlaid on the built-in ones.
    #[arg(long)]
    shader_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    #[command(flatten)]
    library: LibraryArgs,

    /// Print the catalog as JSON instead of a listing.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AssembleArgs {
    #[command(flatten)]
    library: LibraryArgs,

    /// Effect selection JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the fragment program.
    #[arg(long)]
    out: PathBuf,

    /// Output path for the uniform manifest JSON.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Output path for the vertex program.
    #[arg(long)]
    vertex: Option<PathBuf>,

    /// Wrap every fragment in FILE / END FILE comments.
    #[arg(long)]
    annotate: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    library: LibraryArgs,

    /// Effect selection JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 180)]
    height: u32,

    /// Number of frames to run; feedback needs more than one.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Catalog(args) => cmd_catalog(args),
        Command::Assemble(args) => cmd_assemble(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_library(args: &LibraryArgs) -> anyhow::Result<plasma_fractal::Library> {
    let mut lib = plasma_fractal::Library::builtin()?;
    if let Some(dir) = &args.catalog_dir {
        lib.load_dir(dir)
            .with_context(|| format!("load catalog dir '{}'", dir.display()))?;
    }
    Ok(lib)
}

fn load_sources(args: &LibraryArgs) -> anyhow::Result<plasma_fractal::MemorySources> {
    let mut sources = plasma_fractal::MemorySources::builtin();
    if let Some(dir) = &args.shader_dir {
        let overlay = plasma_fractal::MemorySources::from_dir(dir)
            .with_context(|| format!("load shader dir '{}'", dir.display()))?;
        sources.extend(overlay);
    }
    Ok(sources)
}

fn load_selection(path: Option<&Path>) -> anyhow::Result<plasma_fractal::EffectSelection> {
    match path {
        Some(p) => Ok(plasma_fractal::EffectSelection::from_path(p)?),
        None => Ok(plasma_fractal::EffectSelection::default()),
    }
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let lib = load_library(&args.library)?;
    let families = plasma_fractal::FunctionFamily::ALL;

    if args.json {
        let mut doc = serde_json::Map::new();
        for family in families {
            let specs: Vec<_> = lib.registry(family).iter().map(|f| f.as_ref()).collect();
            doc.insert(family.as_str().to_owned(), serde_json::to_value(specs)?);
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for family in families {
        let registry = lib.registry(family);
        println!(
            "{family} ({} functions, {} parameter slots)",
            registry.len(),
            registry.max_param_slots()
        );
        for f in registry.iter() {
            let extra = match (f.value_range(), f.fractal_variant()) {
                (Some((lo, hi)), _) => format!(" range [{lo}, {hi}]"),
                (_, Some(v)) => format!(" fractal {}", v.as_str()),
                _ => String::new(),
            };
            println!("  {}{extra}", f.name);
            for p in &f.params {
                println!(
                    "    {} : {} [{}, {}] default {}",
                    p.name,
                    p.kind.type_name(),
                    p.min,
                    p.max,
                    serde_json::Value::from(p.default)
                );
            }
        }
    }
    Ok(())
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let lib = load_library(&args.library)?;
    let sources = load_sources(&args.library)?;
    let selection = load_selection(args.config.as_deref())?;
    let resolved = selection.resolve(&lib)?;
    let opts = plasma_fractal::AssembleOptions {
        annotate_sources: args.annotate,
        ..plasma_fractal::AssembleOptions::default()
    };

    let program = plasma_fractal::assemble(&sources, &lib, &resolved, &opts)?;
    write_text(&args.out, program.fragment())?;
    eprintln!("wrote {}", args.out.display());

    if let Some(path) = &args.vertex {
        write_text(path, program.vertex())?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &args.manifest {
        write_text(path, &program.manifest.to_json_pretty()?)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let lib = load_library(&args.library)?;
    let sources = load_sources(&args.library)?;
    let selection = load_selection(args.config.as_deref())?;
    let canvas = plasma_fractal::Canvas::new(args.width, args.height)?;
    let fps = plasma_fractal::Fps::new(args.fps, 1)?;
    if args.frames == 0 {
        anyhow::bail!("--frames must be at least 1");
    }

    let mut timer = plasma_fractal::AnimationTimer::new(selection.speed)?;
    let session = plasma_fractal::EffectSession::new(lib, sources, selection)?;
    let effect = session.cpu_effect()?;
    let mut buffers = plasma_fractal::FrameBuffers::new(canvas, plasma_fractal::Rgba::BLACK);

    for _ in 0..args.frames {
        effect.render_frame(&mut buffers, timer.time());
        timer.step_frame(fps);
    }

    buffers.front().save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
