use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use wingbeat::encode::write_image_atomic;
use wingbeat::{
    AlphaPolicy, Animation, Cutout, FrameIndex, Interpolation, OutputFormat, Preset, Recipe,
    RenderThreading,
};

#[derive(Parser, Debug)]
#[command(name = "wingbeat", version, about = "Looping wing-flap animations from still artwork")]
struct Cli {
    /// Log per-frame detail.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full loop as an animated GIF or WebP.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Remove a light background from a still image.
    Cutout(CutoutArgs),
    /// List the built-in presets.
    Presets,
}

#[derive(Args, Debug)]
struct RecipeArgs {
    /// Recipe JSON file.
    #[arg(long, conflicts_with = "preset")]
    recipe: Option<PathBuf>,

    /// Built-in preset name (see `wingbeat presets`).
    #[arg(long)]
    preset: Option<String>,

    /// Frames per loop.
    #[arg(long)]
    frames: Option<u32>,

    /// Per-frame delay in milliseconds.
    #[arg(long)]
    duration_ms: Option<u32>,

    /// Peak displacement in pixels.
    #[arg(long)]
    amplitude: Option<f64>,

    /// Interpolation order: 0, 1, 3 or 5.
    #[arg(long)]
    interpolation: Option<u8>,

    /// Container loop count, 0 = forever.
    #[arg(long)]
    loop_count: Option<u16>,

    /// Output container (gif or webp); defaults to the output extension.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Background as `#RRGGBB`, `#RRGGBBAA` or `none`.
    #[arg(long, value_parser = parse_background)]
    background: Option<Background>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input PNG/WebP image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF/WebP path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    recipe: RecipeArgs,

    /// Render frames on a worker pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input PNG/WebP image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    recipe: RecipeArgs,
}

#[derive(Args, Debug)]
struct CutoutArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG/WebP path.
    #[arg(long)]
    out: PathBuf,

    /// Channel mean above which a pixel becomes transparent.
    #[arg(long, default_value_t = 240.0)]
    threshold: f32,

    /// Factor applied to bright opaque pixels first.
    #[arg(long, default_value_t = 0.65)]
    darken: f32,
}

#[derive(Clone, Copy, Debug)]
struct Background(Option<[u8; 4]>);

fn parse_background(s: &str) -> Result<Background, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(Background(None));
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected #RRGGBB, #RRGGBBAA or none, got '{s}'"));
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Background(Some([byte(0)?, byte(2)?, byte(4)?, alpha])))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Cutout(args) => cmd_cutout(args),
        Command::Presets => cmd_presets(),
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn build_recipe(args: &RecipeArgs) -> anyhow::Result<Recipe> {
    let mut recipe = match (&args.recipe, &args.preset) {
        (Some(path), _) => wingbeat::load_recipe(path)?,
        (None, Some(name)) => Preset::from_name(name)?.recipe(),
        (None, None) => Recipe::default(),
    };

    if let Some(n) = args.frames {
        recipe.num_frames = n;
    }
    if let Some(ms) = args.duration_ms {
        recipe.duration_ms = ms;
    }
    if let Some(n) = args.loop_count {
        recipe.loop_count = n;
    }
    if let Some(f) = args.format {
        recipe.format = Some(f);
    }
    if let Some(Background(bg)) = args.background {
        recipe.background = bg;
    }
    if args.amplitude.is_some() || args.interpolation.is_some() {
        let flap = recipe
            .flap
            .as_mut()
            .context("--amplitude/--interpolation need a recipe with a wing flap")?;
        if let Some(a) = args.amplitude {
            flap.amplitude_px = a;
        }
        if let Some(order) = args.interpolation {
            flap.interpolation = Interpolation::from_order(order)
                .with_context(|| format!("--interpolation must be 0, 1, 3 or 5 (got {order})"))?;
        }
    }

    recipe.validate()?;
    Ok(recipe)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let recipe = build_recipe(&args.recipe)?;
    let threading = RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let stats = wingbeat::render_to_file(&args.in_path, &args.out, &recipe, &threading)?;

    eprintln!(
        "wrote {} ({} frames, {}x{}, {} bytes)",
        args.out.display(),
        stats.frames,
        stats.width,
        stats.height,
        stats.bytes_written
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let recipe = build_recipe(&args.recipe)?;
    let policy = if recipe.require_alpha {
        AlphaPolicy::Require
    } else {
        AlphaPolicy::Promote
    };
    let source = wingbeat::load_image(&args.in_path, policy)?;
    let anim = Animation::prepare(&source, &recipe)?;
    let frame = anim.render_frame(FrameIndex(args.frame))?;

    let data = match recipe.background {
        Some(bg) => frame.flattened(bg)?,
        None => frame.to_straight(),
    };
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .context("frame buffer does not match its dimensions")?;
    write_image_atomic(&args.out, &img, image::ImageFormat::Png)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_cutout(args: CutoutArgs) -> anyhow::Result<()> {
    let cutout = Cutout {
        threshold: args.threshold,
        darken: args.darken,
        ..Cutout::default()
    };
    cutout.validate()?;

    let mut img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    cutout.apply_rgba(&mut img);

    let format = image::ImageFormat::from_path(&args.out)
        .with_context(|| format!("unsupported image extension '{}'", args.out.display()))?;
    write_image_atomic(&args.out, &img, format)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in Preset::ALL {
        println!("{:<16} {}", preset.name(), preset.description());
    }
    Ok(())
}
