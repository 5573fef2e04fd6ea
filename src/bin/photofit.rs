use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "photofit", version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available output specs.
    Presets(PresetsArgs),
    /// Crop, transform and export a photo as PNG.
    Fit(FitArgs),
}

#[derive(Parser, Debug)]
struct PresetsArgs {
    /// Spec catalogue JSON (defaults to the built-in presets).
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Print the catalogue as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Input photo (JPEG, PNG or WEBP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; the file is named after the spec.
    #[arg(long)]
    out_dir: PathBuf,

    /// Spec catalogue JSON (defaults to the built-in presets).
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Preset name (case-insensitive).
    #[arg(long, conflicts_with_all = ["width", "height", "bg"])]
    preset: Option<String>,

    /// Custom output width in pixels.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Custom output height in pixels.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Custom background color (#rgb, #rrggbb or #rrggbbaa).
    #[arg(long)]
    bg: Option<photofit::Rgba8>,

    /// Fill the spec background color behind the photo.
    #[arg(long)]
    background: bool,

    /// Crop in percent of the photo: x,y,width,height.
    #[arg(long, value_parser = parse_crop)]
    crop: Option<photofit::Crop>,

    /// Clockwise quarter turns (negative turns counter-clockwise).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    rotate: i32,

    /// Zoom factor, clamped to 0.5..=3.0.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Presets(args) => cmd_presets(args),
        Command::Fit(args) => cmd_fit(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_crop(s: &str) -> Result<photofit::Crop, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("crop values must be numbers: {e}"))?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok(photofit::Crop::percent(x, y, w, h)),
        _ => Err(format!("expected x,y,width,height, got {} values", parts.len())),
    }
}

fn read_catalogue(path: Option<&Path>) -> anyhow::Result<photofit::PresetCatalogue> {
    let Some(path) = path else {
        return Ok(photofit::PresetCatalogue::builtin());
    };
    let f = File::open(path).with_context(|| format!("open catalogue '{}'", path.display()))?;
    photofit::PresetCatalogue::from_json_reader(BufReader::new(f))
        .with_context(|| format!("load catalogue '{}'", path.display()))
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let catalogue = read_catalogue(args.catalogue.as_deref())?;
    if args.json {
        let json = serde_json::to_string_pretty(catalogue.specs()).context("serialize catalogue")?;
        println!("{json}");
        return Ok(());
    }
    for spec in catalogue.specs() {
        let bg = spec
            .background_color()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_owned());
        println!(
            "{:<22} {:>4}x{:<4} {:<5} {:<9} {}",
            spec.name(),
            spec.width(),
            spec.height(),
            spec.aspect_ratio(),
            bg,
            spec.description()
        );
    }
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let mut catalogue = read_catalogue(args.catalogue.as_deref())?;
    match (&args.preset, args.width, args.height) {
        (Some(name), _, _) => {
            catalogue.select(name)?;
        }
        (None, Some(w), Some(h)) => {
            catalogue.select_spec(photofit::OutputSpec::custom(w, h, args.bg)?);
        }
        _ => anyhow::bail!("pass --preset NAME or --width W --height H"),
    }

    let bytes =
        std::fs::read(&args.in_path).with_context(|| format!("read '{}'", args.in_path.display()))?;

    let mut session = photofit::EditorSession::new(photofit::EditorConfig::from_env());
    session.load_image(&bytes, Instant::now())?;
    session.sync_spec(&catalogue);
    if args.background {
        session.set_use_background(true);
    }
    if let Some(crop) = &args.crop {
        session.set_crop(crop)?;
    }

    let transform = session.transform_mut();
    transform.adjust_scale(args.scale - 1.0);
    let step = if args.rotate < 0 {
        photofit::RotationStep::CounterClockwise
    } else {
        photofit::RotationStep::Clockwise
    };
    for _ in 0..args.rotate.unsigned_abs() % 4 {
        transform.rotate(step);
    }

    let mut sink = photofit::DirectorySink::new(&args.out_dir);
    session.export_to(&mut sink)?;
    for path in sink.written() {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
