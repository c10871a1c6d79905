#![deny(unsafe_code)]
//! CLI binary for the poster generator.
//!
//! Subcommands:
//! - `render`: compose one poster from a seed and parameters, write PNG
//! - `list`: print variants, style presets and palette modes

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use poster_core::palette::PaletteMode;
use poster_core::preset::{style_names, PRESETS};
use poster_core::{compose, RenderSpec, Srgb, Wobble};
use poster_raster::raster::RasterLayout;
use poster_raster::{ExportOptions, PosterVariant};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poster", about = "Seeded generative poster CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a poster and write it as PNG.
    Render(RenderArgs),
    /// List variants, style presets and palette modes.
    List,
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Variant name (classic, styled, interactive, depth).
    #[arg(short, long, default_value = "interactive")]
    variant: String,

    /// Render spec JSON file; flags below override its fields.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of blob layers.
    #[arg(short, long)]
    layers: Option<usize>,

    /// Fixed wobble magnitude.
    #[arg(short, long, conflicts_with = "wobble_range")]
    wobble: Option<f64>,

    /// Wobble range drawn once per layer, as LO,HI.
    #[arg(long, value_parser = parse_pair)]
    wobble_range: Option<(f64, f64)>,

    /// Layer opacity range, as LO,HI.
    #[arg(long, value_parser = parse_pair)]
    alpha_range: Option<(f64, f64)>,

    /// Palette mode (pastel, vivid, mono, dark, grey, random).
    #[arg(short, long)]
    palette: Option<String>,

    /// Style preset (Minimal, Vivid, NoiseTouch) or Custom.
    #[arg(long)]
    style: Option<String>,

    /// Background color as hex (#rrggbb) or a color keyword.
    #[arg(short, long)]
    background: Option<String>,

    /// Shadow copies per layer (depth variant).
    #[arg(long)]
    shadows: Option<usize>,

    /// Export resolution in dots per inch.
    #[arg(long, default_value_t = 300.0)]
    dpi: f64,

    /// Frame padding around the poster, in inches.
    #[arg(long, default_value_t = 0.1)]
    pad: f64,

    /// Output file path. Defaults to the variant's naming convention.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compositor setting overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
}

/// Parses `LO,HI` into a pair. Order is kept as written.
fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {e}", v.trim()))
    };
    Ok((parse(lo)?, parse(hi)?))
}

fn load_spec(path: &Path) -> Result<RenderSpec, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    RenderSpec::from_json(&text)
        .map_err(|e| CliError::Input(format!("invalid spec file {}: {e}", path.display())))
}

/// Builds the render spec: spec file (if any), then command-line overrides.
fn build_spec(args: &RenderArgs) -> Result<RenderSpec, CliError> {
    let mut spec = match &args.spec {
        Some(path) => load_spec(path)?,
        None => RenderSpec::default(),
    };
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
    if let Some(layers) = args.layers {
        spec.layer_count = Some(layers);
    }
    if let Some(w) = args.wobble {
        spec.wobble = Some(Wobble::Fixed(w));
    }
    if let Some((lo, hi)) = args.wobble_range {
        spec.wobble = Some(Wobble::Range(lo, hi));
    }
    if let Some(alpha) = args.alpha_range {
        spec.alpha_range = Some(alpha);
    }
    if let Some(mode) = &args.palette {
        spec.palette_mode = Some(PaletteMode::from_name(mode));
    }
    if let Some(style) = &args.style {
        spec.style = Some(style.clone());
    }
    if let Some(bg) = &args.background {
        spec.background = Some(Srgb::parse(bg).map_err(|e| CliError::Input(e.to_string()))?);
    }
    if let Some(shadows) = args.shadows {
        spec.shadow_count = Some(shadows);
    }
    spec.validate().map_err(|e| CliError::Input(e.to_string()))?;
    Ok(spec)
}

fn render(args: RenderArgs, json: bool) -> Result<(), CliError> {
    let variant = PosterVariant::from_name(&args.variant)?;
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let settings = variant.settings_from_json(&params)?;
    let spec = build_spec(&args)?;
    let opts = ExportOptions {
        dpi: args.dpi,
        pad_inches: args.pad,
        ..ExportOptions::default()
    };
    let layout = RasterLayout::for_size(settings.width_in, settings.height_in, &opts)
        .map_err(|e| CliError::Input(e.to_string()))?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(variant.export_filename(&spec)));

    let canvas = compose(&spec, &settings)?;
    poster_raster::snapshot::write_png(&canvas, &opts, &output)?;
    tracing::info!(
        variant = variant.name(),
        seed = spec.seed,
        width = layout.width,
        height = layout.height,
        output = %output.display(),
        "poster written"
    );

    let resolved = spec.resolve(&settings);
    if json {
        let info = serde_json::json!({
            "variant": variant.name(),
            "seed": spec.seed,
            "style": resolved.style.name(),
            "palette_mode": resolved.palette_mode,
            "layers": canvas.layer_count(),
            "wobble": resolved.wobble,
            "width": layout.width,
            "height": layout.height,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {variant} ({} layers, {}, seed {}) {}x{} -> {}",
            canvas.layer_count(),
            resolved.palette_mode,
            spec.seed,
            layout.width,
            layout.height,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let variants = PosterVariant::list_variants();
            let styles = style_names();
            let modes: Vec<&str> = PaletteMode::ALL.iter().map(|m| m.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "variants": variants,
                    "styles": styles,
                    "presets": PRESETS,
                    "palette_modes": modes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Variants:");
                for name in variants {
                    println!("  {name}");
                }
                println!("Styles:");
                for p in PRESETS {
                    println!(
                        "  {:<11} layers {:>2}, wobble {:?}, alpha {:?}, {}",
                        p.name, p.layer_count, p.wobble_range, p.alpha_range, p.palette_mode
                    );
                }
                println!("  Custom");
                println!("Palette modes:");
                println!("  {}", modes.join(", "));
            }
        }
        Command::Render(args) => render(args, cli.json)?,
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
