//! filmlab - batch film emulation CLI
//!
//! Develops photos through a blur/vignette/grain base stage and a set of
//! per-channel tone curves, writing one JPEG per image and filter.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::DevelopConfig;

#[derive(Parser)]
#[command(name = "filmlab")]
#[command(author, version, about = "Batch film emulation")]
#[command(long_about = "
Applies a film look to photos: a soft blur, a vignette and grain, then one
tone curve per selected filter. Filters are .flt/.fit text files.

Examples:
  filmlab filters -f Filters                      # List available filters
  filmlab develop 'shots/*.jpg' -o out            # Every filter, every shot
  filmlab develop a.jpg b.png -o out --filter Portra --filter Velvia
  filmlab develop a.jpg -o out --rotate -90 --width 1600 --include-original
  filmlab preview a.jpg -o a_preview.png --filter Portra --width 600
  filmlab make-filter Filters/Warm.flt --gamma 0.9,1.0,1.15
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Develop images with every selected filter
    #[command(visible_alias = "d")]
    Develop(DevelopArgs),

    /// Render one reduced-size preview
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// List the filter catalog
    #[command(visible_alias = "ls")]
    Filters(FiltersArgs),

    /// Write a filter file from per-channel gamma curves
    MakeFilter(MakeFilterArgs),
}

/// Where filters come from; shared by the commands that load a catalog.
#[derive(Args, Clone)]
struct CatalogArgs {
    /// Filter directory, searched in order (repeatable)
    #[arg(short = 'f', long = "filters")]
    dirs: Vec<PathBuf>,

    /// Only accept data lines with more than 100 integers
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct DevelopArgs {
    /// Input images or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Filter to apply (repeatable; default: all)
    #[arg(long = "filter")]
    select: Vec<String>,

    /// Also write the unfiltered image
    #[arg(long)]
    include_original: bool,

    /// Rotation in degrees, positive is counter-clockwise
    #[arg(short, long, allow_negative_numbers = true)]
    rotate: Option<i32>,

    /// Output width; height follows the aspect ratio
    #[arg(short, long)]
    width: Option<u32>,

    /// Grain seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    quality: Option<u8>,
}

#[derive(Args)]
struct PreviewArgs {
    /// Input image
    input: PathBuf,

    /// Output file (.png or .jpg)
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Filter to preview (default: unfiltered)
    #[arg(long = "filter")]
    select: Option<String>,

    /// Preview width
    #[arg(short, long)]
    width: Option<u32>,

    /// Rotation in degrees, positive is counter-clockwise
    #[arg(short, long, allow_negative_numbers = true)]
    rotate: Option<i32>,

    /// Grain seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct FiltersArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(Args)]
struct MakeFilterArgs {
    /// Output filter file (.flt or .fit)
    output: PathBuf,

    /// Gamma exponent, one value or R,G,B
    #[arg(short, long, value_delimiter = ',', default_value = "1.0")]
    gamma: Vec<f32>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = DevelopConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Develop(args) => commands::develop::run(args, &config, cli.verbose),
        Commands::Preview(args) => commands::preview::run(args, &config, cli.verbose),
        Commands::Filters(args) => commands::filters::run(args, &config, cli.verbose),
        Commands::MakeFilter(args) => commands::make_filter::run(args, cli.verbose),
    }
}
