//! Develop command: every input times every selected filter.

use crate::DevelopArgs;
use crate::config::{DevelopConfig, check_quality};
use anyhow::{Result, bail};
use filmlab_ops::{Developer, DirectorySink, TransformParams};
use tracing::{info, trace};

fn params(args: &DevelopArgs, config: &DevelopConfig) -> TransformParams {
    let mut params = config.params.clone();
    if let Some(deg) = args.rotate {
        params.rotation_degrees = deg;
    }
    if args.width.is_some() {
        params.target_width = args.width;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    params
}

pub fn run(args: DevelopArgs, config: &DevelopConfig, verbose: u8) -> Result<()> {
    trace!(inputs = args.inputs.len(), output = %args.output.display(), "develop::run");

    let inputs = super::expand_inputs(&args.inputs)?;
    let catalog = super::load_catalog(&args.catalog, config);
    if !catalog.has_filters() {
        bail!("No filter files found; add .flt/.fit files or pass -f <DIR>");
    }

    let params = params(&args, config);
    params.validate()?;
    let quality = check_quality(args.quality.unwrap_or(config.jpeg_quality))?;

    let mut developer = Developer::new(&catalog, &args.select)?
        .with_params(params)
        .with_quality(quality);
    if args.include_original || config.include_original {
        developer = developer.with_original(&catalog);
    }

    if verbose > 0 {
        println!(
            "Developing {} images with {} filters: {}",
            inputs.len(),
            developer.filter_names().len(),
            developer.filter_names().join(", ")
        );
    }
    info!(images = inputs.len(), output = %args.output.display(), "develop");

    let sink = DirectorySink::new(&args.output)?;
    let report = developer.develop_paths(&inputs, &sink);

    for failure in &report.failures {
        match &failure.filter {
            Some(filter) => eprintln!("Error: {} [{}]: {}", failure.source, filter, failure.message),
            None => eprintln!("Error: {}: {}", failure.source, failure.message),
        }
    }
    if verbose > 1 {
        for name in &report.outputs {
            println!("  {}", sink.dir().join(name).display());
        }
    }
    println!(
        "Developed: {} written, {} failed -> {}",
        report.succeeded(),
        report.failed(),
        args.output.display()
    );

    if report.failed() > 0 {
        bail!("{} units failed", report.failed());
    }
    Ok(())
}
