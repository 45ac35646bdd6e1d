//! Preview command: one reduced-size render through the develop path.

use crate::PreviewArgs;
use crate::config::DevelopConfig;
use anyhow::{Context, Result};
use filmlab_io::Format;
use filmlab_lut::IDENTITY_NAME;
use filmlab_ops::{encode_jpeg, render_preview};
use std::fs;
use tracing::trace;

pub fn run(args: PreviewArgs, config: &DevelopConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "preview::run");

    let catalog = super::load_catalog(&args.catalog, config);
    let name = args.select.as_deref().unwrap_or(IDENTITY_NAME);
    let lut = catalog
        .get(name)
        .with_context(|| format!("Unknown filter: {}", name))?;

    let mut params = config.params.clone();
    if let Some(deg) = args.rotate {
        params.rotation_degrees = deg;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    let width = args.width.unwrap_or(config.preview_width);

    let raw = super::load_image(&args.input)?;
    let image = render_preview(&raw, &params, width, lut)?;

    match Format::from_extension(&args.output) {
        Format::Png => filmlab_io::png::write(&args.output, &image)?,
        _ => {
            let bytes = encode_jpeg(&image, config.jpeg_quality)?;
            fs::write(&args.output, bytes)
                .with_context(|| format!("Failed to save: {}", args.output.display()))?;
        }
    }

    if verbose > 0 {
        println!(
            "Preview {} [{}] {}x{} -> {}",
            args.input.display(),
            name,
            image.width,
            image.height,
            args.output.display()
        );
    }
    Ok(())
}
