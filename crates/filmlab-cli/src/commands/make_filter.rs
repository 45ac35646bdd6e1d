//! Make-filter command: write a canonical filter file.

use crate::MakeFilterArgs;
use anyhow::{Context, Result, bail};
use filmlab_lut::{Lut, write_filter};
use tracing::trace;

fn exponents(gamma: &[f32]) -> Result<[f32; 3]> {
    let g = match *gamma {
        [g] => [g, g, g],
        [r, g, b] => [r, g, b],
        _ => bail!("--gamma takes one value or R,G,B, got {} values", gamma.len()),
    };
    if g.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        bail!("gamma exponents must be > 0");
    }
    Ok(g)
}

pub fn run(args: MakeFilterArgs, verbose: u8) -> Result<()> {
    trace!(output = %args.output.display(), "make_filter::run");

    if !filmlab_lut::flt::is_filter_file(&args.output) {
        bail!("Output must have a .flt or .fit extension: {}", args.output.display());
    }
    let lut = Lut::gamma(exponents(&args.gamma)?);
    write_filter(&args.output, &lut)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    if verbose > 0 {
        println!("Wrote {} (gamma {:?})", args.output.display(), args.gamma);
    }
    Ok(())
}
