//! Filters command: list the catalog.

use crate::FiltersArgs;
use crate::config::DevelopConfig;
use anyhow::Result;
use filmlab_lut::IDENTITY_NAME;
use tracing::{trace, warn};

pub fn run(args: FiltersArgs, config: &DevelopConfig, verbose: u8) -> Result<()> {
    trace!("filters::run");
    let catalog = super::load_catalog(&args.catalog, config);

    for name in catalog.names() {
        if name == IDENTITY_NAME {
            println!("{} (built-in)", name);
        } else if verbose > 0 {
            let source = catalog
                .source(name)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("{}  {}", name, source);
        } else {
            println!("{}", name);
        }
    }

    if !catalog.has_filters() {
        warn!("no filter files found");
        eprintln!("No filter files found");
    } else {
        println!("{} filters", catalog.filter_count());
    }
    Ok(())
}
