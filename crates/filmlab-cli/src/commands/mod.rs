//! CLI command implementations

pub mod develop;
pub mod filters;
pub mod make_filter;
pub mod preview;

use crate::CatalogArgs;
use crate::config::DevelopConfig;
use anyhow::{Context, Result, bail};
use filmlab_io::{Format, ImageData};
use filmlab_lut::{Catalog, ParseOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load image from path
pub fn load_image(path: &Path) -> Result<ImageData> {
    filmlab_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Builds the catalog from command-line dirs, falling back to the config.
pub fn load_catalog(args: &CatalogArgs, config: &DevelopConfig) -> Catalog {
    let dirs: &[PathBuf] = if args.dirs.is_empty() {
        &config.filter_dirs
    } else {
        &args.dirs
    };
    let options = if args.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::lenient()
    };
    Catalog::load_with(dirs, options)
}

fn is_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Expands glob patterns to the PNG/JPEG files they match; plain paths are
/// passed through unchecked so a missing file is reported per image rather
/// than dropped.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !is_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }
        let matched: Vec<PathBuf> = glob::glob(input)
            .with_context(|| format!("Bad pattern: {}", input))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && Format::is_supported_path(p))
            .collect();
        debug!(pattern = %input, matched = matched.len(), "expanded");
        paths.extend(matched);
    }

    let mut seen = std::collections::HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));

    if paths.is_empty() {
        bail!("No files match: {}", inputs.join(" "));
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_inputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpg", "b.jpg", "c.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let pattern = format!("{}/*.jpg", dir.path().display());
        let plain = dir.path().join("c.png").display().to_string();

        let paths = expand_inputs(&[pattern.clone(), plain.clone(), pattern]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.png"]);

        // Wildcards only pick up images
        let everything = format!("{}/*", dir.path().display());
        assert_eq!(expand_inputs(&[everything]).unwrap().len(), 3);
    }

    #[test]
    fn test_expand_inputs_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.jpg", dir.path().display());
        assert!(expand_inputs(&[pattern]).is_err());
        // Plain paths are kept even when missing
        assert_eq!(expand_inputs(&["gone.jpg".into()]).unwrap().len(), 1);
    }

    #[test]
    fn test_load_catalog_prefers_cli_dirs() {
        let dir = tempfile::tempdir().unwrap();
        filmlab_lut::write_filter(dir.path().join("Warm.flt"), &filmlab_lut::Lut::gamma([0.9, 1.0, 1.1]))
            .unwrap();

        let config = DevelopConfig {
            filter_dirs: vec![dir.path().join("nothing")],
            ..Default::default()
        };
        let none = CatalogArgs { dirs: vec![], strict: false };
        assert!(!load_catalog(&none, &config).has_filters());

        let cli = CatalogArgs { dirs: vec![dir.path().to_path_buf()], strict: true };
        assert!(load_catalog(&cli, &config).get("Warm").is_some());
    }
}
