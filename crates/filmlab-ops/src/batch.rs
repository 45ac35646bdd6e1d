//! Batch development: many images times many filters.
//!
//! Each image is decoded and run through [`prepare_base`] once; the base
//! is then remapped and encoded for every selected filter in parallel.
//! Failures are local: a bad image fails only that image, a failing filter
//! only that image-filter pair. Everything is collected into a
//! [`BatchReport`] instead of aborting.
//!
//! # Example
//!
//! ```rust,ignore
//! use filmlab_lut::Catalog;
//! use filmlab_ops::batch::{Developer, DirectorySink};
//!
//! let catalog = Catalog::load(&["Filters"]);
//! let developer = Developer::new(&catalog, &[])?;
//! let sink = DirectorySink::new("out")?;
//! let report = developer.develop_paths(&paths, &sink);
//! println!("{} written, {} failed", report.succeeded(), report.failed());
//! ```

use crate::pipeline::{DEFAULT_JPEG_QUALITY, encode_jpeg, output_name, prepare_base};
use crate::{OpsError, OpsResult, TransformParams, apply_lut};
use filmlab_io::ImageData;
use filmlab_lut::{Catalog, IDENTITY_NAME, Lut};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Destination for encoded artifacts.
pub trait ArtifactSink: Send + Sync {
    /// Stores one artifact under `name`.
    fn put(&self, name: &str, bytes: &[u8]) -> OpsResult<()>;
}

/// Writes artifacts as files in a directory.
///
/// Files left by earlier runs are overwritten, but a name may only be
/// written once per sink: a second `put` of the same name fails with
/// [`OpsError::DuplicateOutput`] (two inputs sharing a stem).
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Mutex<HashSet<String>>,
}

impl DirectorySink {
    /// Creates the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> OpsResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(filmlab_io::IoError::from)?;
        Ok(Self {
            dir,
            written: Mutex::new(HashSet::new()),
        })
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn put(&self, name: &str, bytes: &[u8]) -> OpsResult<()> {
        let fresh = self
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string());
        if !fresh {
            return Err(OpsError::DuplicateOutput(name.to_string()));
        }
        fs::write(self.dir.join(name), bytes).map_err(filmlab_io::IoError::from)?;
        Ok(())
    }
}

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Returns a copy of one artifact.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().get(name).cloned()
    }

    /// Consumes the sink, returning all artifacts.
    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactSink for MemorySink {
    fn put(&self, name: &str, bytes: &[u8]) -> OpsResult<()> {
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(OpsError::DuplicateOutput(name.to_string()));
        }
        entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One failed unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Source image (path or caller-supplied name).
    pub source: String,
    /// Filter that failed, or `None` if the whole image failed.
    pub filter: Option<String>,
    /// Error message.
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Names of artifacts written, sorted.
    pub outputs: Vec<String>,
    /// Per-image and per-filter failures.
    pub failures: Vec<Failure>,
    /// True if the run was cancelled before all work was scheduled.
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of artifacts written.
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    /// Number of failed units.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True if nothing failed and the run was not cancelled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    fn merge(&mut self, other: BatchReport) {
        self.outputs.extend(other.outputs);
        self.failures.extend(other.failures);
        self.cancelled |= other.cancelled;
    }

    fn finish(mut self) -> Self {
        self.outputs.sort();
        self.failures
            .sort_by(|a, b| (&a.source, &a.filter).cmp(&(&b.source, &b.filter)));
        self
    }
}

/// Develops images against a fixed filter selection.
pub struct Developer<'a> {
    filters: Vec<(&'a str, &'a Lut)>,
    params: TransformParams,
    quality: u8,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Developer<'a> {
    /// Selects filters from `catalog` by name; an empty selection takes all
    /// file filters.
    ///
    /// Fails with [`OpsError::NoFilters`] if nothing is selected and with
    /// [`OpsError::Lut`] for unknown names.
    pub fn new(catalog: &'a Catalog, selection: &[String]) -> OpsResult<Self> {
        let filters = catalog.select(selection)?;
        if filters.is_empty() {
            return Err(OpsError::NoFilters);
        }
        Ok(Self {
            filters,
            params: TransformParams::default(),
            quality: DEFAULT_JPEG_QUALITY,
            cancel: None,
        })
    }

    /// Also emits the unfiltered image under the identity name.
    pub fn with_original(mut self, catalog: &'a Catalog) -> Self {
        if !self.filters.iter().any(|(name, _)| *name == IDENTITY_NAME) {
            if let Some(lut) = catalog.get(IDENTITY_NAME) {
                self.filters.push((IDENTITY_NAME, lut));
            }
        }
        self
    }

    /// Sets the base-stage parameters.
    pub fn with_params(mut self, params: TransformParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Installs a cancellation flag, checked before each image and filter.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Names of the selected filters in order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|(name, _)| *name).collect()
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Parameters for one image: a fixed seed is mixed with the stem so
    /// every image of a seeded run gets its own grain.
    fn image_params(&self, stem: &str) -> TransformParams {
        TransformParams {
            seed: self.params.seed.map(|seed| mix_seed(seed, stem)),
            ..self.params.clone()
        }
    }

    /// Reads, develops and stores every path.
    pub fn develop_paths(&self, paths: &[PathBuf], sink: &dyn ArtifactSink) -> BatchReport {
        info!(images = paths.len(), filters = self.filters.len(), "developing batch");
        let report = paths
            .par_iter()
            .map(|path| {
                if self.cancelled() {
                    return BatchReport { cancelled: true, ..Default::default() };
                }
                let source = path.display().to_string();
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.clone());
                match filmlab_io::read(path) {
                    Ok(raw) => self.develop_image(&source, &stem, &raw, sink),
                    Err(e) => image_failure(source, &e.into()),
                }
            })
            .reduce(BatchReport::default, |mut acc, r| {
                acc.merge(r);
                acc
            })
            .finish();

        info!(
            written = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "batch finished"
        );
        report
    }

    /// Develops one decoded image; artifacts are named after `stem`.
    pub fn develop_image(
        &self,
        source: &str,
        stem: &str,
        raw: &ImageData,
        sink: &dyn ArtifactSink,
    ) -> BatchReport {
        let base = match prepare_base(raw, &self.image_params(stem)) {
            Ok(base) => base,
            Err(e) => return image_failure(source.to_string(), &e),
        };
        debug!(source, width = base.width, height = base.height, "base ready");

        self.filters
            .par_iter()
            .map(|&(filter, lut)| {
                if self.cancelled() {
                    return BatchReport { cancelled: true, ..Default::default() };
                }
                let name = output_name(stem, filter);
                let result = apply_lut(&base, lut)
                    .and_then(|img| encode_jpeg(&img, self.quality))
                    .and_then(|bytes| sink.put(&name, &bytes));
                match result {
                    Ok(()) => BatchReport { outputs: vec![name], ..Default::default() },
                    Err(e) => {
                        warn!(source, filter, error = %e, "filter failed");
                        BatchReport {
                            failures: vec![Failure {
                                source: source.to_string(),
                                filter: Some(filter.to_string()),
                                message: e.to_string(),
                            }],
                            ..Default::default()
                        }
                    }
                }
            })
            .reduce(BatchReport::default, |mut acc, r| {
                acc.merge(r);
                acc
            })
            .finish()
    }
}

/// FNV-1a over `key`, folded into `seed`.
fn mix_seed(seed: u64, key: &str) -> u64 {
    let hash = key.bytes().fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    });
    seed ^ hash
}

fn image_failure(source: String, error: &OpsError) -> BatchReport {
    warn!(source = %source, error = %error, "image failed");
    BatchReport {
        failures: vec![Failure {
            source,
            filter: None,
            message: error.to_string(),
        }],
        ..Default::default()
    }
}
