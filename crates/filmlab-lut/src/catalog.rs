//! Named collection of filters loaded from directories.
//!
//! Directories are scanned in the order given. Within a directory files are
//! visited in filename order so repeated loads yield the same catalog. The
//! filter name is the file stem; when two files share a stem the first one
//! loaded wins. Unreadable or unparseable files are logged and skipped.
//!
//! Every catalog carries a synthetic [`IDENTITY_NAME`] entry mapping to the
//! identity table, so a catalog is never empty.

use crate::flt::{self, ParseOptions};
use crate::{Lut, LutError, LutResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the synthetic pass-through entry.
pub const IDENTITY_NAME: &str = "Original";

/// Filters keyed by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    filters: BTreeMap<String, Lut>,
    sources: BTreeMap<String, PathBuf>,
}

impl Catalog {
    /// Creates a catalog holding only the identity entry.
    pub fn identity_only() -> Self {
        let mut filters = BTreeMap::new();
        filters.insert(IDENTITY_NAME.to_string(), Lut::identity());
        Self {
            filters,
            sources: BTreeMap::new(),
        }
    }

    /// Loads filters from `dirs` with lenient parsing.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use filmlab_lut::Catalog;
    ///
    /// let catalog = Catalog::load(&["Filters", "/usr/share/filmlab/filters"]);
    /// for name in catalog.names() {
    ///     println!("{}", name);
    /// }
    /// ```
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Self {
        Self::load_with(dirs, ParseOptions::default())
    }

    /// Loads filters from `dirs` using the given parse options.
    ///
    /// Missing directories are skipped.
    pub fn load_with<P: AsRef<Path>>(dirs: &[P], options: ParseOptions) -> Self {
        let mut catalog = Self::identity_only();
        for dir in dirs {
            catalog.scan_dir(dir.as_ref(), options);
        }
        info!(
            filters = catalog.filter_count(),
            dirs = dirs.len(),
            "filter catalog loaded"
        );
        catalog
    }

    fn scan_dir(&mut self, dir: &Path, options: ParseOptions) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping filter directory");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && flt::is_filter_file(path))
            .collect();
        paths.sort();

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "filter name is not valid UTF-8");
                continue;
            };
            if name == IDENTITY_NAME {
                warn!(path = %path.display(), "filter name is reserved, skipping");
                continue;
            }
            if let Some(existing) = self.sources.get(name) {
                debug!(
                    path = %path.display(),
                    kept = %existing.display(),
                    "duplicate filter name, keeping first"
                );
                continue;
            }

            match flt::read_filter(&path, options) {
                Ok(lut) => {
                    debug!(name, path = %path.display(), "loaded filter");
                    self.filters.insert(name.to_string(), lut);
                    self.sources.insert(name.to_string(), path.clone());
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping filter"),
            }
        }
    }

    /// Inserts a filter unless the name is already taken.
    ///
    /// Returns false if an entry with that name exists.
    pub fn insert(&mut self, name: impl Into<String>, lut: Lut) -> bool {
        let name = name.into();
        if self.filters.contains_key(&name) {
            return false;
        }
        self.filters.insert(name, lut);
        true
    }

    /// Looks up a filter by name.
    pub fn get(&self, name: &str) -> Option<&Lut> {
        self.filters.get(name)
    }

    /// Returns the file a filter was loaded from, if any.
    pub fn source(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    /// All entry names in sorted order, identity included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Iterates over `(name, lut)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Lut)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, identity included.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Always false: the identity entry is always present.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of entries excluding the identity.
    pub fn filter_count(&self) -> usize {
        self.filters.len() - usize::from(self.filters.contains_key(IDENTITY_NAME))
    }

    /// True if at least one real filter is available.
    pub fn has_filters(&self) -> bool {
        self.filter_count() > 0
    }

    /// Resolves a selection of names in the order given.
    ///
    /// An empty selection selects every entry except the identity.
    pub fn select(&self, names: &[String]) -> LutResult<Vec<(&str, &Lut)>> {
        if names.is_empty() {
            return Ok(self.file_filters().collect());
        }
        names
            .iter()
            .map(|name| {
                self.filters
                    .get_key_value(name.as_str())
                    .map(|(k, v)| (k.as_str(), v))
                    .ok_or_else(|| LutError::UnknownFilter { name: name.clone() })
            })
            .collect()
    }

    /// Iterates over every entry except the identity.
    pub fn file_filters(&self) -> impl Iterator<Item = (&str, &Lut)> {
        self.iter().filter(|(name, _)| *name != IDENTITY_NAME)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::identity_only()
    }
}
