//! Dataset Cache Module
//! Session-scoped memoization of the loaded dataset, keyed by source path.

use crate::data::dataset::Dataset;
use crate::data::loader::{self, LoadError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Holds at most one loaded dataset for the lifetime of a session.
///
/// Repeated filter operations reuse the cached dataset instead of
/// re-reading the source. `reload` and `invalidate` are the only ways
/// the entry changes.
#[derive(Debug, Default)]
pub struct DatasetCache {
    dataset: Option<Arc<Dataset>>,
    source: Option<PathBuf>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cached(&path) {
            debug!(path = %path.as_ref().display(), "dataset cache hit");
            return Ok(dataset);
        }
        self.reload(path)
    }

    /// Load `path` unconditionally and replace the cached entry.
    ///
    /// A failed load leaves the previous entry in place.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<Arc<Dataset>, LoadError> {
        let key = source_key(path.as_ref());
        let dataset = Arc::new(loader::load(&key)?);
        self.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Store a dataset loaded elsewhere (e.g. on a background thread).
    pub fn insert(&mut self, path: impl AsRef<Path>, dataset: Arc<Dataset>) {
        let key = source_key(path.as_ref());
        info!(path = %key.display(), rows = dataset.len(), "dataset cached");
        self.source = Some(key);
        self.dataset = Some(dataset);
    }

    /// The cached dataset if it was loaded from `path`.
    pub fn cached(&self, path: impl AsRef<Path>) -> Option<Arc<Dataset>> {
        let key = source_key(path.as_ref());
        match (&self.source, &self.dataset) {
            (Some(source), Some(dataset)) if *source == key => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    pub fn invalidate(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(path = %source.display(), "dataset cache invalidated");
        }
        self.dataset = None;
    }

    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Source identity: the canonical path when it resolves, otherwise the path as given.
fn source_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "InvoiceNo,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n\
        536365,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850,United Kingdom\n";

    fn write_source(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn repeated_access_reuses_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "retail.csv", SAMPLE);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        // Changing the source proves the second call never re-reads it.
        let more = format!(
            "{SAMPLE}536366,HAND WARMER UNION JACK,6,12/1/2010 8:28,1.85,17850,United Kingdom\n"
        );
        write_source(&dir, "retail.csv", &more);
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn reload_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "retail.csv", SAMPLE);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        let more = format!(
            "{SAMPLE}536366,HAND WARMER UNION JACK,6,12/1/2010 8:28,1.85,17850,United Kingdom\n"
        );
        write_source(&dir, "retail.csv", &more);
        let second = cache.reload(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert!(Arc::ptr_eq(&second, &cache.current().unwrap()));
    }

    #[test]
    fn failed_reload_keeps_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "retail.csv", SAMPLE);
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();

        let result = cache.reload(dir.path().join("missing.csv"));

        assert!(matches!(result, Err(LoadError::SourceNotFound { .. })));
        assert!(Arc::ptr_eq(&first, &cache.current().unwrap()));
    }

    #[test]
    fn different_source_misses() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_source(&dir, "a.csv", SAMPLE);
        let b = write_source(&dir, "b.csv", SAMPLE);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&a).unwrap();
        assert!(cache.cached(&b).is_none());
        let second = cache.get_or_load(&b).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source(), Some(std::fs::canonicalize(&b).unwrap().as_path()));
    }

    #[test]
    fn invalidate_clears_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, "retail.csv", SAMPLE);
        let mut cache = DatasetCache::new();
        cache.get_or_load(&path).unwrap();

        cache.invalidate();

        assert!(cache.current().is_none());
        assert!(cache.source().is_none());
        assert!(cache.cached(&path).is_none());
    }
}
