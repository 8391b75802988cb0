//! Built-in reference table of GEO series metadata.
//!
//! Screening can run against a curated reference table instead of a
//! caller-supplied one. The table is provided through [`ReferenceSource`]
//! and wrapped in [`CachedReference`] so it is read at most once per process.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig};

/// Environment variable naming the reference table file.
pub const REFERENCE_ENV: &str = "GEOSIFT_REFERENCE";

/// Something that can produce the reference table.
pub trait ReferenceSource: Send + Sync {
    /// Load the table.
    fn load(&self) -> Result<DataTable>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

impl ReferenceSource for DataTable {
    fn load(&self) -> Result<DataTable> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory table ({} rows)", self.row_count())
    }
}

/// Reference table stored as a CSV/TSV file.
#[derive(Debug, Clone)]
pub struct FileReference {
    path: PathBuf,
    parser: ParserConfig,
}

impl FileReference {
    /// Reference table at `path`, delimiter auto-detected.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            parser: ParserConfig::default(),
        }
    }

    /// Reference table named by `GEOSIFT_REFERENCE`, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var(REFERENCE_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(Self::new)
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceSource for FileReference {
    fn load(&self) -> Result<DataTable> {
        let (table, meta) = Parser::with_config(self.parser.clone()).parse_file(&self.path)?;
        info!(path = %self.path.display(), rows = meta.row_count, hash = %meta.hash, "loaded reference table");
        Ok(table)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads the wrapped source on first use and keeps the table.
pub struct CachedReference<S> {
    source: S,
    table: OnceCell<DataTable>,
}

impl<S: ReferenceSource> CachedReference<S> {
    /// Wrap a source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    /// The table, loading it on the first call. A failed load is retried on
    /// the next call.
    pub fn table(&self) -> Result<&DataTable> {
        self.table.get_or_try_init(|| self.source.load())
    }

    /// Whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}

impl<S: ReferenceSource> ReferenceSource for CachedReference<S> {
    fn load(&self) -> Result<DataTable> {
        self.table().cloned()
    }

    fn describe(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        loads: AtomicUsize,
    }

    impl ReferenceSource for Counting {
        fn load(&self) -> Result<DataTable> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(DataTable::from_strs(&["gse", "title"], &[&["GSE1", "x"]]))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn test_cached_reference_loads_once() {
        let cached = CachedReference::new(Counting {
            loads: AtomicUsize::new(0),
        });
        assert!(!cached.is_loaded());

        assert_eq!(cached.table().unwrap().row_count(), 1);
        assert_eq!(cached.load().unwrap().row_count(), 1);
        assert!(cached.is_loaded());
        assert_eq!(cached.source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = FileReference::new("/nonexistent/geo_reference.tsv");
        assert!(matches!(
            source.load(),
            Err(crate::error::GeoSiftError::Io { .. })
        ));
    }
}
