//! Parse cache for path-based payloads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use super::parser::parse_payload_bytes;
use super::store::io_error;
use crate::error::PayloadError;
use crate::unit::UnitDecl;

/// Caches parsed declarations by payload path.
///
/// Only identity-free [`UnitDecl`]s are cached. Every loader built from a
/// cached entry still mints its own units, so cached and uncached loaders
/// resolve the same way.
#[derive(Debug, Default)]
pub struct PayloadCache {
    entries: RwLock<FxHashMap<PathBuf, Arc<[UnitDecl]>>>,
}

impl PayloadCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the declarations for `path`, reading and parsing it on a miss.
    pub fn get_or_parse(&self, path: &Path) -> Result<Arc<[UnitDecl]>, PayloadError> {
        // Fast path: read lock
        if let Some(decls) = self.entries.read().get(path) {
            trace!(path = %path.display(), "payload cache hit");
            return Ok(Arc::clone(decls));
        }

        let decls: Arc<[UnitDecl]> = read_and_parse(path)?.into();

        // Slow path: another caller may have filled the entry meanwhile
        let mut entries = self.entries.write();
        let entry = entries
            .entry(path.to_owned())
            .or_insert_with(|| Arc::clone(&decls));
        Ok(Arc::clone(entry))
    }

    /// Number of cached payloads.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read and parse a payload file without caching.
pub fn read_and_parse(path: &Path) -> Result<Vec<UnitDecl>, PayloadError> {
    let bytes = fs::read(path).map_err(|err| io_error(path, &err))?;
    parse_payload_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_parses_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.units");
        fs::write(&path, "class A {}").unwrap();

        let cache = PayloadCache::new();
        let first = cache.get_or_parse(&path).unwrap();

        // A rewrite is not observed through the cache.
        fs::write(&path, "class A {} class B {}").unwrap();
        let second = cache.get_or_parse(&path).unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(read_and_parse(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let cache = PayloadCache::new();
        let err = cache
            .get_or_parse(Path::new("/definitely/not/here.units"))
            .unwrap_err();

        assert!(matches!(err, PayloadError::Io { .. }));
        assert!(cache.is_empty());
    }
}
