//! Payload stores: where the raw payload bytes come from.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::bundled;
use crate::error::PayloadError;

/// Supplies raw code payloads by name.
///
/// Byte-buffer loaders use [`load_payload_bytes`](Self::load_payload_bytes);
/// path-based loaders ask for a [`payload_path`](Self::payload_path) and read
/// the file themselves.
pub trait PayloadStore {
    fn load_payload_bytes(&self, name: &str) -> Result<Vec<u8>, PayloadError>;

    fn payload_path(&self, name: &str) -> Result<PathBuf, PayloadError>;
}

/// Payloads stored as files in one directory.
#[derive(Clone, Debug)]
pub struct DirPayloadStore {
    root: PathBuf,
}

impl DirPayloadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a payload into the store directory, replacing any previous one.
    pub fn install(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, PayloadError> {
        let path = self.root.join(name);
        fs::create_dir_all(&self.root).map_err(|err| io_error(&self.root, &err))?;
        fs::write(&path, bytes).map_err(|err| io_error(&path, &err))?;
        Ok(path)
    }

    /// Install the bundled host and payload units.
    pub fn install_bundled(&self) -> Result<(), PayloadError> {
        self.install(bundled::HOST_PAYLOAD_NAME, bundled::HOST_UNITS.as_bytes())?;
        self.install(bundled::DEFAULT_PAYLOAD_NAME, bundled::A_UNITS.as_bytes())?;
        Ok(())
    }
}

impl PayloadStore for DirPayloadStore {
    fn load_payload_bytes(&self, name: &str) -> Result<Vec<u8>, PayloadError> {
        let path = self.payload_path(name)?;
        fs::read(&path).map_err(|err| io_error(&path, &err))
    }

    fn payload_path(&self, name: &str) -> Result<PathBuf, PayloadError> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(PayloadError::Missing {
                name: SmolStr::new(name),
            })
        }
    }
}

/// Payloads held in memory. Has no paths, so path-based loaders fail on it.
#[derive(Clone, Debug, Default)]
pub struct MemoryPayloadStore {
    payloads: FxHashMap<SmolStr, Arc<[u8]>>,
}

impl MemoryPayloadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the bundled host and payload units.
    pub fn bundled() -> Self {
        Self::new()
            .with_payload(bundled::HOST_PAYLOAD_NAME, bundled::HOST_UNITS.as_bytes())
            .with_payload(bundled::DEFAULT_PAYLOAD_NAME, bundled::A_UNITS.as_bytes())
    }

    pub fn with_payload(mut self, name: &str, bytes: &[u8]) -> Self {
        self.payloads.insert(SmolStr::new(name), Arc::from(bytes));
        self
    }
}

impl PayloadStore for MemoryPayloadStore {
    fn load_payload_bytes(&self, name: &str) -> Result<Vec<u8>, PayloadError> {
        self.payloads
            .get(name)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| PayloadError::Missing {
                name: SmolStr::new(name),
            })
    }

    fn payload_path(&self, name: &str) -> Result<PathBuf, PayloadError> {
        Err(PayloadError::NoPath {
            name: SmolStr::new(name),
        })
    }
}

pub(crate) fn io_error(path: &Path, err: &std::io::Error) -> PayloadError {
    PayloadError::Io {
        path: path.to_owned(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryPayloadStore::new().with_payload("x.units", b"class A {}");

        assert_eq!(store.load_payload_bytes("x.units").unwrap(), b"class A {}");
        assert!(matches!(
            store.load_payload_bytes("y.units"),
            Err(PayloadError::Missing { .. })
        ));
        assert!(matches!(
            store.payload_path("x.units"),
            Err(PayloadError::NoPath { .. })
        ));
    }

    #[test]
    fn test_dir_store_install_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirPayloadStore::new(dir.path());

        let path = store.install("x.units", b"class A {}").unwrap();

        assert_eq!(store.payload_path("x.units").unwrap(), path);
        assert_eq!(store.load_payload_bytes("x.units").unwrap(), b"class A {}");
        assert!(matches!(
            store.payload_path("missing.units"),
            Err(PayloadError::Missing { .. })
        ));
    }

    #[test]
    fn test_dir_store_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirPayloadStore::new(dir.path());
        store.install_bundled().unwrap();

        assert!(store.payload_path(bundled::HOST_PAYLOAD_NAME).is_ok());
        assert!(store.payload_path(bundled::DEFAULT_PAYLOAD_NAME).is_ok());
    }
}
