//! On-disk image artifact store.
//!
//! Artifacts are keyed by a freshly generated UUID so uploads with the same
//! client filename never collide. Writes go to a temp file first and are
//! renamed into place, so a reader can never observe a partial artifact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::StorageError;

pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists `bytes` under a collision-free key derived from the
    /// suggested filename's extension. Returns the key.
    pub fn store(&self, suggested_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let key = match Path::new(suggested_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_lowercase()),
            None => Uuid::new_v4().to_string(),
        };
        let tmp = self.root.join(format!("{key}.tmp"));
        let path = self.root.join(&key);

        fs::write(&tmp, bytes)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(key)
    }

    pub fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::ArtifactNotFound(key.to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::ArtifactNotFound(key.to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Keys are bare filenames; anything that could escape the root is
    /// treated as absent rather than revealing path handling details.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StorageError::ArtifactNotFound(key.to_owned()));
        }
        Ok(self.root.join(key))
    }
}
