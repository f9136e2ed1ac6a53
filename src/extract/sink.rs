//! Destinations for extracted image artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Directory (relative to the sink root) holding per-model image folders.
pub const IMAGES_DIR: &str = "images";

/// Persists image bytes for a model and reports where they went.
pub trait ArtifactSink {
    /// Prepare the destination for `model`. Called before the first write.
    fn ensure_dir(&self, model: &str) -> Result<()>;

    /// Store `bytes` as `file_name` for `model`, returning the artifact path.
    fn write(&self, model: &str, file_name: &str, bytes: &[u8]) -> Result<String>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn ensure_dir(&self, model: &str) -> Result<()> {
        (**self).ensure_dir(model)
    }

    fn write(&self, model: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        (**self).write(model, file_name, bytes)
    }
}

/// Writes artifacts to `<root>/images/<model>/<file>`.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder receiving the artifacts of `model`.
    pub fn model_dir(&self, model: &str) -> PathBuf {
        self.root.join(IMAGES_DIR).join(model)
    }
}

impl ArtifactSink for FsSink {
    fn ensure_dir(&self, model: &str) -> Result<()> {
        let dir = self.model_dir(model);
        fs::create_dir_all(&dir)
            .map_err(|e| Error::ArtifactWrite(format!("{}: {}", dir.display(), e)))
    }

    fn write(&self, model: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.model_dir(model).join(file_name);
        fs::write(&path, bytes)
            .map_err(|e| Error::ArtifactWrite(format!("{}: {}", path.display(), e)))?;
        Ok(path.display().to_string())
    }
}

/// Keeps artifacts in memory, keyed by `images/<model>/<file>`.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored artifact paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Bytes of a stored artifact.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panicked writer cannot leave the map half-updated.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactSink for MemorySink {
    fn ensure_dir(&self, _model: &str) -> Result<()> {
        Ok(())
    }

    fn write(&self, model: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = format!("{}/{}/{}", IMAGES_DIR, model, file_name);
        self.lock().insert(path.clone(), bytes.to_vec());
        Ok(path)
    }
}
