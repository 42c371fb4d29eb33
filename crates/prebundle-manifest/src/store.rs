//! Document stores: where manifest text comes from and goes back to.
//!
//! Entrypoints only ever read through a store at construction time. Writing a
//! mutated manifest back is left to whoever holds the entrypoint.

use crate::error::ManifestError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read/write manifest text by path.
///
/// The blocking and async forms must observe the same storage: reading a path
/// either way yields the same text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<String, ManifestError>;

    fn write_text(&self, path: &Path, text: &str) -> Result<(), ManifestError>;

    async fn read_text_async(&self, path: &Path) -> Result<String, ManifestError>;

    async fn write_text_async(&self, path: &Path, text: &str) -> Result<(), ManifestError>;
}

/// Filesystem-backed store. Writes replace the target atomically.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

#[async_trait]
impl DocumentStore for FsDocumentStore {
    fn read_text(&self, path: &Path) -> Result<String, ManifestError> {
        tracing::debug!(path = %path.display(), "reading manifest");
        fs::read_to_string(path).map_err(|e| ManifestError::from_io(path, e))
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), ManifestError> {
        tracing::debug!(path = %path.display(), bytes = text.len(), "writing manifest");
        let tmp_path = tmp_write_path(path);
        let write_result = (|| -> Result<(), ManifestError> {
            let mut file =
                File::create(&tmp_path).map_err(|e| ManifestError::from_io(&tmp_path, e))?;
            file.write_all(text.as_bytes())
                .map_err(|e| ManifestError::from_io(&tmp_path, e))?;
            file.sync_all()
                .map_err(|e| ManifestError::from_io(&tmp_path, e))?;
            Ok(())
        })();

        if let Err(error) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(error);
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ManifestError::from_io(path, e)
        })
    }

    async fn read_text_async(&self, path: &Path) -> Result<String, ManifestError> {
        tracing::debug!(path = %path.display(), "reading manifest (async)");
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::from_io(path, e))
    }

    async fn write_text_async(&self, path: &Path, text: &str) -> Result<(), ManifestError> {
        tracing::debug!(path = %path.display(), bytes = text.len(), "writing manifest (async)");
        let tmp_path = tmp_write_path(path);
        if let Err(e) = tokio::fs::write(&tmp_path, text.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(ManifestError::from_io(&tmp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(ManifestError::from_io(path, e));
        }
        Ok(())
    }
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

/// In-memory store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite one file.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
    }

    /// Current text stored at `path`, if any.
    pub fn text(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn read_text(&self, path: &Path) -> Result<String, ManifestError> {
        self.text(path).ok_or_else(|| ManifestError::NotFound {
            path: path.display().to_string(),
        })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), ManifestError> {
        self.insert(path, text);
        Ok(())
    }

    async fn read_text_async(&self, path: &Path) -> Result<String, ManifestError> {
        self.read_text(path)
    }

    async fn write_text_async(&self, path: &Path, text: &str) -> Result<(), ManifestError> {
        self.write_text(path, text)
    }
}
